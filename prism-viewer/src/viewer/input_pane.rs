//! Editable source pane.
//!
//! A deliberately small text editor: enough to exercise the preview pipeline
//! (insert, delete, newline, cursor movement). Serious editing belongs to an
//! external editor; the pane only needs to produce a realistic edit stream.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Editable text pane with a cursor and vertical scrolling.
pub struct InputPane {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    scroll_offset: usize,
}

impl InputPane {
    /// Create a pane holding `content`.
    pub fn new(content: String) -> Self {
        let mut lines: Vec<String> = content.lines().map(|line| line.to_string()).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        InputPane {
            lines,
            cursor_row: 0,
            cursor_col: 0,
            scroll_offset: 0,
        }
    }

    /// Current document as a single string.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Get the current cursor position (row, column in characters).
    #[allow(dead_code)]
    pub fn cursor_position(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    /// Apply a key. Returns true when the document changed.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match key.code {
            KeyCode::Char(ch) => {
                self.insert_char(ch);
                true
            }
            KeyCode::Enter => {
                self.split_line();
                true
            }
            KeyCode::Backspace => self.delete_before_cursor(),
            KeyCode::Left => {
                self.move_left();
                false
            }
            KeyCode::Right => {
                self.move_right();
                false
            }
            KeyCode::Up => {
                self.move_up();
                false
            }
            KeyCode::Down => {
                self.move_down();
                false
            }
            KeyCode::Home => {
                self.cursor_col = 0;
                false
            }
            KeyCode::End => {
                self.cursor_col = self.current_line_len();
                false
            }
            _ => false,
        }
    }

    /// Render the pane, keeping the cursor inside the viewport.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let height = area.height as usize;
        if height > 0 {
            if self.cursor_row < self.scroll_offset {
                self.scroll_offset = self.cursor_row;
            }
            if self.cursor_row >= self.scroll_offset + height {
                self.scroll_offset = self.cursor_row + 1 - height;
            }
        }

        let mut rendered: Vec<Line> = Vec::new();
        for (row, line) in self
            .lines
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(height)
        {
            if row == self.cursor_row {
                rendered.push(line_with_cursor(line, self.cursor_col));
            } else {
                rendered.push(Line::from(line.as_str()));
            }
        }
        frame.render_widget(Paragraph::new(rendered), area);
    }

    fn insert_char(&mut self, ch: char) {
        let byte = byte_index(&self.lines[self.cursor_row], self.cursor_col);
        self.lines[self.cursor_row].insert(byte, ch);
        self.cursor_col += 1;
    }

    fn split_line(&mut self) {
        let byte = byte_index(&self.lines[self.cursor_row], self.cursor_col);
        let rest = self.lines[self.cursor_row].split_off(byte);
        self.lines.insert(self.cursor_row + 1, rest);
        self.cursor_row += 1;
        self.cursor_col = 0;
    }

    fn delete_before_cursor(&mut self) -> bool {
        if self.cursor_col > 0 {
            let byte = byte_index(&self.lines[self.cursor_row], self.cursor_col - 1);
            self.lines[self.cursor_row].remove(byte);
            self.cursor_col -= 1;
            true
        } else if self.cursor_row > 0 {
            // Join with the previous line.
            let line = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.lines[self.cursor_row].chars().count();
            self.lines[self.cursor_row].push_str(&line);
            true
        } else {
            false
        }
    }

    fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        }
    }

    fn move_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        }
    }

    fn move_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.clamp_cursor_column();
        }
    }

    fn move_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.clamp_cursor_column();
        }
    }

    fn current_line_len(&self) -> usize {
        self.lines[self.cursor_row].chars().count()
    }

    fn clamp_cursor_column(&mut self) {
        let len = self.current_line_len();
        if self.cursor_col > len {
            self.cursor_col = len;
        }
    }
}

/// Character-based byte offset into `line`, clamped to its end.
fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len())
}

fn line_with_cursor(line: &str, col: usize) -> Line<'_> {
    let byte = byte_index(line, col);
    let (before, rest) = line.split_at(byte);
    let mut chars = rest.chars();
    let under = chars.next().unwrap_or(' ');
    let after = chars.as_str();
    Line::from(vec![
        Span::raw(before),
        Span::styled(
            under.to_string(),
            Style::default().add_modifier(Modifier::REVERSED),
        ),
        Span::raw(after),
    ])
}
