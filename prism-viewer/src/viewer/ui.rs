//! UI rendering logic.
//!
//! Layout structure:
//! - Title bar (1 line, fixed)
//! - Middle section (responsive height):
//!   - Input pane (half width)
//!   - Output pane for the active view (remaining space)
//! - Status line (1 line, fixed)
//! - Error banner (1 line, only while a diagnostic is present)

use super::app::App;
use prism_config::FormatOptions;
use prism_preview::FormatEngine;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Minimum terminal width required for the UI
const MIN_TERMINAL_WIDTH: u16 = 60;
/// Height of the status line
const STATUS_LINE_HEIGHT: u16 = 1;

/// Render the entire UI
pub fn render<E: FormatEngine>(frame: &mut Frame, app: &mut App<E>, file_name: &str) {
    let size = frame.area();

    if size.width < MIN_TERMINAL_WIDTH {
        render_error_too_narrow(frame, size);
        return;
    }

    let has_error = app.controller.state().error.is_some();
    let mut constraints = vec![
        Constraint::Length(1),                  // Title bar
        Constraint::Min(1),                     // Middle (input|output)
        Constraint::Length(STATUS_LINE_HEIGHT), // Status line
    ];
    if has_error {
        constraints.push(Constraint::Length(1)); // Error banner
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(size);

    render_title_bar(frame, chunks[0], file_name);
    render_middle_section(frame, chunks[1], app);
    render_status_line(frame, chunks[2], app);
    if has_error {
        render_error_banner(frame, chunks[3], app);
    }
}

fn render_error_too_narrow(frame: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal too narrow: {} < {} chars",
        area.width, MIN_TERMINAL_WIDTH
    );
    let paragraph =
        Paragraph::new(msg).style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    frame.render_widget(paragraph, area);
}

fn render_title_bar(frame: &mut Frame, area: Rect, file_name: &str) {
    let title = format!("prism:: {}", file_name);
    let paragraph = Paragraph::new(title).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(paragraph, area);
}

fn render_middle_section<E: FormatEngine>(frame: &mut Frame, area: Rect, app: &mut App<E>) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Min(1)])
        .split(area);

    render_input_pane(frame, chunks[0], app);
    render_output_pane(frame, chunks[1], app);
}

fn render_input_pane<E: FormatEngine>(frame: &mut Frame, area: Rect, app: &mut App<E>) {
    let block = Block::default().borders(Borders::ALL).title("Input");
    let inner_area = block.inner(area);
    frame.render_widget(block, area);
    app.input_pane.render(frame, inner_area);
}

fn render_output_pane<E: FormatEngine>(frame: &mut Frame, area: Rect, app: &App<E>) {
    let mode = app.controller.mode();
    let title = format!("Output [{}]", mode.label());
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let text = app.controller.state().view(mode).to_string();
    frame.render_widget(Paragraph::new(text), inner_area);
}

fn render_status_line<E: FormatEngine>(frame: &mut Frame, area: Rect, app: &App<E>) {
    let options = app.controller.options();
    let mut spans = vec![
        Span::styled(
            app.controller.mode().label(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled("Width: ", Style::default().fg(Color::Yellow)),
        Span::raw(options.max_line_length.to_string()),
        Span::raw(" | "),
        Span::styled("Indent: ", Style::default().fg(Color::Yellow)),
        Span::raw(options.indent_size.to_string()),
        Span::raw(" | "),
        Span::raw(flag_summary(options)),
        Span::raw(" | "),
        Span::raw(format!("gen {}", app.controller.generation())),
        Span::raw(" | "),
        Span::raw("Tab: view  F2-F4: options  F5: re-run  Esc: quit"),
    ];
    if app.controller.input_pending() {
        spans.push(Span::styled(" *", Style::default().fg(Color::Magenta)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(paragraph, area);
}

fn render_error_banner<E: FormatEngine>(frame: &mut Frame, area: Rect, app: &App<E>) {
    let Some(error) = app.controller.state().error.as_ref() else {
        return;
    };
    // Convergence defects are engine bugs, not input errors; use a
    // distinguishable color.
    let style = if error.is_convergence_defect() {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
        Style::default().fg(Color::White).bg(Color::Red)
    };
    frame.render_widget(Paragraph::new(error.to_string()).style(style), area);
}

fn flag_summary(options: &FormatOptions) -> String {
    format!(
        "collapse:{} reorder:{} wrap:{}",
        on_off(options.collapse_markup_spaces),
        on_off(options.reorder_import_items),
        on_off(options.wrap_text)
    )
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}
