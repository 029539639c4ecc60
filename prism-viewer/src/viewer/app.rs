//! Main application state and event handling.
//!
//! The App owns the preview controller and the input pane, translates
//! keyboard input into controller triggers, and exposes the state the UI
//! renders from. Edits are pushed to the controller immediately but only
//! settle on the next idle drain.

use super::input_pane::InputPane;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use prism_config::FormatOptions;
use prism_preview::{FormatEngine, OutputType, PreviewController};

/// The main application
pub struct App<E> {
    /// Preview controller driving the derived views.
    pub controller: PreviewController<E>,
    /// Editable source pane.
    pub input_pane: InputPane,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl<E: FormatEngine> App<E> {
    /// Create the app and queue the initial document for computation.
    ///
    /// The first idle signal settles the document and computes the active
    /// view.
    pub fn new(engine: E, options: FormatOptions, mode: OutputType, content: String) -> Self {
        let mut controller = PreviewController::new(engine, options).with_mode(mode);
        controller.push_input(content.clone());
        App {
            controller,
            input_pane: InputPane::new(content),
            should_quit: false,
        }
    }

    /// Idle signal from the event loop: settle pending edits and recompute.
    pub fn on_idle(&mut self) {
        self.controller.on_idle();
    }

    /// Handle a keyboard event.
    ///
    /// Returns whether the state changed (needed for re-rendering).
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Esc => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Tab => {
                let next = self.controller.mode().cycle();
                self.controller.set_mode(next);
                return true;
            }
            KeyCode::F(2) => {
                return self.toggle_option(|o| o.collapse_markup_spaces = !o.collapse_markup_spaces)
            }
            KeyCode::F(3) => {
                return self.toggle_option(|o| o.reorder_import_items = !o.reorder_import_items)
            }
            KeyCode::F(4) => return self.toggle_option(|o| o.wrap_text = !o.wrap_text),
            KeyCode::F(5) => {
                self.controller.rerun();
                return true;
            }
            _ => {}
        }

        // Everything else belongs to the input pane; document changes are
        // pushed raw and settle on the next idle drain.
        if self.input_pane.handle_key(key) {
            self.controller.push_input(self.input_pane.content());
            true
        } else {
            false
        }
    }

    fn toggle_option(&mut self, mutate: impl FnOnce(&mut FormatOptions)) -> bool {
        let mut options = self.controller.options().clone();
        mutate(&mut options);
        self.controller.set_options(options);
        true
    }
}
