//! Playground viewer: wires the preview controller to the terminal.
//!
//! The event loop realizes the idle-debounce contract of the controller's
//! deferred input stage: every queued event is handled first (edits only
//! intake the raw value), and the idle signal is delivered once the queue is
//! empty, so a keystroke burst settles into a single recomputation.

mod app;
mod input_pane;
mod ui;


use app::App;
use crossterm::event::{self, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use prism_config::FormatOptions;
use prism_preview::{FormatEngine, OutputType, PreviewController};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Compute a single preview for the document at `path` and print it.
///
/// Prints the active view to stdout (or the full state as JSON) and any
/// diagnostic to stderr. Returns false when a diagnostic was raised.
pub fn run_once<E: FormatEngine>(
    path: &Path,
    engine: E,
    options: FormatOptions,
    mode: OutputType,
    json: bool,
) -> io::Result<bool> {
    let content = fs::read_to_string(path)?;

    let mut controller = PreviewController::new(engine, options).with_mode(mode);
    controller.push_input(content);
    controller.settle_input();
    controller.rerun();

    let state = controller.state();
    if json {
        let rendered = serde_json::to_string_pretty(state)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        println!("{rendered}");
    } else {
        print!("{}", state.view(controller.mode()));
    }
    if let Some(error) = &state.error {
        eprintln!("{error}");
    }
    Ok(state.error.is_none())
}

/// Open the interactive playground for the document at `path`.
pub fn run_viewer<E: FormatEngine>(
    path: PathBuf,
    engine: E,
    options: FormatOptions,
    mode: OutputType,
) -> io::Result<()> {
    let content = fs::read_to_string(&path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let mut app = App::new(engine, options, mode, content);

    // Setup terminal
    enable_raw_mode()?;
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app, &file_name);

    // Restore terminal
    disable_raw_mode()?;
    terminal.clear()?;
    terminal.show_cursor()?;

    result
}

fn run_app<E: FormatEngine>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<E>,
    file_name: &str,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| ui::render(frame, app, file_name))?;

        if event::poll(Duration::from_millis(100))? {
            handle_event(event::read()?, app);
            // Drain the rest of the burst before recomputing: input only
            // settles once the queue is empty.
            while event::poll(Duration::from_millis(0))? {
                handle_event(event::read()?, app);
            }
        }

        // Queue drained: the system is idle.
        app.on_idle();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_event<E: FormatEngine>(event: Event, app: &mut App<E>) {
    match event {
        Event::Key(key) => {
            app.handle_key(key);
        }
        // On resize the next draw() call picks up the new dimensions.
        Event::Resize(_, _) => {}
        _ => {}
    }
}
