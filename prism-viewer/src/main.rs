//! Standalone binary for the prism formatter playground.
//! Usage:
//!   prismv <path> --engine <command>
//!   prismv <path> --engine <command> --once [--json]

mod viewer;

use clap::{Arg, ArgAction, Command, ValueHint};
use prism_config::Loader;
use prism_preview::{CommandEngine, OutputType};
use std::path::PathBuf;

fn main() {
    let matches = Command::new("prismv")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive playground for previewing formatter output")
        .arg(
            Arg::new("path")
                .help("Path to the document to preview")
                .required(true)
                .index(1)
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("engine")
                .long("engine")
                .short('e')
                .help("External formatter command (overrides the configured engine)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file layered over the built-in defaults")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .short('m')
                .help("Initial output view: formatted, ast or ir")
                .default_value("formatted"),
        )
        .arg(
            Arg::new("once")
                .long("once")
                .help("Compute a single preview and print it instead of starting the UI")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("With --once, print the full preview state as JSON")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    // Log to stderr only when RUST_LOG asks for it; the TUI owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let path = matches.get_one::<String>("path").expect("path is required");

    let mut loader = Loader::new();
    if let Some(file) = matches.get_one::<String>("config") {
        loader = loader.with_file(file);
    }
    if let Some(engine_cmd) = matches.get_one::<String>("engine") {
        loader = loader
            .set_override("engine.command", engine_cmd.as_str())
            .unwrap_or_else(|err| {
                eprintln!("Configuration error: {err}");
                std::process::exit(1);
            });
    }
    let config = loader.build().unwrap_or_else(|err| {
        eprintln!("Configuration error: {err}");
        std::process::exit(1);
    });

    if !config.engine.is_configured() {
        eprintln!("No engine configured: pass --engine or set engine.command in a config file");
        std::process::exit(1);
    }
    tracing::debug!(engine = %config.engine.command, "configured engine");

    let mode = match matches.get_one::<String>("mode").map(String::as_str) {
        Some("formatted") | None => OutputType::Formatted,
        Some("ast") => OutputType::Ast,
        Some("ir") => OutputType::Ir,
        Some(other) => {
            eprintln!("Unknown mode '{other}' (expected formatted, ast or ir)");
            std::process::exit(1);
        }
    };

    let engine =
        CommandEngine::new(&config.engine.command).with_args(config.engine.args.iter().cloned());
    let path = PathBuf::from(path);

    if matches.get_flag("once") {
        match viewer::run_once(&path, engine, config.format, mode, matches.get_flag("json")) {
            Ok(true) => {}
            Ok(false) => std::process::exit(1),
            Err(err) => {
                eprintln!("Error: {err}");
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(err) = viewer::run_viewer(path, engine, config.format, mode) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
