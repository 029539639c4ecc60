//! Process-backed engine adapter.
//!
//! [`CommandEngine`] bridges the playground to an external formatter
//! executable. The adapter invokes the program once per operation with
//! `--emit formatted|ast|ir` plus flags derived from the options, writes the
//! source to stdin, and reads the derived text from stdout. A non-zero exit
//! reports the program's stderr verbatim as the engine diagnostic.

use crate::engine::{EngineError, FormatEngine};
use prism_config::FormatOptions;
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use tracing::debug;

/// View selector passed to the external program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emit {
    Formatted,
    Ast,
    Ir,
}

impl Emit {
    fn flag(self) -> &'static str {
        match self {
            Emit::Formatted => "formatted",
            Emit::Ast => "ast",
            Emit::Ir => "ir",
        }
    }
}

/// External formatter reached through a child process.
#[derive(Debug, Clone)]
pub struct CommandEngine {
    program: String,
    base_args: Vec<String>,
}

impl CommandEngine {
    /// Adapter over the given executable.
    pub fn new(program: impl Into<String>) -> Self {
        CommandEngine {
            program: program.into(),
            base_args: Vec::new(),
        }
    }

    /// Fixed arguments placed before the generated ones.
    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.base_args.extend(args);
        self
    }

    fn option_args(options: &FormatOptions) -> Vec<String> {
        let mut args = vec![
            "--max-line-length".to_string(),
            options.max_line_length.to_string(),
            "--indent-size".to_string(),
            options.indent_size.to_string(),
        ];
        if options.collapse_markup_spaces {
            args.push("--collapse-markup-spaces".to_string());
        }
        if options.reorder_import_items {
            args.push("--reorder-import-items".to_string());
        }
        if options.wrap_text {
            args.push("--wrap-text".to_string());
        }
        args
    }

    /// Run the program once, feeding `source` on stdin.
    fn run(&self, emit: Emit, source: &str, option_args: &[String]) -> Result<String, EngineError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.base_args)
            .arg("--emit")
            .arg(emit.flag())
            .args(option_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(program = %self.program, emit = emit.flag(), "invoking engine process");

        let mut child = command.spawn().map_err(|err| {
            EngineError::Fault(format!("failed to spawn '{}': {}", self.program, err))
        })?;

        // Writer thread: the child may emit output before consuming all of
        // its stdin, and a single-threaded write can deadlock on the pipe.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Fault("engine stdin unavailable".to_string()))?;
        let body = source.to_string();
        let writer = thread::spawn(move || stdin.write_all(body.as_bytes()));

        let output = child
            .wait_with_output()
            .map_err(|err| EngineError::Fault(format!("engine process failed: {}", err)))?;

        match writer.join() {
            Ok(Ok(())) => {}
            // A closed pipe just means the child stopped reading early.
            Ok(Err(err)) if err.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(err)) => {
                return Err(EngineError::Fault(format!(
                    "failed to write engine input: {}",
                    err
                )))
            }
            Err(_) => {
                return Err(EngineError::Fault(
                    "engine input writer panicked".to_string(),
                ))
            }
        }

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let message = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if message.is_empty() {
                format!("engine exited with {}", output.status)
            } else {
                message
            };
            match emit {
                Emit::Ast => Err(EngineError::Parse(message)),
                Emit::Formatted | Emit::Ir => Err(EngineError::Format(message)),
            }
        }
    }
}

impl FormatEngine for CommandEngine {
    fn format(&self, source: &str, options: &FormatOptions) -> Result<String, EngineError> {
        self.run(Emit::Formatted, source, &Self::option_args(options))
    }

    fn parse(&self, source: &str) -> Result<String, EngineError> {
        self.run(Emit::Ast, source, &[])
    }

    fn format_ir(&self, source: &str, options: &FormatOptions) -> Result<String, EngineError> {
        self.run(Emit::Ir, source, &Self::option_args(options))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn script(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("engine.sh");
        fs::write(&path, body).expect("write script");
        let mut perms = fs::metadata(&path).expect("stat").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("chmod");
        path
    }

    #[test]
    fn stdout_of_a_successful_run_is_the_result() {
        let dir = TempDir::new().expect("tempdir");
        let path = script(&dir, "#!/bin/sh\nexec cat\n");
        let engine = CommandEngine::new(path.to_string_lossy());
        let result = engine
            .format("hello world\n", &FormatOptions::default())
            .expect("format");
        assert_eq!(result, "hello world\n");
    }

    #[test]
    fn stderr_of_a_failed_parse_becomes_a_parse_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = script(&dir, "#!/bin/sh\necho 'unexpected token' >&2\nexit 1\n");
        let engine = CommandEngine::new(path.to_string_lossy());
        let err = engine.parse("bad input").expect_err("failure");
        assert_eq!(err, EngineError::Parse("unexpected token".to_string()));
    }

    #[test]
    fn a_missing_program_is_an_engine_fault() {
        let engine = CommandEngine::new("/nonexistent/prism-engine");
        let err = engine
            .format("doc", &FormatOptions::default())
            .expect_err("spawn failure");
        assert!(matches!(err, EngineError::Fault(_)));
    }
}
