//! Engine boundary: the contract an external formatter must satisfy.
//!
//! The preview controller never implements formatting itself. It talks to an
//! engine through [`FormatEngine`]: three pure operations that either return
//! the derived text or fail with a descriptive message. No other capability
//! (state, I/O) is assumed of the engine.

use prism_config::FormatOptions;
use serde::Serialize;
use std::fmt;

/// Failures signalled by an engine operation.
///
/// `Format` and `Parse` carry the engine's diagnostic for input it rejects;
/// `Fault` covers unexpected engine failures not tied to a specific input.
/// All three propagate identically: the message is surfaced verbatim and the
/// last-good view values are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum EngineError {
    Format(String),
    Parse(String),
    Fault(String),
}

impl EngineError {
    /// The diagnostic text as reported by the engine.
    pub fn message(&self) -> &str {
        match self {
            EngineError::Format(msg) | EngineError::Parse(msg) | EngineError::Fault(msg) => msg,
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Consumers show this text in an error banner, so no prefix.
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for EngineError {}

/// Contract of the external formatting engine.
pub trait FormatEngine {
    /// Format the document under the given options.
    fn format(&self, source: &str, options: &FormatOptions) -> Result<String, EngineError>;

    /// Dump the document's syntactic structure.
    fn parse(&self, source: &str) -> Result<String, EngineError>;

    /// Dump the intermediate representation the formatter would lay out.
    fn format_ir(&self, source: &str, options: &FormatOptions) -> Result<String, EngineError>;
}
