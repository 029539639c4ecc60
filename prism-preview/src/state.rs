//! Result state: the aggregate consumers render from.
//!
//! [`PreviewState`] holds the last successfully computed value for each of
//! the three views plus the diagnostic of the most recent completed
//! invocation. [`PreviewState::apply`] is the single mutation point: the
//! matching view field and the diagnostic change together, so a reader never
//! observes a half-applied cycle.

use crate::engine::EngineError;
use crate::mode::OutputType;
use serde::Serialize;
use std::fmt;

/// Diagnostic shown when the formatter is not a fixed point of itself.
pub const NON_CONVERGENT_MESSAGE: &str = "Formatting does not converge: running the \
formatter on its own output produced a different result. This is a defect in the \
formatting engine, not in the input document.";

/// Diagnostic of the most recent completed invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PreviewError {
    /// The engine rejected the input or failed outright; message verbatim.
    Engine(EngineError),
    /// The first format pass succeeded but was not a fixed point.
    NonConvergent,
}

impl PreviewError {
    /// Distinguishes the engine-defect diagnostic from input errors.
    pub fn is_convergence_defect(&self) -> bool {
        matches!(self, PreviewError::NonConvergent)
    }
}

impl fmt::Display for PreviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreviewError::Engine(err) => write!(f, "{}", err),
            PreviewError::NonConvergent => f.write_str(NON_CONVERGENT_MESSAGE),
        }
    }
}

impl std::error::Error for PreviewError {}

/// Verdict of the convergence verifier for a formatted result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// The second pass reproduced the first: the output is a fixed point.
    Converged,
    /// The second pass differed or failed: succeeded-with-defect.
    Diverged,
}

/// Outcome of one completed invocation.
///
/// One variant per view plus failure. A cycle can update at most one view
/// field; the tagged union makes that mutual exclusion structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Formatted {
        code: String,
        convergence: Convergence,
    },
    Ast(String),
    Ir(String),
    Failed(EngineError),
}

/// Last-good value per view plus the current diagnostic.
///
/// Fields other than the one matching the active mode keep their previous
/// value across cycles: each is the last-good result for its own view, cached
/// until that view becomes active again.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreviewState {
    pub formatted_code: String,
    pub ast_output: String,
    pub ir_output: String,
    pub error: Option<PreviewError>,
}

impl PreviewState {
    /// Apply the outcome of one completed invocation.
    ///
    /// A divergent formatted result is still published (the user keeps a
    /// result on screen) with the distinguished diagnostic attached; a failed
    /// invocation touches only the diagnostic.
    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Formatted { code, convergence } => {
                self.formatted_code = code;
                self.error = match convergence {
                    Convergence::Converged => None,
                    Convergence::Diverged => Some(PreviewError::NonConvergent),
                };
            }
            Outcome::Ast(text) => {
                self.ast_output = text;
                self.error = None;
            }
            Outcome::Ir(text) => {
                self.ir_output = text;
                self.error = None;
            }
            Outcome::Failed(err) => {
                self.error = Some(PreviewError::Engine(err));
            }
        }
    }

    /// Text of the given view, for consumers rendering a single pane.
    pub fn view(&self, mode: OutputType) -> &str {
        match mode {
            OutputType::Formatted => &self.formatted_code,
            OutputType::Ast => &self.ast_output,
            OutputType::Ir => &self.ir_output,
        }
    }
}
