//! Formatting invoker and convergence verifier.
//!
//! An [`Invocation`] snapshots everything one recomputation cycle depends on:
//! the settled source, the options, the active mode, and the generation it
//! was issued under. Executing it calls exactly one engine operation — the
//! branch the active mode demands — which bounds each cycle to a single pass
//! over the document. For the formatted view the verifier then re-formats the
//! first result and compares for a fixed point.

use crate::engine::FormatEngine;
use crate::mode::OutputType;
use crate::state::{Convergence, Outcome};
use prism_config::FormatOptions;
use tracing::warn;

/// Snapshot of one scheduled recomputation cycle.
///
/// The snapshot guarantees self-consistency: source, options and mode all
/// belong to the tick that issued the invocation, whatever happens to the
/// controller while the engine runs.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub(crate) generation: u64,
    pub(crate) source: String,
    pub(crate) options: FormatOptions,
    pub(crate) mode: OutputType,
}

impl Invocation {
    /// Generation this cycle was issued under.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the single engine operation the active mode demands.
    pub fn execute<E: FormatEngine>(&self, engine: &E) -> Completion {
        let outcome = match self.mode {
            OutputType::Formatted => self.format_and_verify(engine),
            OutputType::Ast => match engine.parse(&self.source) {
                Ok(text) => Outcome::Ast(text),
                Err(err) => Outcome::Failed(err),
            },
            OutputType::Ir => match engine.format_ir(&self.source, &self.options) {
                Ok(text) => Outcome::Ir(text),
                Err(err) => Outcome::Failed(err),
            },
        };
        Completion {
            generation: self.generation,
            outcome,
        }
    }

    /// First pass, then the convergence check on its own output.
    ///
    /// A differing or failing second pass is a defect in the engine, not in
    /// the input: the first result is still published, with the
    /// distinguished diagnostic attached.
    fn format_and_verify<E: FormatEngine>(&self, engine: &E) -> Outcome {
        let first = match engine.format(&self.source, &self.options) {
            Ok(text) => text,
            Err(err) => return Outcome::Failed(err),
        };
        let convergence = match engine.format(&first, &self.options) {
            Ok(second) if second == first => Convergence::Converged,
            Ok(_) | Err(_) => Convergence::Diverged,
        };
        if convergence == Convergence::Diverged {
            warn!(
                generation = self.generation,
                "formatter output is not a fixed point of itself"
            );
        }
        Outcome::Formatted {
            code: first,
            convergence,
        }
    }
}

/// Result of an executed invocation, tagged with the generation it was
/// issued under so stale completions can be discarded.
#[derive(Debug, Clone)]
pub struct Completion {
    pub(crate) generation: u64,
    pub(crate) outcome: Outcome,
}

impl Completion {
    /// Generation of the invocation that produced this completion.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The outcome awaiting application to the result state.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}
