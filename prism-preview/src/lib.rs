//! Reactive preview controller for an external source-code formatter.
//!
//! Given an input document and a set of formatting options, the controller
//! keeps three derived views current: the formatted output, a structural
//! (AST) dump, and a layout IR dump. Every formatted result is additionally
//! verified for idempotence: a second pass of the formatter over its own
//! output must be a fixed point, and a divergence is surfaced as a defect in
//! the engine rather than in the input.
//!
//! The formatter itself is external and reached through
//! [`engine::FormatEngine`]. Consumers read [`state::PreviewState`] and drive
//! the controller through its triggers: a raw edit stream coalesced by the
//! deferred input stage, option changes, view changes, and an explicit
//! re-run. Failures never escape the controller; the last-good value of every
//! view survives any failed invocation.

pub mod command;
pub mod controller;
pub mod engine;
pub mod input;
pub mod invoke;
pub mod mode;
pub mod state;

pub use command::CommandEngine;
pub use controller::PreviewController;
pub use engine::{EngineError, FormatEngine};
pub use input::DeferredInput;
pub use invoke::{Completion, Invocation};
pub use mode::OutputType;
pub use state::{Convergence, Outcome, PreviewError, PreviewState, NON_CONVERGENT_MESSAGE};
