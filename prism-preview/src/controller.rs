//! Preview controller: triggers, scheduling, and stale-completion discard.
//!
//! The controller owns the deferred input stage, the options snapshot, the
//! active mode and the result state, and turns state changes into
//! recomputation cycles. All triggers run synchronously to completion. For
//! schedulers that execute engine calls out of band, the staged
//! [`PreviewController::begin`] / [`PreviewController::apply`] pair carries a
//! generation number: a completion issued under an older generation is
//! discarded, so an in-flight computation for superseded input can never
//! overwrite the result for newer input.

use crate::engine::FormatEngine;
use crate::input::DeferredInput;
use crate::invoke::{Completion, Invocation};
use crate::mode::OutputType;
use crate::state::PreviewState;
use prism_config::FormatOptions;
use tracing::{debug, trace};

/// Reactive preview controller over an external formatting engine.
pub struct PreviewController<E> {
    engine: E,
    options: FormatOptions,
    mode: OutputType,
    input: DeferredInput,
    generation: u64,
    state: PreviewState,
}

impl<E: FormatEngine> PreviewController<E> {
    /// Create an idle controller; nothing is computed until a trigger fires.
    pub fn new(engine: E, options: FormatOptions) -> Self {
        PreviewController {
            engine,
            options,
            mode: OutputType::default(),
            input: DeferredInput::default(),
            generation: 0,
            state: PreviewState::default(),
        }
    }

    /// Start with a non-default view, without triggering a computation.
    pub fn with_mode(mut self, mode: OutputType) -> Self {
        self.mode = mode;
        self
    }

    /// The aggregate consumers render from.
    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    /// The engine this controller invokes.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Currently active view.
    pub fn mode(&self) -> OutputType {
        self.mode
    }

    /// Current options snapshot.
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Most recent settled input.
    pub fn settled_input(&self) -> &str {
        self.input.settled()
    }

    /// Whether an edit is waiting for the next idle drain.
    pub fn input_pending(&self) -> bool {
        self.input.is_dirty()
    }

    /// Generation of the most recently issued invocation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Intake a raw edit. Never blocks and never recomputes; only the most
    /// recent value survives until the next idle drain.
    pub fn push_input(&mut self, raw: impl Into<String>) {
        self.input.push(raw);
    }

    /// Idle signal from the scheduler: settle the newest edit and recompute
    /// if the settled value changed.
    pub fn on_idle(&mut self) {
        if self.input.settle() {
            trace!("input settled");
            self.recompute();
        }
    }

    /// Settle the newest pending edit without recomputing.
    ///
    /// For schedulers that run engine calls out of band: pair with
    /// [`PreviewController::begin`] and [`PreviewController::apply`]. Returns
    /// whether the settled value changed.
    pub fn settle_input(&mut self) -> bool {
        self.input.settle()
    }

    /// Replace the options snapshot. Equal snapshots are ignored; any field
    /// change invalidates the cached views and recomputes the active branch.
    pub fn set_options(&mut self, options: FormatOptions) {
        if options == self.options {
            return;
        }
        self.options = options;
        self.recompute();
    }

    /// Switch the displayed view.
    ///
    /// A mode change is a first-class trigger: the newly active branch is
    /// recomputed even with unchanged input and options, because its cached
    /// value may be stale or never computed. Re-selecting the active view is
    /// a no-op.
    pub fn set_mode(&mut self, mode: OutputType) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.recompute();
    }

    /// Repeat the last computation with current settled input, options and
    /// mode. Useful when an external condition changed outside the tracked
    /// state.
    pub fn rerun(&mut self) {
        self.recompute();
    }

    /// Issue the next invocation, superseding everything in flight.
    pub fn begin(&mut self) -> Invocation {
        self.generation += 1;
        debug!(
            generation = self.generation,
            mode = self.mode.label(),
            "invocation issued"
        );
        Invocation {
            generation: self.generation,
            source: self.input.settled().to_string(),
            options: self.options.clone(),
            mode: self.mode,
        }
    }

    /// Apply a completed invocation to the result state.
    ///
    /// Completions issued under an older generation lost the race against a
    /// newer trigger and are discarded. Returns whether the state changed.
    pub fn apply(&mut self, completion: Completion) -> bool {
        if completion.generation() != self.generation {
            debug!(
                completed = completion.generation(),
                current = self.generation,
                "discarding stale completion"
            );
            return false;
        }
        self.state.apply(completion.outcome);
        true
    }

    /// Synchronous trigger path: issue, execute, apply.
    fn recompute(&mut self) {
        let invocation = self.begin();
        let completion = invocation.execute(&self.engine);
        self.apply(completion);
    }
}
