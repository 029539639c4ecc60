//! End-to-end controller behavior: triggers, mode isolation, stale
//! completions, and error retention.

use prism_config::FormatOptions;
use prism_preview::{EngineError, FormatEngine, OutputType, PreviewController};
use rstest::rstest;
use std::cell::{Cell, RefCell};

/// Engine double that derives each view deterministically from the source
/// and records every call. `format` is idempotent so the verifier's second
/// pass always converges.
#[derive(Default)]
struct RecordingEngine {
    calls: RefCell<Vec<&'static str>>,
}

impl RecordingEngine {
    fn take_calls(&self) -> Vec<&'static str> {
        self.calls.borrow_mut().drain(..).collect()
    }
}

impl FormatEngine for RecordingEngine {
    fn format(&self, source: &str, _options: &FormatOptions) -> Result<String, EngineError> {
        self.calls.borrow_mut().push("format");
        if source.starts_with("fmt:") {
            Ok(source.to_string())
        } else {
            Ok(format!("fmt:{source}"))
        }
    }

    fn parse(&self, source: &str) -> Result<String, EngineError> {
        self.calls.borrow_mut().push("parse");
        Ok(format!("ast:{source}"))
    }

    fn format_ir(&self, source: &str, _options: &FormatOptions) -> Result<String, EngineError> {
        self.calls.borrow_mut().push("ir");
        Ok(format!("ir:{source}"))
    }
}

/// Engine double that can be flipped into a failing state mid-test.
#[derive(Default)]
struct ToggleEngine {
    fail: Cell<bool>,
}

impl FormatEngine for ToggleEngine {
    fn format(&self, source: &str, _options: &FormatOptions) -> Result<String, EngineError> {
        if self.fail.get() {
            return Err(EngineError::Format("bad input".to_string()));
        }
        if source.starts_with("fmt:") {
            Ok(source.to_string())
        } else {
            Ok(format!("fmt:{source}"))
        }
    }

    fn parse(&self, source: &str) -> Result<String, EngineError> {
        if self.fail.get() {
            return Err(EngineError::Parse("unexpected token".to_string()));
        }
        Ok(format!("ast:{source}"))
    }

    fn format_ir(&self, source: &str, _options: &FormatOptions) -> Result<String, EngineError> {
        if self.fail.get() {
            return Err(EngineError::Format("bad input".to_string()));
        }
        Ok(format!("ir:{source}"))
    }
}

fn controller() -> PreviewController<RecordingEngine> {
    PreviewController::new(RecordingEngine::default(), FormatOptions::default())
}

#[rstest]
#[case::formatted(OutputType::Formatted, "fmt:doc")]
#[case::ast(OutputType::Ast, "ast:doc")]
#[case::ir(OutputType::Ir, "ir:doc")]
fn a_cycle_updates_only_the_active_view(#[case] mode: OutputType, #[case] expected: &str) {
    let mut controller = PreviewController::new(RecordingEngine::default(), FormatOptions::default())
        .with_mode(mode);
    controller.push_input("doc");
    controller.on_idle();

    let state = controller.state();
    assert_eq!(state.view(mode), expected);
    for other in [OutputType::Formatted, OutputType::Ast, OutputType::Ir] {
        if other != mode {
            assert_eq!(state.view(other), "");
        }
    }
    assert!(state.error.is_none());
}

#[test]
fn switching_modes_never_clobbers_cached_views() {
    let mut controller = controller();
    controller.push_input("doc");
    controller.on_idle();
    assert_eq!(controller.state().formatted_code, "fmt:doc");

    controller.set_mode(OutputType::Ast);
    assert_eq!(controller.state().formatted_code, "fmt:doc");
    assert_eq!(controller.state().ast_output, "ast:doc");
    assert_eq!(controller.state().ir_output, "");
}

#[test]
fn formatted_cycle_calls_format_twice_for_verification() {
    let mut controller = controller();
    controller.push_input("doc");
    controller.on_idle();
    assert_eq!(controller.engine().take_calls(), vec!["format", "format"]);
}

#[test]
fn ast_cycle_calls_only_parse() {
    let mut controller = controller();
    controller.set_mode(OutputType::Ast);
    controller.engine().take_calls();

    controller.push_input("doc");
    controller.on_idle();
    assert_eq!(controller.engine().take_calls(), vec!["parse"]);
}

#[test]
fn bursts_coalesce_to_the_newest_value() {
    let mut controller = controller();
    controller.push_input("a");
    controller.push_input("ab");
    controller.push_input("abc");
    controller.on_idle();

    assert_eq!(controller.state().formatted_code, "fmt:abc");
    // One cycle only: the first pass plus its convergence check.
    assert_eq!(controller.engine().take_calls(), vec!["format", "format"]);

    controller.on_idle();
    assert!(controller.engine().take_calls().is_empty());
}

#[test]
fn option_changes_retrigger_only_on_structural_change() {
    let mut controller = controller();
    controller.push_input("doc");
    controller.on_idle();
    controller.engine().take_calls();

    controller.set_options(FormatOptions::default());
    assert!(controller.engine().take_calls().is_empty());

    let mut options = FormatOptions::default();
    options.indent_size = 4;
    controller.set_options(options);
    assert_eq!(controller.engine().take_calls(), vec!["format", "format"]);
}

#[test]
fn rerun_repeats_the_last_computation() {
    let mut controller = controller();
    controller.push_input("doc");
    controller.on_idle();
    controller.engine().take_calls();

    controller.rerun();
    assert_eq!(controller.engine().take_calls(), vec!["format", "format"]);
    assert_eq!(controller.state().formatted_code, "fmt:doc");
}

#[test]
fn stale_completions_never_overwrite_newer_results() {
    let mut controller = controller();

    controller.push_input("A");
    assert!(controller.settle_input());
    let invocation_a = controller.begin();

    controller.push_input("B");
    assert!(controller.settle_input());
    let invocation_b = controller.begin();

    // B's computation finishes first and is applied; A's completion arrives
    // afterwards and must be discarded.
    let done_b = invocation_b.execute(controller.engine());
    let done_a = invocation_a.execute(controller.engine());
    assert!(controller.apply(done_b));
    assert!(!controller.apply(done_a));

    assert_eq!(controller.state().formatted_code, "fmt:B");
}

#[test]
fn input_errors_leave_every_view_untouched() {
    let mut controller = PreviewController::new(ToggleEngine::default(), FormatOptions::default());

    // Prime all three views with good values.
    controller.push_input("doc");
    controller.on_idle();
    controller.set_mode(OutputType::Ast);
    controller.set_mode(OutputType::Ir);
    assert_eq!(controller.state().formatted_code, "fmt:doc");
    assert_eq!(controller.state().ast_output, "ast:doc");
    assert_eq!(controller.state().ir_output, "ir:doc");

    controller.engine().fail.set(true);
    controller.rerun();

    let state = controller.state();
    assert_eq!(state.formatted_code, "fmt:doc");
    assert_eq!(state.ast_output, "ast:doc");
    assert_eq!(state.ir_output, "ir:doc");
    let error = state.error.as_ref().expect("diagnostic");
    assert_eq!(error.to_string(), "bad input");
    assert!(!error.is_convergence_defect());
}

#[test]
fn parse_failure_surfaces_the_message_verbatim() {
    let engine = ToggleEngine::default();
    engine.fail.set(true);
    let mut controller = PreviewController::new(engine, FormatOptions::default())
        .with_mode(OutputType::Ast);

    controller.push_input("#broken");
    controller.on_idle();

    let state = controller.state();
    assert_eq!(state.ast_output, "");
    let error = state.error.as_ref().expect("diagnostic");
    assert_eq!(error.to_string(), "unexpected token");
}

#[test]
fn recovery_after_a_failure_clears_the_diagnostic() {
    let mut controller = PreviewController::new(ToggleEngine::default(), FormatOptions::default());
    controller.push_input("doc");
    controller.on_idle();

    controller.engine().fail.set(true);
    controller.rerun();
    assert!(controller.state().error.is_some());

    controller.engine().fail.set(false);
    controller.rerun();
    assert!(controller.state().error.is_none());
    assert_eq!(controller.state().formatted_code, "fmt:doc");
}
