//! `info locals` tests.
//!
//! Covers name resolution, single-frame rendering, the framed multi-frame
//! walk and completion, against recorded snapshots and a few hand-written
//! frames that fail in specific ways.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use stackscope_runtime::debugger::walk::{ERROR, FRAME_ENTRY, FRAME_ENTRY_END, LOCALS, LOCALS_END};
use stackscope_runtime::debugger::{
    complete_locals, register_help, resolve, CommandRequest, InfoLocals, Outcome, ResolveError,
    WalkLimit,
};
use stackscope_runtime::output::BufferOutput;
use stackscope_runtime::{
    Bindings, EvalError, Evaluator, Frame, FrameError, FrameEvaluator, FrameRecord, HelpCatalog,
    Output, SnapshotEvaluator, SnapshotFrame, StackSnapshot, Value, WidthPrinter,
};

// ══════════════════════════════════════════════════════════════════════════════
// Fixtures
// ══════════════════════════════════════════════════════════════════════════════

fn stack(json: &str) -> StackSnapshot {
    StackSnapshot::from_json(json).expect("valid snapshot")
}

/// `n` frames named f0..fn, each with a single `depth` binding.
fn stack_of(n: usize) -> StackSnapshot {
    StackSnapshot {
        frames: (0..n)
            .map(|i| {
                let locals: Bindings = [("depth", Value::Int(i as i64))].into_iter().collect();
                FrameRecord::new(format!("f{i}"), locals)
            })
            .collect(),
        globals: Bindings::new(),
    }
}

fn help() -> HelpCatalog {
    let mut catalog = HelpCatalog::new();
    register_help(&mut catalog);
    catalog
}

/// Run `info locals ARGS` against frame 0 of `stack`.
fn run_frame(stack: &StackSnapshot, args: &[&str]) -> BufferOutput {
    let evaluator = SnapshotEvaluator::new(stack);
    let printer = WidthPrinter::default();
    let catalog = help();
    let command: InfoLocals<SnapshotFrame> = InfoLocals::new(&evaluator, &printer, &catalog);
    let mut out = BufferOutput::new();
    command.run_frame(args, stack.frame(0).as_ref(), &mut out);
    out
}

/// Run the framed walk from frame 0 of `stack`.
fn run_walk(stack: &StackSnapshot, args: &[&str], limit: usize) -> BufferOutput {
    let evaluator = SnapshotEvaluator::new(stack);
    let printer = WidthPrinter::default();
    let catalog = help();
    let command: InfoLocals<SnapshotFrame> = InfoLocals::new(&evaluator, &printer, &catalog);
    let mut out = BufferOutput::new();
    command.run(args, stack.frame(0), WalkLimit::frames(limit), &mut out);
    out
}

/// Split framed output into (index, body lines) per block, asserting that
/// every block is well formed.
fn blocks(out: &BufferOutput) -> Vec<(usize, Vec<String>)> {
    let lines: Vec<&str> = out.lines().iter().map(|l| l.text.as_str()).collect();
    let mut result = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        assert_eq!(lines[i], FRAME_ENTRY, "block must open with FrameEntry");
        let index_line = lines[i + 1];
        let index: usize = index_line
            .strip_prefix("[[[FrameIndex]]] ")
            .and_then(|rest| rest.strip_suffix(" [[[/FrameIndex]]]"))
            .and_then(|n| n.parse().ok())
            .expect("FrameIndex marker");
        assert_eq!(lines[i + 2], LOCALS);
        let mut j = i + 3;
        let mut body = Vec::new();
        while lines[j] != LOCALS_END {
            body.push(lines[j].to_string());
            j += 1;
        }
        assert_eq!(lines[j + 1], FRAME_ENTRY_END);
        result.push((index, body));
        i = j + 2;
    }
    result
}

/// Evaluator that answers every name with the same value.
struct ConstEvaluator(Value);

impl<F: Frame> Evaluator<F> for ConstEvaluator {
    fn evaluate(&self, _name: &str, _frame: &F) -> Result<Value, EvalError> {
        Ok(self.0.clone())
    }
}

/// Evaluator that always fails.
struct FailingEvaluator;

impl<F: Frame> Evaluator<F> for FailingEvaluator {
    fn evaluate(&self, name: &str, _frame: &F) -> Result<Value, EvalError> {
        Err(EvalError::Other(format!("cannot evaluate {name}")))
    }
}

/// A frame that lists a binding it cannot produce.
#[derive(Clone)]
struct VanishingFrame;

impl Frame for VanishingFrame {
    fn function_name(&self) -> &str {
        "vanishing"
    }

    fn local_names(&self) -> Result<Vec<String>, FrameError> {
        Ok(vec!["gone".to_string()])
    }

    fn read_local(&self, name: &str) -> Result<Value, FrameError> {
        Err(FrameError::MissingBinding(name.to_string()))
    }

    fn caller(&self) -> Option<Self> {
        None
    }
}

/// A frame that is its own caller.
#[derive(Clone)]
struct CyclicFrame;

impl Frame for CyclicFrame {
    fn function_name(&self) -> &str {
        "cyclic"
    }

    fn local_names(&self) -> Result<Vec<String>, FrameError> {
        Ok(vec!["x".to_string()])
    }

    fn read_local(&self, _name: &str) -> Result<Value, FrameError> {
        Ok(Value::Int(7))
    }

    fn caller(&self) -> Option<Self> {
        Some(self.clone())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Name resolution
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_absent_name_is_not_a_local() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "locals": { "a": 1 } } ] }"#);
    let frame = stack.frame(0).unwrap();
    assert_eq!(resolve(&frame, "z", &FrameEvaluator), Outcome::NotALocal);
}

#[test]
fn test_synthetic_name_bypasses_evaluator() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "locals": { "_[1]": [1, 2] } } ] }"#);
    let frame = stack.frame(0).unwrap();
    let expected = Value::List(vec![Value::Int(1), Value::Int(2)]);

    let alias = ConstEvaluator(Value::from("from evaluator"));
    assert_eq!(resolve(&frame, "_[1]", &alias), Outcome::Found(expected.clone()));
    assert_eq!(resolve(&frame, "_[1]", &FailingEvaluator), Outcome::Found(expected));
}

#[test]
fn test_ordinary_name_prefers_evaluator() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "locals": { "a": 1 } } ] }"#);
    let frame = stack.frame(0).unwrap();
    let alias = ConstEvaluator(Value::from("aliased"));
    assert_eq!(
        resolve(&frame, "a", &alias),
        Outcome::Found(Value::from("aliased"))
    );
}

#[test]
fn test_evaluator_failure_falls_back_to_binding_table() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "locals": { "a": 1 } } ] }"#);
    let frame = stack.frame(0).unwrap();
    assert_eq!(
        resolve(&frame, "a", &FailingEvaluator),
        Outcome::Found(Value::Int(1))
    );
}

#[test]
fn test_both_paths_failing_is_resolution_failure() {
    let outcome = resolve(&VanishingFrame, "gone", &FailingEvaluator);
    match outcome {
        Outcome::ResolutionFailed(ResolveError::Exhausted { evaluator, raw }) => {
            assert_eq!(evaluator, EvalError::Other("cannot evaluate gone".to_string()));
            assert_eq!(raw, FrameError::MissingBinding("gone".to_string()));
        }
        other => panic!("expected exhausted resolution, got {other:?}"),
    }
}

#[test]
fn test_unreadable_frame_is_resolution_failure() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "unreadable": "corrupt" } ] }"#);
    let frame = stack.frame(0).unwrap();
    assert!(matches!(
        resolve(&frame, "a", &FrameEvaluator),
        Outcome::ResolutionFailed(ResolveError::Frame(FrameError::Unreadable { .. }))
    ));
}

// ══════════════════════════════════════════════════════════════════════════════
// Single-frame rendering
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_all_locals_sorted() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "locals": { "b": 2, "a": "x" } } ] }"#);
    let out = run_frame(&stack, &[]);
    assert_eq!(out.messages(), vec!["a = \"x\"", "b = 2"]);
    assert!(out.errors().is_empty());
}

#[test]
fn test_list_mode_uses_frame_order() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "locals": { "b": 2, "a": 1 } } ] }"#);
    for flag in ["-l", "--list"] {
        let out = run_frame(&stack, &[flag]);
        assert_eq!(out.messages(), vec!["b", "a"]);
    }
}

#[test]
fn test_wildcard_shows_names_only() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "locals": { "a": 1, "b": 2 } } ] }"#);
    let out = run_frame(&stack, &["*"]);
    assert_eq!(out.lines()[0].text, "locals");
    let body = out.messages().join("\n");
    assert!(body.contains('a'));
    assert!(body.contains('b'));
    assert!(!body.contains('='));
    assert!(!body.contains('1'));
}

#[test]
fn test_named_locals_report_missing_names() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "locals": { "a": 1 } } ] }"#);
    let out = run_frame(&stack, &["a", "z"]);
    assert_eq!(out.messages(), vec!["a = 1"]);
    assert_eq!(out.errors(), vec!["z is not a local variable"]);
}

#[test]
fn test_named_locals_keep_given_order() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "locals": { "a": 1, "b": 2 } } ] }"#);
    let out = run_frame(&stack, &["b", "missing", "a"]);
    assert_eq!(
        out.text(),
        "b = 2\nmissing is not a local variable\na = 1"
    );
}

#[test]
fn test_synthetic_name_renders_raw_value() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "locals": { "_[2]": "tmp" } } ] }"#);
    let out = run_frame(&stack, &["_[2]"]);
    assert_eq!(out.messages(), vec!["_[2] = \"tmp\""]);
}

#[test]
fn test_unavailable_value_is_marked() {
    let printer = WidthPrinter::default();
    let catalog = help();
    let command: InfoLocals<VanishingFrame> =
        InfoLocals::new(&FailingEvaluator, &printer, &catalog);
    let mut out = BufferOutput::new();
    command.run_frame(&["gone"], Some(&VanishingFrame), &mut out);
    let messages = out.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("gone = <value unavailable: "));
}

#[test]
fn test_help_short_circuits() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "locals": { "a": 1 } } ] }"#);
    let out = run_frame(&stack, &["-h"]);
    assert_eq!(out.messages()[0], "**info locals** [-l | --list | -h | --help]");
    assert!(!out.text().contains("a = 1"));
}

#[test]
fn test_unknown_flag_is_one_error() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "locals": { "a": 1 } } ] }"#);
    let out = run_frame(&stack, &["-x"]);
    assert_eq!(out.errors(), vec!["option -x not recognized"]);
    assert_eq!(out.lines().len(), 1);
}

#[test]
fn test_no_frame_selected() {
    let stack = StackSnapshot::default();
    let out = run_frame(&stack, &[]);
    assert_eq!(out.errors(), vec!["No frame selected"]);
    assert!(out.messages().is_empty());
}

#[test]
fn test_unreadable_frame_reports_error() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "unreadable": "corrupt" } ] }"#);
    let out = run_frame(&stack, &[]);
    assert_eq!(out.errors(), vec!["frame 'f' is unreadable: corrupt"]);
}

#[test]
fn test_width_wraps_long_values() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "locals": { "xs": [1, 2, 3] } } ] }"#);
    let evaluator = SnapshotEvaluator::new(&stack);
    let printer = WidthPrinter::default();
    let catalog = help();
    let command: InfoLocals<SnapshotFrame> =
        InfoLocals::new(&evaluator, &printer, &catalog).with_width(10);
    let mut out = BufferOutput::new();
    command.run_frame(&["xs"], stack.frame(0).as_ref(), &mut out);
    assert_eq!(
        out.messages(),
        vec!["xs =", "  [", "    1,", "    2,", "    3", "  ]"]
    );
}

#[test]
fn test_large_frame_lists_every_binding_sorted() {
    let locals: Bindings = (0..10_000i64)
        .rev()
        .map(|i| (format!("v{i:05}"), Value::Int(i)))
        .collect();
    let stack = StackSnapshot {
        frames: vec![FrameRecord::new("big", locals)],
        globals: Bindings::new(),
    };

    let out = run_frame(&stack, &[]);
    let messages = out.messages();
    assert_eq!(messages.len(), 10_000);
    assert_eq!(messages[0], "v00000 = 0");
    assert_eq!(messages[9_999], "v09999 = 9999");
    assert!(out.errors().is_empty());
}

#[test]
fn test_unsigned_integer_shown_exactly() {
    let stack = stack(
        r#"{ "frames": [ { "function": "f", "locals": { "h": 18446744073709551615 } } ] }"#,
    );
    assert_eq!(
        run_frame(&stack, &["h"]).messages(),
        vec!["h = 18446744073709551615"]
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Multi-frame walk
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_walk_output_protocol() {
    let stack = stack(
        r#"{ "frames": [
            { "function": "inner", "locals": { "a": 1 } },
            { "function": "main", "locals": { "argv": ["prog"] } }
        ] }"#,
    );
    let out = run_walk(&stack, &[], 0);
    insta::assert_snapshot!(out.text(), @r###"
    [[[FrameEntry]]]
    [[[FrameIndex]]] 0 [[[/FrameIndex]]]
    [[[Locals]]]
    a = 1
    [[[/Locals]]]
    [[[/FrameEntry]]]
    [[[FrameEntry]]]
    [[[FrameIndex]]] 1 [[[/FrameIndex]]]
    [[[Locals]]]
    argv = ["prog"]
    [[[/Locals]]]
    [[[/FrameEntry]]]
    "###);
}

#[test]
fn test_walk_respects_limit() {
    let stack = stack_of(5);
    let out = run_walk(&stack, &[], 3);
    let indices: Vec<usize> = blocks(&out).into_iter().map(|(i, _)| i).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[test]
fn test_walk_isolates_failing_frame() {
    let mut stack = stack_of(5);
    stack.frames[2].unreadable = Some("corrupt".to_string());
    let out = run_walk(&stack, &[], 0);

    let blocks = blocks(&out);
    assert_eq!(blocks.len(), 5);
    for (position, (index, body)) in blocks.iter().enumerate() {
        assert_eq!(*index, position);
        if position == 2 {
            assert_eq!(body.iter().filter(|l| l.as_str() == ERROR).count(), 1);
            assert!(body.iter().any(|l| l.contains("frame 'f2' is unreadable: corrupt")));
            assert!(body.iter().any(|l| l.contains("Unreadable")));
        } else {
            assert_eq!(body, &vec![format!("depth = {position}")]);
        }
    }
}

#[test]
fn test_walk_replays_named_request_per_frame() {
    let stack = stack(
        r#"{ "frames": [
            { "function": "inner", "locals": { "a": 1 } },
            { "function": "main", "locals": { "b": 2 } }
        ] }"#,
    );
    let out = run_walk(&stack, &["a"], 0);
    let blocks = blocks(&out);
    assert_eq!(blocks[0].1, vec!["a = 1"]);
    assert_eq!(blocks[1].1, vec!["a is not a local variable"]);
}

#[test]
fn test_walk_help_emits_no_blocks() {
    let out = run_walk(&stack_of(3), &["--help"], 0);
    assert!(!out.text().contains(FRAME_ENTRY));
    assert!(out.text().contains("**info locals**"));
}

#[test]
fn test_walk_bad_flag_emits_one_error_and_no_markers() {
    let out = run_walk(&stack_of(3), &["-x"], 0);
    assert_eq!(out.lines().len(), 1);
    assert_eq!(out.errors(), vec!["option -x not recognized"]);
}

#[test]
fn test_walk_without_frames() {
    let out = run_walk(&StackSnapshot::default(), &[], 0);
    assert_eq!(out.errors(), vec!["No frame selected"]);
    assert!(!out.text().contains(FRAME_ENTRY));
}

#[test]
fn test_walk_terminates_on_cyclic_chain_with_limit() {
    let printer = WidthPrinter::default();
    let catalog = help();
    let command: InfoLocals<CyclicFrame> = InfoLocals::new(&FrameEvaluator, &printer, &catalog);
    let mut out = BufferOutput::new();
    let args: [&str; 0] = [];
    command.run(&args, Some(CyclicFrame), WalkLimit::frames(4), &mut out);
    assert_eq!(blocks(&out).len(), 4);
}

/// Stops accepting output once `capacity` lines were written.
struct ClosingOutput {
    written: usize,
    capacity: usize,
}

impl Output for ClosingOutput {
    fn msg(&mut self, _text: &str) {
        self.written += 1;
    }

    fn errmsg(&mut self, _text: &str) {
        self.written += 1;
    }

    fn section(&mut self, _title: &str) {
        self.written += 1;
    }

    fn is_closed(&self) -> bool {
        self.written >= self.capacity
    }
}

#[test]
fn test_walk_stops_when_output_closes() {
    let stack = stack_of(10);
    let evaluator = SnapshotEvaluator::new(&stack);
    let printer = WidthPrinter::default();
    let catalog = help();
    let command: InfoLocals<SnapshotFrame> = InfoLocals::new(&evaluator, &printer, &catalog);
    let request = CommandRequest::default();

    // One block of a single-binding frame is six lines.
    let mut out = ClosingOutput {
        written: 0,
        capacity: 12,
    };
    let visited = command.walk(&request, stack.frame(0), WalkLimit::UNBOUNDED, &mut out);
    assert_eq!(visited, 2);
    assert_eq!(out.written, 12);
}

// ══════════════════════════════════════════════════════════════════════════════
// Completion
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_completion_filters_names_and_wildcard() {
    let stack = stack(
        r#"{ "frames": [ { "function": "f", "locals": { "beta": 1, "alpha": 2, "alps": 3 } } ] }"#,
    );
    let frame = stack.frame(0).unwrap();
    assert_eq!(complete_locals(&frame, ""), vec!["*", "alpha", "alps", "beta"]);
    assert_eq!(complete_locals(&frame, "al"), vec!["alpha", "alps"]);
    assert_eq!(complete_locals(&frame, "*"), vec!["*"]);
}

#[test]
fn test_completion_on_unreadable_frame() {
    let stack = stack(r#"{ "frames": [ { "function": "f", "unreadable": "corrupt" } ] }"#);
    let frame = stack.frame(0).unwrap();
    assert_eq!(complete_locals(&frame, ""), vec!["*"]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Properties
// ══════════════════════════════════════════════════════════════════════════════

fn snapshot_with_names(names: &[String]) -> StackSnapshot {
    let locals: Bindings = names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.clone(), Value::Int(i as i64)))
        .collect();
    StackSnapshot {
        frames: vec![FrameRecord::new("f", locals)],
        globals: Bindings::new(),
    }
}

proptest! {
    #[test]
    fn prop_completion_is_sorted_union_with_wildcard(
        names in prop::collection::vec("[a-z_]{1,6}", 0..12)
    ) {
        let stack = snapshot_with_names(&names);
        let frame = stack.frame(0).unwrap();
        let candidates = complete_locals(&frame, "");

        prop_assert!(candidates.contains(&"*".to_string()));
        for name in &names {
            prop_assert!(candidates.contains(name));
        }
        let mut sorted = candidates.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(candidates, sorted);
    }

    #[test]
    fn prop_walk_visits_min_of_limit_and_depth(depth in 0usize..8, limit in 1usize..10) {
        let stack = stack_of(depth);
        let out = run_walk(&stack, &[], limit);
        let indices: Vec<usize> = if depth == 0 {
            Vec::new()
        } else {
            blocks(&out).into_iter().map(|(i, _)| i).collect()
        };
        prop_assert_eq!(indices, (0..depth.min(limit)).collect::<Vec<_>>());
    }

    #[test]
    fn prop_synthetic_names_ignore_evaluator(n in 0u32..10_000, stored in any::<i64>()) {
        let name = format!("_[{n}]");
        let mut stack = snapshot_with_names(&[]);
        stack.frames[0].locals.insert(name.clone(), Value::Int(stored));
        let frame = stack.frame(0).unwrap();
        prop_assert_eq!(
            resolve(&frame, &name, &FailingEvaluator),
            Outcome::Found(Value::Int(stored))
        );
    }
}
