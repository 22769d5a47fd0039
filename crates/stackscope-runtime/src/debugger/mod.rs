//! Local-variable inspection for the stackscope debugger.
//!
//! `info locals` is split into small pieces that can be tested on their own:
//!
//! - [`args`] parses the command's flags and names into a [`CommandRequest`];
//! - [`resolve`] decides how each requested name is read from a frame;
//! - [`locals`] renders one frame ([`InfoLocals::render`]) and offers
//!   tab-completion candidates;
//! - [`walk`] visits a frame and its callers, wrapping each frame's output in
//!   protocol markers ([`InfoLocals::walk`]).
//!
//! # Quick-start
//!
//! ```rust
//! use stackscope_runtime::debugger::{InfoLocals, WalkLimit};
//! use stackscope_runtime::output::BufferOutput;
//! use stackscope_runtime::{HelpCatalog, SnapshotEvaluator, SnapshotFrame, StackSnapshot, WidthPrinter};
//!
//! let stack = StackSnapshot::from_json(
//!     r#"{ "frames": [ { "function": "main", "locals": { "x": 1 } } ] }"#,
//! ).unwrap();
//! let evaluator = SnapshotEvaluator::new(&stack);
//! let printer = WidthPrinter::default();
//! let help = HelpCatalog::new();
//! let command: InfoLocals<SnapshotFrame> = InfoLocals::new(&evaluator, &printer, &help);
//!
//! let mut out = BufferOutput::new();
//! command.run_frame(&["x"], stack.frame(0).as_ref(), &mut out);
//! assert_eq!(out.messages(), vec!["x = 1"]);
//!
//! let mut framed = BufferOutput::new();
//! let args: [&str; 0] = [];
//! command.run(&args, stack.frame(0), WalkLimit::UNBOUNDED, &mut framed);
//! assert!(framed.text().contains("[[[FrameIndex]]] 0 [[[/FrameIndex]]]"));
//! ```

pub mod args;
pub mod locals;
pub mod resolve;
pub mod walk;

pub use args::{ArgError, CommandRequest, WILDCARD};
pub use locals::{complete_locals, register_help, InfoLocals, RenderError};
pub use resolve::{classify, resolve, BindingKind, Outcome, ResolveError};
pub use walk::WalkLimit;
