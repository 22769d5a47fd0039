//! Stackscope Runtime - local-variable inspection for a halted program
//!
//! This library provides the pieces of a source-level debugger's
//! `info locals` command:
//! - A read-only frame abstraction over the host's call stack
//! - Name resolution with an evaluator fallback
//! - Single-frame rendering and a framed multi-frame walk
//! - Tab-completion of binding names
//! - Recorded stack snapshots that stand in for a live host runtime

/// Stackscope runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod command;
pub mod complete;
pub mod debugger;
pub mod format;
pub mod frame;
pub mod output;
pub mod snapshot;
pub mod value;

// Re-export commonly used types
pub use command::{CommandRunner, HelpCatalog};
pub use format::{columnize, PrettyPrinter, WidthPrinter};
pub use frame::{EvalError, Evaluator, Frame, FrameError, FrameEvaluator};
pub use output::{BufferOutput, ColorMode, Output, TermOutput};
pub use snapshot::{Bindings, FrameRecord, SnapshotError, SnapshotEvaluator, SnapshotFrame, StackSnapshot};
pub use value::Value;
