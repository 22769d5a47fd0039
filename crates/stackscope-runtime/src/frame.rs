//! Activation records as seen by the debugger.
//!
//! A [`Frame`] is a borrowed, read-only handle onto one record of a halted
//! program's call stack. The host runtime owns the stack; handles are cheap
//! to clone and must not be kept past the command that obtained them.
//!
//! ```text
//! innermost                                  outermost
//! [frame 0] --caller--> [frame 1] --caller--> [frame 2] --caller--> None
//! ```

use crate::value::Value;
use thiserror::Error;

/// Failure reading host frame state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    #[error("frame '{function}' is unreadable: {reason}")]
    Unreadable { function: String, reason: String },

    #[error("no binding named '{0}' in frame")]
    MissingBinding(String),
}

impl FrameError {
    /// Short, stable name of the failure kind (used in protocol markers).
    pub fn kind(&self) -> &'static str {
        match self {
            FrameError::Unreadable { .. } => "Unreadable",
            FrameError::MissingBinding(_) => "MissingBinding",
        }
    }
}

/// Failure from the expression evaluator collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("name '{0}' is not defined")]
    Undefined(String),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("{0}")]
    Other(String),
}

/// Read-only view of one activation record.
pub trait Frame: Clone {
    /// Name of the executing function (for backtraces and diagnostics).
    fn function_name(&self) -> &str;

    /// Names of the bindings local to this frame, in the frame's own order.
    fn local_names(&self) -> Result<Vec<String>, FrameError>;

    /// Raw read of one binding from the frame's binding table.
    fn read_local(&self, name: &str) -> Result<Value, FrameError>;

    /// The calling frame, or `None` at the outermost frame.
    fn caller(&self) -> Option<Self>;

    /// Whether `name` is a local binding of this frame.
    fn has_local(&self, name: &str) -> Result<bool, FrameError> {
        Ok(self.local_names()?.iter().any(|n| n == name))
    }
}

/// Evaluates a name in the context of the whole debugger, not just the
/// frame's raw binding table.
pub trait Evaluator<F: Frame> {
    fn evaluate(&self, name: &str, frame: &F) -> Result<Value, EvalError>;
}

/// Evaluator that only consults the frame itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameEvaluator;

impl<F: Frame> Evaluator<F> for FrameEvaluator {
    fn evaluate(&self, name: &str, frame: &F) -> Result<Value, EvalError> {
        if !frame.has_local(name)? {
            return Err(EvalError::Undefined(name.to_string()));
        }
        Ok(frame.read_local(name)?)
    }
}

/// Iterate from `start` through successive callers.
///
/// Unbounded: a cyclic caller chain never ends. Callers that cannot trust the
/// host chain must bound it with `take`.
pub fn callers<F: Frame>(start: Option<F>) -> impl Iterator<Item = F> {
    std::iter::successors(start, |frame| frame.caller())
}
