//! Name resolution within one frame.
//!
//! Checks run in a fixed order:
//!
//! 1. a name absent from the frame's bindings is [`Outcome::NotALocal`];
//! 2. a synthetic temporary (`_[1]`, `_[2]`, ...) is read straight from the
//!    binding table and never handed to the evaluator;
//! 3. any other name goes to the evaluator first, then falls back to the raw
//!    binding table. Only when both fail is the outcome
//!    [`Outcome::ResolutionFailed`].

use crate::frame::{EvalError, Evaluator, Frame, FrameError};
use crate::value::Value;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Why a present binding could not be read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// The frame's binding table could not be read at all.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// Both the evaluator and the raw read failed.
    #[error("{raw} (evaluator: {evaluator})")]
    Exhausted { evaluator: EvalError, raw: FrameError },
}

/// Result of resolving one name.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Found(Value),
    NotALocal,
    ResolutionFailed(ResolveError),
}

/// How a binding name is treated by resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Written by the programmer.
    Ordinary,
    /// Compiler-generated temporary of the form `_[N]`; unsafe to re-evaluate.
    Synthetic,
}

fn synthetic_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^_\[[0-9]+\]$").expect("valid synthetic-name pattern"))
}

/// Classify a binding name.
pub fn classify(name: &str) -> BindingKind {
    if synthetic_pattern().is_match(name) {
        BindingKind::Synthetic
    } else {
        BindingKind::Ordinary
    }
}

/// Resolve `name` in `frame`.
pub fn resolve<F: Frame>(frame: &F, name: &str, evaluator: &dyn Evaluator<F>) -> Outcome {
    match frame.has_local(name) {
        Ok(true) => {}
        Ok(false) => return Outcome::NotALocal,
        Err(e) => return Outcome::ResolutionFailed(e.into()),
    }

    if classify(name) == BindingKind::Synthetic {
        return match frame.read_local(name) {
            Ok(value) => Outcome::Found(value),
            Err(e) => Outcome::ResolutionFailed(e.into()),
        };
    }

    let evaluator_error = match evaluator.evaluate(name, frame) {
        Ok(value) => return Outcome::Found(value),
        Err(e) => e,
    };
    debug!(name, error = %evaluator_error, "evaluator failed, reading binding table");

    match frame.read_local(name) {
        Ok(value) => Outcome::Found(value),
        Err(raw) => Outcome::ResolutionFailed(ResolveError::Exhausted {
            evaluator: evaluator_error,
            raw,
        }),
    }
}
