//! Recorded call stacks.
//!
//! A snapshot is a JSON document captured from a halted program. It stands in
//! for a live host runtime: [`SnapshotFrame`] implements [`Frame`] over it.
//!
//! ```json
//! {
//!   "frames": [
//!     { "function": "inner", "locals": { "x": 1, "_[1]": [1, 2] } },
//!     { "function": "main", "locals": {}, "unreadable": "stack corrupted" }
//!   ],
//!   "globals": { "VERSION": "1.0" }
//! }
//! ```
//!
//! Frames are listed innermost first.

use crate::frame::{EvalError, Evaluator, Frame, FrameError};
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Snapshot loading errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Bindings in document order.
///
/// Backed by an insertion-ordered map so that lookups by name stay constant
/// time while listings keep the order the bindings were recorded in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bindings(IndexMap<String, Value>);

impl Bindings {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert or replace a binding, keeping the original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, Value)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (N, Value)>>(iter: I) -> Self {
        let mut bindings = Bindings::new();
        for (name, value) in iter {
            bindings.insert(name, value);
        }
        bindings
    }
}

/// One recorded activation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameRecord {
    pub function: String,

    #[serde(default)]
    pub locals: Bindings,

    /// When set, every read of this frame fails with this reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unreadable: Option<String>,
}

impl FrameRecord {
    pub fn new(function: impl Into<String>, locals: Bindings) -> Self {
        Self {
            function: function.into(),
            locals,
            unreadable: None,
        }
    }
}

/// A recorded call stack, innermost frame first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackSnapshot {
    #[serde(default)]
    pub frames: Vec<FrameRecord>,

    #[serde(default)]
    pub globals: Bindings,
}

impl StackSnapshot {
    /// Parse a snapshot from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let text = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Handle onto the frame at `index` (0 = innermost).
    pub fn frame(&self, index: usize) -> Option<SnapshotFrame<'_>> {
        (index < self.frames.len()).then_some(SnapshotFrame {
            stack: self,
            index,
        })
    }
}

/// Borrowed handle onto one frame of a [`StackSnapshot`].
#[derive(Debug, Clone, Copy)]
pub struct SnapshotFrame<'a> {
    stack: &'a StackSnapshot,
    index: usize,
}

impl<'a> SnapshotFrame<'a> {
    /// Position in the stack (0 = innermost).
    pub fn index(&self) -> usize {
        self.index
    }

    fn record(&self) -> &'a FrameRecord {
        &self.stack.frames[self.index]
    }

    fn readable(&self) -> Result<&'a FrameRecord, FrameError> {
        let record = self.record();
        match &record.unreadable {
            Some(reason) => Err(FrameError::Unreadable {
                function: record.function.clone(),
                reason: reason.clone(),
            }),
            None => Ok(record),
        }
    }
}

impl Frame for SnapshotFrame<'_> {
    fn function_name(&self) -> &str {
        &self.record().function
    }

    fn local_names(&self) -> Result<Vec<String>, FrameError> {
        Ok(self.readable()?.locals.names().map(String::from).collect())
    }

    fn has_local(&self, name: &str) -> Result<bool, FrameError> {
        Ok(self.readable()?.locals.contains(name))
    }

    fn read_local(&self, name: &str) -> Result<Value, FrameError> {
        self.readable()?
            .locals
            .get(name)
            .cloned()
            .ok_or_else(|| FrameError::MissingBinding(name.to_string()))
    }

    fn caller(&self) -> Option<Self> {
        self.stack.frame(self.index + 1)
    }
}

/// Evaluates names against the frame locals, then the snapshot globals.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotEvaluator<'a> {
    stack: &'a StackSnapshot,
}

impl<'a> SnapshotEvaluator<'a> {
    pub fn new(stack: &'a StackSnapshot) -> Self {
        Self { stack }
    }
}

impl<'a> Evaluator<SnapshotFrame<'a>> for SnapshotEvaluator<'a> {
    fn evaluate(&self, name: &str, frame: &SnapshotFrame<'a>) -> Result<Value, EvalError> {
        match frame.read_local(name) {
            Ok(value) => Ok(value),
            Err(FrameError::MissingBinding(_)) => self
                .stack
                .globals
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::Undefined(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}
