//! Multi-frame `info locals` with a structured output protocol.
//!
//! Every visited frame is written as one block that a driving tool can split
//! on:
//!
//! ```text
//! [[[FrameEntry]]]
//! [[[FrameIndex]]] 0 [[[/FrameIndex]]]
//! [[[Locals]]]
//! a = 1
//! [[[/Locals]]]
//! [[[/FrameEntry]]]
//! ```
//!
//! A frame that fails to render gets an `[[[Error]]]` block inside its
//! `[[[Locals]]]` block instead of its locals, and the walk carries on.

use super::args::CommandRequest;
use super::locals::{parse_or_report, InfoLocals};
use crate::frame::Frame;
use crate::output::{BufferOutput, Output};
use tracing::{debug, warn};

pub const FRAME_ENTRY: &str = "[[[FrameEntry]]]";
pub const FRAME_ENTRY_END: &str = "[[[/FrameEntry]]]";
pub const FRAME_INDEX: &str = "[[[FrameIndex]]]";
pub const FRAME_INDEX_END: &str = "[[[/FrameIndex]]]";
pub const LOCALS: &str = "[[[Locals]]]";
pub const LOCALS_END: &str = "[[[/Locals]]]";
pub const ERROR: &str = "[[[Error]]]";
pub const ERROR_END: &str = "[[[/Error]]]";
pub const EXCEPTION_MESSAGE: &str = "[[[ExceptionMessage]]]";
pub const EXCEPTION_MESSAGE_END: &str = "[[[/ExceptionMessage]]]";
pub const EXCEPTION_TYPE: &str = "[[[ExceptionType]]]";
pub const EXCEPTION_TYPE_END: &str = "[[[/ExceptionType]]]";

/// Upper bound on the number of frames a walk visits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkLimit(Option<usize>);

impl WalkLimit {
    /// Walk until the outermost frame.
    pub const UNBOUNDED: WalkLimit = WalkLimit(None);

    /// Visit at most `n` frames; `0` means unbounded.
    pub fn frames(n: usize) -> Self {
        if n == 0 {
            Self::UNBOUNDED
        } else {
            WalkLimit(Some(n))
        }
    }

    /// Whether a walk that has visited `visited` frames may visit another.
    pub fn allows(self, visited: usize) -> bool {
        self.0.map_or(true, |max| visited < max)
    }

    pub fn get(self) -> Option<usize> {
        self.0
    }
}

impl From<usize> for WalkLimit {
    fn from(n: usize) -> Self {
        Self::frames(n)
    }
}

impl From<Option<usize>> for WalkLimit {
    fn from(n: Option<usize>) -> Self {
        n.map_or(Self::UNBOUNDED, Self::frames)
    }
}

impl<'a, F: Frame> InfoLocals<'a, F> {
    /// Parse `args` once, then show the locals of `start` and each of its
    /// callers in turn.
    ///
    /// Without a `limit` the caller chain must be finite and acyclic.
    pub fn run<S: AsRef<str>>(
        &self,
        args: &[S],
        start: Option<F>,
        limit: WalkLimit,
        out: &mut dyn Output,
    ) {
        let Some(request) = parse_or_report(args, out) else {
            return;
        };
        self.walk(&request, start, limit, out);
    }

    /// Walk from `start` toward the outermost frame, writing one framed block
    /// per frame. Returns the number of frames visited.
    pub fn walk(
        &self,
        request: &CommandRequest,
        start: Option<F>,
        limit: WalkLimit,
        out: &mut dyn Output,
    ) -> usize {
        if request.help_requested {
            self.show_help(out);
            return 0;
        }
        if start.is_none() {
            out.errmsg("No frame selected");
            return 0;
        }

        let mut cursor = start;
        let mut count = 0;
        while let Some(frame) = cursor {
            if !limit.allows(count) {
                break;
            }
            if out.is_closed() {
                debug!(visited = count, "output closed, stopping walk");
                break;
            }
            out.msg(FRAME_ENTRY);
            out.msg(&format!("{FRAME_INDEX} {count} {FRAME_INDEX_END}"));
            out.msg(LOCALS);

            let mut buffer = BufferOutput::new();
            match self.render(request, Some(&frame), &mut buffer) {
                Ok(()) => buffer.replay(out),
                Err(e) => {
                    warn!(
                        frame = count,
                        function = frame.function_name(),
                        error = %e,
                        "failed to render frame locals"
                    );
                    out.msg(ERROR);
                    out.msg(&format!("{EXCEPTION_MESSAGE} {e} {EXCEPTION_MESSAGE_END}"));
                    out.msg(&format!("{EXCEPTION_TYPE} {} {EXCEPTION_TYPE_END}", e.kind()));
                    out.msg(ERROR_END);
                }
            }

            out.msg(LOCALS_END);
            out.msg(FRAME_ENTRY_END);

            cursor = frame.caller();
            count += 1;
        }
        count
    }
}
