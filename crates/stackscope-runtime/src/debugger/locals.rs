//! The `info locals` command for a single frame.

use super::args::{CommandRequest, WILDCARD};
use super::resolve::{resolve, Outcome};
use crate::command::{CommandRunner, HelpCatalog};
use crate::complete::complete_token;
use crate::format::{columnize, PrettyPrinter};
use crate::frame::{Evaluator, Frame, FrameError};
use crate::output::Output;
use thiserror::Error;
use tracing::debug;

/// Subcommand name under `info`.
pub const NAME: &str = "locals";
/// Shortest accepted abbreviation of [`NAME`].
pub const MIN_ABBREV: usize = 2;
/// The command needs a live stack to do anything useful.
pub const NEED_STACK: bool = true;
pub const SHORT_HELP: &str = "Show the local variables of current stack frame";
pub const HELP: &str = "\
**info locals** [-l | --list | -h | --help]

**info locals** [*name* ...]

**info locals** *

With no arguments, show every local variable of the selected stack
frame as `name = value`, sorted by name. Given names, show just those
variables, in the order given.

With `*`, show only the names of the local variables.

With `-l` or `--list`, list the names without their values, in the
order the frame keeps them.

See also:
---------
`frame`, `backtrace`";

/// Default display width when none is configured.
pub const DEFAULT_WIDTH: usize = 80;

/// Register the help texts of `info locals`.
pub fn register_help(catalog: &mut HelpCatalog) {
    catalog.register(&["info", NAME], SHORT_HELP, HELP);
}

/// A frame that could not be rendered.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Frame(#[from] FrameError),
}

impl RenderError {
    /// Short, stable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderError::Frame(e) => e.kind(),
        }
    }
}

/// `info locals` bound to its collaborators.
pub struct InfoLocals<'a, F: Frame> {
    pub(super) evaluator: &'a dyn Evaluator<F>,
    pub(super) printer: &'a dyn PrettyPrinter,
    pub(super) commands: &'a dyn CommandRunner,
    pub(super) width: usize,
}

impl<'a, F: Frame> InfoLocals<'a, F> {
    pub fn new(
        evaluator: &'a dyn Evaluator<F>,
        printer: &'a dyn PrettyPrinter,
        commands: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            evaluator,
            printer,
            commands,
            width: DEFAULT_WIDTH,
        }
    }

    /// Set the display width used for values and name columns.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Parse `args` and show the locals of `frame` only.
    pub fn run_frame<S: AsRef<str>>(&self, args: &[S], frame: Option<&F>, out: &mut dyn Output) {
        let Some(request) = parse_or_report(args, out) else {
            return;
        };
        if let Err(e) = self.render(&request, frame, out) {
            out.errmsg(&e.to_string());
        }
    }

    /// Render one frame for an already parsed request.
    pub fn render(
        &self,
        request: &CommandRequest,
        frame: Option<&F>,
        out: &mut dyn Output,
    ) -> Result<(), RenderError> {
        if request.help_requested {
            self.show_help(out);
            return Ok(());
        }
        let Some(frame) = frame else {
            out.errmsg("No frame selected");
            return Ok(());
        };

        if request.list_only {
            for name in frame.local_names()? {
                out.msg(&name);
            }
        } else if request.is_wildcard() {
            let names = frame.local_names()?;
            out.section("locals");
            for line in columnize(&names, self.width) {
                out.msg(&line);
            }
        } else if request.names.is_empty() {
            let mut names = frame.local_names()?;
            names.sort();
            for name in &names {
                self.show_binding(frame, name, out);
            }
        } else {
            for name in &request.names {
                if frame.has_local(name)? {
                    self.show_binding(frame, name, out);
                } else {
                    out.errmsg(&format!("{name} is not a local variable"));
                }
            }
        }
        Ok(())
    }

    pub(super) fn show_help(&self, out: &mut dyn Output) {
        self.commands.run_command(&["help", "info", NAME], out);
    }

    fn show_binding(&self, frame: &F, name: &str, out: &mut dyn Output) {
        let prefix = format!("{name} =");
        match resolve(frame, name, self.evaluator) {
            Outcome::Found(value) => {
                for line in self.printer.pp(&value, self.width, &prefix) {
                    out.msg(&line);
                }
            }
            Outcome::NotALocal => out.errmsg(&format!("{name} is not a local variable")),
            Outcome::ResolutionFailed(e) => {
                out.msg(&format!("{prefix} <value unavailable: {e}>"));
            }
        }
    }
}

pub(super) fn parse_or_report<S: AsRef<str>>(
    args: &[S],
    out: &mut dyn Output,
) -> Option<CommandRequest> {
    match CommandRequest::parse(args) {
        Ok(request) => Some(request),
        Err(e) => {
            out.errmsg(&e.to_string());
            None
        }
    }
}

/// Completion candidates for `info locals` arguments: the frame's binding
/// names and the wildcard, sorted, filtered by `prefix`.
pub fn complete_locals<F: Frame>(frame: &F, prefix: &str) -> Vec<String> {
    let mut candidates = frame.local_names().unwrap_or_else(|e| {
        debug!(error = %e, "no completion candidates from frame");
        Vec::new()
    });
    candidates.push(WILDCARD.to_string());
    candidates.sort();
    candidates.dedup();
    complete_token(&candidates, prefix)
}
