//! Tab completion for the debugger prompt.

use rustyline::completion::Completer;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use stackscope_runtime::complete::complete_token;
use stackscope_runtime::debugger::complete_locals;
use stackscope_runtime::debugger::locals::{MIN_ABBREV, NAME};
use stackscope_runtime::StackSnapshot;

use super::{is_abbrev, INFO_MIN_ABBREV};

/// Command words offered at the start of a line, sorted.
pub const COMMAND_WORDS: &[&str] = &[
    "backtrace",
    "bt",
    "down",
    "exit",
    "frame",
    "help",
    "info",
    "quit",
    "set",
    "show",
    "up",
    "where",
];

/// Line-editor helper that completes command words and `info locals`
/// arguments against the selected frame.
pub struct ReplHelper<'s> {
    stack: &'s StackSnapshot,
    selected: usize,
}

impl<'s> ReplHelper<'s> {
    pub fn new(stack: &'s StackSnapshot) -> Self {
        Self { stack, selected: 0 }
    }

    /// Follow the prompt's frame selection.
    pub fn select(&mut self, index: usize) {
        self.selected = index;
    }

    /// Completions for the word ending at byte `pos` of `line`: the start of
    /// that word and the candidates replacing it.
    pub fn complete_line(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let head = line.get(..pos).unwrap_or(line);
        let start = head.trim_end_matches(|c: char| !c.is_whitespace()).len();
        let word = &head[start..];
        let before: Vec<&str> = head[..start].split_whitespace().collect();

        let candidates = match before.as_slice() {
            [] => complete_token(COMMAND_WORDS, word),
            [cmd] if is_abbrev(cmd, "info", INFO_MIN_ABBREV) => complete_token(&[NAME], word),
            [cmd, sub, ..]
                if is_abbrev(cmd, "info", INFO_MIN_ABBREV) && is_abbrev(sub, NAME, MIN_ABBREV) =>
            {
                match self.stack.frame(self.selected) {
                    Some(frame) => complete_locals(&frame, word),
                    None => Vec::new(),
                }
            }
            _ => Vec::new(),
        };
        (start, candidates)
    }
}

impl Completer for ReplHelper<'_> {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(self.complete_line(line, pos))
    }
}

impl Hinter for ReplHelper<'_> {
    type Hint = String;
}

impl Highlighter for ReplHelper<'_> {}

impl Validator for ReplHelper<'_> {}

impl Helper for ReplHelper<'_> {}
