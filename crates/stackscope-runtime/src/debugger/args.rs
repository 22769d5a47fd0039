//! Argument parsing for `info locals`.
//!
//! Follows getopt conventions: short flags may be combined (`-lh`), long
//! flags may be abbreviated to a unique prefix (`--li`), `--` ends the
//! options, and the first non-option token ends them too, so everything
//! after it is a name.

use thiserror::Error;

/// Token that asks for the names of every binding.
pub const WILDCARD: &str = "*";

/// Argument errors. The display text is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    #[error("option -{0} not recognized")]
    UnknownShort(char),

    #[error("option --{0} not recognized")]
    UnknownLong(String),

    #[error("option --{0} must not have an argument")]
    UnexpectedArgument(String),

    #[error("option --{0} not a unique prefix")]
    AmbiguousPrefix(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flag {
    Help,
    List,
}

const SHORT_FLAGS: &[(char, Flag)] = &[('h', Flag::Help), ('l', Flag::List)];
const LONG_FLAGS: &[(&str, Flag)] = &[("help", Flag::Help), ("list", Flag::List)];

/// A parsed `info locals` invocation.
///
/// Built once per command and replayed unchanged for every frame visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRequest {
    /// `-h` / `--help`: show help and inspect nothing.
    pub help_requested: bool,
    /// `-l` / `--list`: names only, in the frame's own order.
    pub list_only: bool,
    /// Positional names, in the order given.
    pub names: Vec<String>,
}

impl CommandRequest {
    /// Parse the words following `info locals`.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, ArgError> {
        let mut request = CommandRequest::default();
        let mut rest = 0;

        while rest < args.len() {
            let arg = args[rest].as_ref();
            if arg == "--" {
                rest += 1;
                break;
            }
            if let Some(long) = arg.strip_prefix("--") {
                request.set(parse_long(long)?);
            } else if let Some(shorts) = arg.strip_prefix('-').filter(|s| !s.is_empty()) {
                for c in shorts.chars() {
                    request.set(parse_short(c)?);
                }
            } else {
                break;
            }
            rest += 1;
        }

        request.names = args[rest..]
            .iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        Ok(request)
    }

    /// Whether the names start with the wildcard token.
    pub fn is_wildcard(&self) -> bool {
        self.names.first().map(String::as_str) == Some(WILDCARD)
    }

    fn set(&mut self, flag: Flag) {
        match flag {
            Flag::Help => self.help_requested = true,
            Flag::List => self.list_only = true,
        }
    }
}

fn parse_short(c: char) -> Result<Flag, ArgError> {
    SHORT_FLAGS
        .iter()
        .find(|(short, _)| *short == c)
        .map(|(_, flag)| *flag)
        .ok_or(ArgError::UnknownShort(c))
}

fn parse_long(option: &str) -> Result<Flag, ArgError> {
    let (name, value) = match option.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (option, None),
    };

    let (full, flag) = match LONG_FLAGS.iter().find(|(long, _)| *long == name) {
        Some(&exact) => exact,
        None => {
            let mut matches = LONG_FLAGS.iter().filter(|(long, _)| long.starts_with(name));
            match (matches.next(), matches.next()) {
                (Some(&only), None) => only,
                (Some(_), Some(_)) => return Err(ArgError::AmbiguousPrefix(name.to_string())),
                (None, _) => return Err(ArgError::UnknownLong(name.to_string())),
            }
        }
    };

    if value.is_some() {
        return Err(ArgError::UnexpectedArgument(full.to_string()));
    }
    Ok(flag)
}
