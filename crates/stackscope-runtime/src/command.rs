//! Command dispatch capability.
//!
//! Debugger commands sometimes need to run other commands (most often
//! `help`). They do so through [`CommandRunner`] rather than through the
//! full command processor.

use crate::output::Output;
use std::collections::BTreeMap;

/// Runs a command addressed by its word path, e.g. `["help", "info", "locals"]`.
pub trait CommandRunner {
    /// Returns `false` if no command answers to `path`.
    fn run_command(&self, path: &[&str], out: &mut dyn Output) -> bool;
}

#[derive(Debug, Clone)]
struct HelpEntry {
    short: String,
    long: String,
}

/// Help texts keyed by command path.
#[derive(Debug, Clone, Default)]
pub struct HelpCatalog {
    entries: BTreeMap<String, HelpEntry>,
}

impl HelpCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register help for the command at `path`.
    pub fn register(&mut self, path: &[&str], short: &str, long: &str) {
        self.entries.insert(
            path.join(" "),
            HelpEntry {
                short: short.to_string(),
                long: long.to_string(),
            },
        );
    }

    pub fn long_help(&self, path: &[&str]) -> Option<&str> {
        self.entries.get(&path.join(" ")).map(|e| e.long.as_str())
    }

    pub fn short_help(&self, path: &[&str]) -> Option<&str> {
        self.entries.get(&path.join(" ")).map(|e| e.short.as_str())
    }

    /// Write help for `topic`. An empty topic lists every command; a topic
    /// that only prefixes registered paths lists those subcommands.
    pub fn show(&self, topic: &[&str], out: &mut dyn Output) -> bool {
        let key = topic.join(" ");
        if let Some(entry) = self.entries.get(&key) {
            for line in entry.long.lines() {
                out.msg(line);
            }
            return true;
        }

        let scope = if key.is_empty() {
            String::new()
        } else {
            format!("{key} ")
        };
        let children: Vec<(&String, &HelpEntry)> = self
            .entries
            .iter()
            .filter(|(path, _)| path.starts_with(&scope))
            .collect();
        if children.is_empty() {
            out.errmsg(&format!("Undefined command: \"{key}\". Try \"help\"."));
            return false;
        }

        out.section(if key.is_empty() { "commands" } else { key.as_str() });
        let width = children.iter().map(|(p, _)| p.len()).max().unwrap_or(0);
        for (path, entry) in children {
            out.msg(&format!("{path:<width$} -- {}", entry.short));
        }
        true
    }
}

impl CommandRunner for HelpCatalog {
    fn run_command(&self, path: &[&str], out: &mut dyn Output) -> bool {
        match path.split_first() {
            Some((&"help", topic)) => self.show(topic, out),
            _ => {
                out.errmsg(&format!("Undefined command: \"{}\"", path.join(" ")));
                false
            }
        }
    }
}
