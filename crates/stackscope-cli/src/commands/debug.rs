//! Debug command - interactive inspection of a recorded stack
//!
//! Loads a snapshot and opens the debugger prompt on its innermost frame.

use anyhow::Result;
use stackscope_config::Settings;
use stackscope_runtime::TermOutput;
use std::path::PathBuf;
use tracing::info;

use crate::debugger::repl::DebugRepl;

/// Arguments for the debug command
#[derive(Debug, Clone)]
pub struct DebugArgs {
    /// Path to the JSON stack snapshot
    pub snapshot: PathBuf,
    /// Effective settings, CLI flags included
    pub settings: Settings,
    /// Where to keep line-editor history; `None` disables it
    pub history: Option<PathBuf>,
}

/// Run the debugger
pub fn run(args: DebugArgs) -> Result<()> {
    let stack = super::load_snapshot(&args.snapshot)?;
    info!(
        snapshot = %args.snapshot.display(),
        frames = stack.depth(),
        "loaded stack snapshot"
    );

    let file_name = args
        .snapshot
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| args.snapshot.display().to_string());

    let mut out = TermOutput::new(super::color_mode(args.settings.color));
    let mut repl = DebugRepl::new(&stack, file_name, &args.settings);
    repl.run(&mut out, args.history.as_deref())
}
