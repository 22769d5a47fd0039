//! Locals command - framed `info locals` over a snapshot, without a prompt
//!
//! Writes one `[[[FrameEntry]]]` block per visited frame to stdout so that
//! a driving tool can split the stream. Frames that fail to render are
//! reported in-band and do not change the exit status.

use anyhow::Result;
use stackscope_config::Settings;
use stackscope_runtime::debugger::{register_help, InfoLocals, WalkLimit};
use stackscope_runtime::{HelpCatalog, SnapshotEvaluator, SnapshotFrame, TermOutput, WidthPrinter};
use std::path::PathBuf;
use tracing::debug;

/// Arguments for the locals command
#[derive(Debug, Clone)]
pub struct LocalsArgs {
    /// Path to the JSON stack snapshot
    pub snapshot: PathBuf,
    /// Frame the walk starts from
    pub frame: usize,
    /// Words passed to `info locals`
    pub args: Vec<String>,
    /// Effective settings, CLI flags included
    pub settings: Settings,
}

/// Print the locals of every frame from `frame` outward
pub fn run(args: LocalsArgs) -> Result<()> {
    let stack = super::load_snapshot(&args.snapshot)?;

    let evaluator = SnapshotEvaluator::new(&stack);
    let printer = WidthPrinter::default();
    let mut help = HelpCatalog::new();
    register_help(&mut help);

    let command: InfoLocals<SnapshotFrame> =
        InfoLocals::new(&evaluator, &printer, &help).with_width(args.settings.width);
    let limit = WalkLimit::frames(args.settings.frame_limit);
    debug!(start = args.frame, ?limit, "walking stack");

    let mut out = TermOutput::new(super::color_mode(args.settings.color));
    command.run(args.args.as_slice(), stack.frame(args.frame), limit, &mut out);
    Ok(())
}
