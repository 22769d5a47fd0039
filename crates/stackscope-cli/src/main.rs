use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use stackscope_config::{ConfigLoader, Settings};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod debugger;

/// Inspect the local variables of a halted program's call stack.
///
/// Stackscope reads a recorded stack snapshot (JSON) and offers a
/// source-level debugger prompt over it, or prints the locals of every
/// frame in a framed format meant for other tools.
///
/// EXAMPLES:
///     stackscope debug stack.json              Inspect interactively
///     stackscope locals stack.json             Locals of every frame
///     stackscope locals stack.json -- -l       Names only
///     stackscope completions bash              Shell completions
///
/// ENVIRONMENT VARIABLES:
///     STACKSCOPE_WIDTH        Display width (default 80)
///     STACKSCOPE_FRAME_LIMIT  Frames per walk, 0 for all
///     STACKSCOPE_COLOR        auto, always or never
///     STACKSCOPE_LOG          Log filter written to stderr (default warn)
///     STACKSCOPE_NO_HISTORY   Set to disable prompt history
///     NO_COLOR                Set to disable colored output
#[derive(Parser)]
#[command(name = "stackscope")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Debug a recorded stack interactively
    ///
    /// Opens a debugger prompt on the innermost frame of the snapshot.
    ///
    /// PROMPT COMMANDS:
    ///     info locals [ARGS]    Show local variables (see "help info locals")
    ///     frame [N]             Select or show a frame
    ///     up, down              Move to the caller or callee
    ///     backtrace, bt, where  Print the call stack
    ///     set width N           Set the display width
    ///     show width            Show the display width
    ///     help [COMMAND]        Show help
    ///     quit, q, exit         Leave the debugger
    ///
    /// EXAMPLES:
    ///     stackscope debug stack.json
    ///     stackscope debug stack.json --framed --frame-limit 3
    #[command(visible_alias = "d")]
    Debug {
        /// Path to the JSON stack snapshot
        snapshot: PathBuf,
        /// Display width for values and name columns
        #[arg(long, short = 'w')]
        width: Option<usize>,
        /// Show every frame from the selected one outward in framed blocks
        #[arg(long)]
        framed: bool,
        /// Frames visited by framed output, 0 for all
        #[arg(long)]
        frame_limit: Option<usize>,
        /// Disable history persistence (also STACKSCOPE_NO_HISTORY)
        #[arg(long)]
        no_history: bool,
    },

    /// Print the locals of each frame in framed blocks
    ///
    /// Walks from the starting frame toward the outermost one and writes
    /// one [[[FrameEntry]]] block per frame to stdout. Words after `--`
    /// are passed to `info locals`.
    ///
    /// EXAMPLES:
    ///     stackscope locals stack.json
    ///     stackscope locals stack.json --frame 1 --limit 2
    ///     stackscope locals stack.json -- count total
    #[command(visible_alias = "l")]
    Locals {
        /// Path to the JSON stack snapshot
        snapshot: PathBuf,
        /// Frame to start from (0 is innermost)
        #[arg(long, short = 'f', default_value_t = 0)]
        frame: usize,
        /// Frames to visit, 0 for all
        #[arg(long, short = 'n')]
        limit: Option<usize>,
        /// Display width for values and name columns
        #[arg(long, short = 'w')]
        width: Option<usize>,
        /// Arguments for `info locals`
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     stackscope completions bash > ~/.local/share/bash-completion/completions/stackscope
    ///     stackscope completions zsh > ~/.zfunc/_stackscope
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Debug {
            snapshot,
            width,
            framed,
            frame_limit,
            no_history,
        } => {
            let mut settings = load_settings()?;
            apply_overrides(&mut settings, width, frame_limit)?;
            settings.framed |= framed;

            let cli_config = config::Config::from_env();
            let history = if no_history {
                None
            } else {
                cli_config.history_path()
            };

            commands::debug::run(commands::debug::DebugArgs {
                snapshot,
                settings,
                history,
            })?;
        }
        Commands::Locals {
            snapshot,
            frame,
            limit,
            width,
            args,
        } => {
            let mut settings = load_settings()?;
            apply_overrides(&mut settings, width, limit)?;

            commands::locals::run(commands::locals::LocalsArgs {
                snapshot,
                frame,
                args,
                settings,
            })?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}

/// Log to stderr so stdout only carries command output.
fn init_logging() {
    let filter =
        EnvFilter::try_from_env("STACKSCOPE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Settings from the global file, the project file and the environment.
fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    let config = ConfigLoader::new()
        .load_from_directory(&cwd)
        .context("Failed to load configuration")?;
    if let Some(root) = config.project_root() {
        tracing::debug!(root = %root.display(), "using project settings");
    }
    Ok(config.settings)
}

/// Command-line flags take precedence over every configured source.
fn apply_overrides(
    settings: &mut Settings,
    width: Option<usize>,
    frame_limit: Option<usize>,
) -> Result<()> {
    if let Some(width) = width {
        settings.set_width(width).context("Invalid --width")?;
    }
    if let Some(limit) = frame_limit {
        settings.frame_limit = limit;
    }
    Ok(())
}
