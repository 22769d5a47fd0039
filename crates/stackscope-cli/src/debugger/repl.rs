//! Interactive debugger REPL
//!
//! Provides a command-line interface for inspecting a recorded stack.

use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use stackscope_config::{Settings, MIN_WIDTH};
use stackscope_runtime::debugger::locals::{MIN_ABBREV, NAME};
use stackscope_runtime::debugger::{register_help, InfoLocals, WalkLimit};
use stackscope_runtime::frame::callers;
use stackscope_runtime::{
    Frame, HelpCatalog, Output, SnapshotEvaluator, SnapshotFrame, StackSnapshot, WidthPrinter,
};
use std::path::Path;
use tracing::debug;

use super::helper::ReplHelper;
use super::{is_abbrev, INFO_MIN_ABBREV};

const PROMPT: &str = "(stackscope) ";

/// Help for the prompt's own commands: path, one-line summary, full text.
const COMMAND_HELP: &[(&[&str], &str, &str)] = &[
    (
        &["backtrace"],
        "Print the call stack",
        "**backtrace**\n\nPrint the call stack, innermost frame first. The selected\nframe is marked with `->`.\n\nAliases: `bt`, `where`.",
    ),
    (
        &["down"],
        "Select the frame called by the selected frame",
        "**down**\n\nSelect the frame called by the selected frame, one step toward\nframe 0.",
    ),
    (
        &["frame"],
        "Select a stack frame",
        "**frame** [*n*]\n\nSelect frame *n*, where 0 is the innermost frame. Without an\nargument, show the selected frame.",
    ),
    (
        &["help"],
        "Print help on commands",
        "**help** [*command* ...]\n\nWithout arguments, list the commands. Otherwise print the help\nfor one command.",
    ),
    (
        &["quit"],
        "Leave the debugger",
        "**quit**\n\nLeave the debugger.\n\nAliases: `q`, `exit`.",
    ),
    (
        &["set", "width"],
        "Set the display width",
        "**set width** *n*\n\nSet the number of columns used to lay out values and names.\nThe smallest accepted width is 20.",
    ),
    (
        &["show", "width"],
        "Show the display width",
        "**show width**\n\nShow the number of columns used to lay out values and names.",
    ),
    (
        &["up"],
        "Select the caller of the selected frame",
        "**up**\n\nSelect the caller of the selected frame, one step away from\nframe 0.",
    ),
];

/// Map a command word or alias to its command name.
fn canonical(word: &str) -> Option<&'static str> {
    match word {
        "backtrace" | "bt" | "where" => Some("backtrace"),
        "quit" | "q" | "exit" => Some("quit"),
        "down" => Some("down"),
        "frame" => Some("frame"),
        "help" => Some("help"),
        "set" => Some("set"),
        "show" => Some("show"),
        "up" => Some("up"),
        w if is_abbrev(w, "info", INFO_MIN_ABBREV) => Some("info"),
        _ => None,
    }
}

/// Debugger REPL state
pub struct DebugRepl<'s> {
    stack: &'s StackSnapshot,
    evaluator: SnapshotEvaluator<'s>,
    printer: WidthPrinter,
    help: HelpCatalog,
    file_name: String,
    selected: usize,
    width: usize,
    framed: bool,
    frame_limit: WalkLimit,
    running: bool,
}

impl<'s> DebugRepl<'s> {
    /// Create a new debugger REPL with frame 0 selected
    pub fn new(stack: &'s StackSnapshot, file_name: String, settings: &Settings) -> Self {
        let mut help = HelpCatalog::new();
        for (path, short, long) in COMMAND_HELP {
            help.register(path, short, long);
        }
        register_help(&mut help);

        Self {
            stack,
            evaluator: SnapshotEvaluator::new(stack),
            printer: WidthPrinter::default(),
            help,
            file_name,
            selected: 0,
            width: settings.width,
            framed: settings.framed,
            frame_limit: WalkLimit::frames(settings.frame_limit),
            running: true,
        }
    }

    /// Run the interactive debugger REPL
    pub fn run(&mut self, out: &mut dyn Output, history: Option<&Path>) -> anyhow::Result<()> {
        let mut rl: Editor<ReplHelper<'s>, DefaultHistory> = Editor::new()?;
        rl.set_helper(Some(ReplHelper::new(self.stack)));

        if let Some(path) = history {
            // A missing history file is normal on first use.
            let _ = rl.load_history(path);
        }

        out.msg(&format!(
            "stackscope {}: {} frame(s) from {}",
            stackscope_runtime::VERSION,
            self.stack.depth(),
            self.file_name
        ));
        out.msg("Type \"help\" for a list of commands.");
        self.show_selected(out);

        while self.running {
            if let Some(helper) = rl.helper_mut() {
                helper.select(self.selected);
            }

            match rl.readline(PROMPT) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(trimmed);
                    self.execute_command(trimmed, out);
                }
                Err(ReadlineError::Interrupted) => {
                    out.msg("^C - Use 'quit' to exit");
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        if let Some(path) = history {
            save_history(&mut rl, path);
        }

        out.msg("Debugger exited.");
        Ok(())
    }

    /// Execute a debugger command
    pub fn execute_command(&mut self, input: &str, out: &mut dyn Output) {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let Some((&cmd, args)) = parts.split_first() else {
            return;
        };

        match canonical(cmd) {
            Some("info") => self.cmd_info(args, out),
            Some("frame") => self.cmd_frame(args, out),
            Some("up") => self.cmd_up(out),
            Some("down") => self.cmd_down(out),
            Some("backtrace") => self.cmd_backtrace(out),
            Some("set") => self.cmd_set(args, out),
            Some("show") => self.cmd_show(args, out),
            Some("help") => self.cmd_help(args, out),
            Some("quit") => self.running = false,
            _ => out.errmsg(&format!("Undefined command: \"{cmd}\". Try \"help\".")),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn width(&self) -> usize {
        self.width
    }

    // ── Command implementations ───────────────────────────────────────────────

    fn cmd_info(&self, args: &[&str], out: &mut dyn Output) {
        let Some((&sub, rest)) = args.split_first() else {
            self.help.show(&["info"], out);
            return;
        };
        if !is_abbrev(sub, NAME, MIN_ABBREV) {
            out.errmsg(&format!(
                "Undefined info command: \"{sub}\". Try \"help info\"."
            ));
            return;
        }

        let command: InfoLocals<SnapshotFrame> =
            InfoLocals::new(&self.evaluator, &self.printer, &self.help).with_width(self.width);
        let frame = self.stack.frame(self.selected);
        if self.framed {
            command.run(rest, frame, self.frame_limit, out);
        } else {
            command.run_frame(rest, frame.as_ref(), out);
        }
    }

    fn cmd_frame(&mut self, args: &[&str], out: &mut dyn Output) {
        match args.first() {
            None => self.show_selected(out),
            Some(arg) => match arg.parse::<usize>() {
                Ok(index) if index < self.stack.depth() => {
                    self.selected = index;
                    self.show_selected(out);
                }
                Ok(index) => out.errmsg(&format!(
                    "Frame {index} out of range; the stack has {} frame(s).",
                    self.stack.depth()
                )),
                Err(_) => out.errmsg(&format!("Invalid frame number: \"{arg}\"")),
            },
        }
    }

    fn cmd_up(&mut self, out: &mut dyn Output) {
        if self.selected + 1 >= self.stack.depth() {
            out.errmsg("Initial frame selected; you cannot go up.");
            return;
        }
        self.selected += 1;
        self.show_selected(out);
    }

    fn cmd_down(&mut self, out: &mut dyn Output) {
        if self.selected == 0 {
            out.errmsg("Bottom (innermost) frame selected; you cannot go down.");
            return;
        }
        self.selected -= 1;
        self.show_selected(out);
    }

    fn cmd_backtrace(&self, out: &mut dyn Output) {
        if self.stack.depth() == 0 {
            out.errmsg("No stack.");
            return;
        }
        for (index, frame) in callers(self.stack.frame(0)).enumerate() {
            let marker = if index == self.selected { "->" } else { "  " };
            out.msg(&format!("{marker}#{index} {}", frame.function_name()));
        }
    }

    fn cmd_set(&mut self, args: &[&str], out: &mut dyn Output) {
        match args {
            [setting, value] if *setting == "width" => match value.parse::<usize>() {
                Ok(width) if width >= MIN_WIDTH => {
                    self.width = width;
                    out.msg(&format!("width is {width}."));
                }
                _ => out.errmsg(&format!(
                    "width must be an integer of at least {MIN_WIDTH}, got \"{value}\"."
                )),
            },
            _ => {
                self.help.show(&["set"], out);
            }
        }
    }

    fn cmd_show(&self, args: &[&str], out: &mut dyn Output) {
        match args {
            [setting] if *setting == "width" => out.msg(&format!("width is {}.", self.width)),
            _ => {
                self.help.show(&["show"], out);
            }
        }
    }

    fn cmd_help(&self, args: &[&str], out: &mut dyn Output) {
        let mut topic: Vec<&str> = args.to_vec();
        if let Some(first) = topic.first_mut() {
            if let Some(name) = canonical(*first) {
                *first = name;
            }
        }
        if topic.first() == Some(&"info") {
            if let Some(sub) = topic.get_mut(1) {
                if is_abbrev(*sub, NAME, MIN_ABBREV) {
                    *sub = NAME;
                }
            }
        }
        self.help.show(&topic, out);
    }

    // ── Helper methods ────────────────────────────────────────────────────────

    fn show_selected(&self, out: &mut dyn Output) {
        match self.stack.frame(self.selected) {
            Some(frame) => out.msg(&format!("#{} {}", self.selected, frame.function_name())),
            None => out.errmsg("No stack."),
        }
    }
}

fn save_history(rl: &mut Editor<ReplHelper<'_>, DefaultHistory>, path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            debug!(path = %parent.display(), error = %e, "cannot create history directory");
            return;
        }
    }
    if let Err(e) = rl.save_history(path) {
        debug!(path = %path.display(), error = %e, "cannot save history");
    }
}
