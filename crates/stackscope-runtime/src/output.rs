//! Message sinks for debugger commands.
//!
//! Commands write plain messages, error messages and section headers through
//! the [`Output`] trait. [`TermOutput`] renders them on a terminal;
//! [`BufferOutput`] records them so they can be inspected or replayed.

use std::io::{IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::debug;

/// Where command output goes.
pub trait Output {
    /// Write a plain message line.
    fn msg(&mut self, text: &str);

    /// Write an error message line.
    fn errmsg(&mut self, text: &str);

    /// Write a section header.
    fn section(&mut self, title: &str);

    /// Whether the sink has stopped accepting output, e.g. after its reader
    /// closed the pipe.
    fn is_closed(&self) -> bool {
        false
    }
}

/// Kind of a recorded line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Msg,
    Error,
    Section,
}

/// One recorded line of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

/// Records output in memory.
#[derive(Debug, Clone, Default)]
pub struct BufferOutput {
    lines: Vec<Line>,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Texts of the plain message lines.
    pub fn messages(&self) -> Vec<&str> {
        self.texts(LineKind::Msg)
    }

    /// Texts of the error lines.
    pub fn errors(&self) -> Vec<&str> {
        self.texts(LineKind::Error)
    }

    /// All lines joined with newlines, regardless of kind.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write every recorded line into another sink, preserving kinds.
    pub fn replay(&self, out: &mut dyn Output) {
        for line in &self.lines {
            match line.kind {
                LineKind::Msg => out.msg(&line.text),
                LineKind::Error => out.errmsg(&line.text),
                LineKind::Section => out.section(&line.text),
            }
        }
    }

    fn texts(&self, kind: LineKind) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.kind == kind)
            .map(|l| l.text.as_str())
            .collect()
    }

    fn push(&mut self, kind: LineKind, text: &str) {
        self.lines.push(Line {
            kind,
            text: text.to_string(),
        });
    }
}

impl Output for BufferOutput {
    fn msg(&mut self, text: &str) {
        self.push(LineKind::Msg, text);
    }

    fn errmsg(&mut self, text: &str) {
        self.push(LineKind::Error, text);
    }

    fn section(&mut self, title: &str) {
        self.push(LineKind::Section, title);
    }
}

/// Color mode for terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Always use colors
    Always,
    /// Never use colors
    Never,
    /// Auto-detect terminal capabilities
    Auto,
}

impl ColorMode {
    /// Resolve to a termcolor ColorChoice
    pub fn to_color_choice(self) -> ColorChoice {
        // Always respect NO_COLOR (https://no-color.org)
        if std::env::var("NO_COLOR").is_ok() {
            return ColorChoice::Never;
        }
        match self {
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
            ColorMode::Auto => ColorChoice::Auto,
        }
    }
}

/// Writes to stdout. Errors are prefixed with `** `.
///
/// Everything, errors included, goes to one stream so that messages keep
/// their position relative to the protocol markers around them. After the
/// first failed write the sink is closed and later writes are dropped.
pub struct TermOutput<W: WriteColor = StandardStream> {
    stream: W,
    color: bool,
    closed: bool,
}

impl TermOutput {
    pub fn new(mode: ColorMode) -> Self {
        let mut choice = mode.to_color_choice();
        if choice == ColorChoice::Auto && !std::io::stdout().is_terminal() {
            choice = ColorChoice::Never;
        }
        Self {
            stream: StandardStream::stdout(choice),
            color: choice != ColorChoice::Never,
            closed: false,
        }
    }
}

impl<W: WriteColor> TermOutput<W> {
    /// Write to `stream`, styling sections only if it supports color.
    pub fn with_writer(stream: W) -> Self {
        let color = stream.supports_color();
        Self {
            stream,
            color,
            closed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.stream
    }

    fn write_line(&mut self, spec: Option<&ColorSpec>, text: &str) {
        if self.closed {
            return;
        }
        if let Err(e) = self.try_write_line(spec, text) {
            debug!(error = %e, "output closed, dropping further writes");
            self.closed = true;
        }
    }

    fn try_write_line(&mut self, spec: Option<&ColorSpec>, text: &str) -> std::io::Result<()> {
        if let Some(spec) = spec {
            self.stream.set_color(spec)?;
        }
        write!(self.stream, "{text}")?;
        if spec.is_some() {
            self.stream.reset()?;
        }
        writeln!(self.stream)?;
        self.stream.flush()
    }
}

impl<W: WriteColor> Output for TermOutput<W> {
    fn msg(&mut self, text: &str) {
        self.write_line(None, text);
    }

    fn errmsg(&mut self, text: &str) {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(Color::Red));
        self.write_line(Some(&spec), &format!("** {text}"));
    }

    fn section(&mut self, title: &str) {
        if self.color {
            let mut spec = ColorSpec::new();
            spec.set_bold(true).set_underline(true);
            self.write_line(Some(&spec), title);
        } else {
            self.write_line(None, title);
            self.write_line(None, &"-".repeat(title.chars().count()));
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
