//! Output streams and value rendering
//!
//! Instead of patching the process's standard streams, a run owns an
//! `OutputContext`: one `OutputStream` for standard output and one for
//! standard error, each knowing whether it may carry color escape codes.
//! Color eligibility is decided once, when the run is configured.

mod colorize;
mod formatter;

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

pub use colorize::JqFormatter;
pub use formatter::{RenderOptions, Renderer, to_json_text};

/// A writable stream plus its color setting
pub struct OutputStream {
    writer: Box<dyn Write + Send>,
    terminal: bool,
    colorize: bool,
}

impl OutputStream {
    /// Wrap a writer; `terminal` says whether it behaves like a color terminal
    pub fn new(writer: impl Write + Send + 'static, terminal: bool) -> Self {
        Self {
            writer: Box::new(writer),
            terminal,
            colorize: false,
        }
    }

    /// The process's standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout(), is_color_terminal(&console::Term::stdout()))
    }

    /// The process's standard error
    pub fn stderr() -> Self {
        Self::new(io::stderr(), is_color_terminal(&console::Term::stderr()))
    }

    /// Decide whether this stream gets colored output
    pub fn enable_color(&mut self, monochrome: bool) -> bool {
        self.colorize = !monochrome && self.terminal;
        self.colorize
    }

    /// Whether color escape codes may be written to this stream
    pub fn colorize(&self) -> bool {
        self.colorize
    }

    /// Apply `style` to `text` when this stream is colorized
    pub fn paint(&self, text: impl std::fmt::Display, style: &console::Style) -> String {
        if self.colorize {
            style.apply_to(text).force_styling(true).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl std::fmt::Debug for OutputStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputStream")
            .field("terminal", &self.terminal)
            .field("colorize", &self.colorize)
            .finish_non_exhaustive()
    }
}

/// The pair of streams a run writes to
#[derive(Debug)]
pub struct OutputContext {
    pub stdout: OutputStream,
    pub stderr: OutputStream,
}

impl OutputContext {
    pub fn new(stdout: OutputStream, stderr: OutputStream) -> Self {
        Self { stdout, stderr }
    }

    /// The process's standard output and standard error
    pub fn stdio() -> Self {
        Self::new(OutputStream::stdout(), OutputStream::stderr())
    }

    /// Decide color for both streams; called once per run
    pub fn enable_color(&mut self, monochrome: bool) {
        let stdout = self.stdout.enable_color(monochrome);
        let stderr = self.stderr.enable_color(monochrome);
        tracing::debug!(stdout, stderr, "Stream colorization");
    }

    /// Write `<program>: error: <message>` to standard error, red if colorized
    pub fn error_line(&mut self, program: &str, message: &str) -> io::Result<()> {
        let line = self.stderr.paint(
            format!("{program}: error: {message}"),
            &console::Style::new().red(),
        );
        writeln!(self.stderr, "{line}")?;
        self.stderr.flush()
    }
}

/// Whether a terminal can show color escape codes
///
/// On Windows consoles this also switches on escape code processing.
fn is_color_terminal(term: &console::Term) -> bool {
    term.is_term() && term.features().colors_supported()
}

/// In-memory writer that can be inspected while a run holds a clone
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, decoded lossily as UTF-8
    pub fn contents(&self) -> String {
        self.0
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self
            .0
            .lock()
            .map_err(|_| io::Error::other("output buffer poisoned"))?;
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
