//! Colorized JSON through an external `jq`
//!
//! The child's output is captured and only handed back once `jq` exits
//! successfully, so a failed run never leaves half a document behind.

use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use lv_core::{Error, Result};

/// Default formatter program, looked up on `PATH`
pub const JQ_PROGRAM: &str = "jq";

/// Runs a jq-compatible formatter over a JSON document
#[derive(Debug, Clone)]
pub struct JqFormatter {
    program: OsString,
}

impl JqFormatter {
    pub fn new() -> Self {
        Self::with_program(JQ_PROGRAM)
    }

    /// Use a different formatter executable
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed to the formatter
    ///
    /// `-C` forces color because the formatter writes to a pipe, not the
    /// terminal.
    pub fn args(compact: bool) -> Vec<&'static str> {
        let mut args = vec!["-C"];
        if compact {
            args.push("-c");
        }
        args.push(".");
        args
    }

    /// Pipe `input` through the formatter and return what it printed
    pub fn format(&self, input: &str, compact: bool) -> Result<String> {
        let program = self.program.to_string_lossy().into_owned();
        tracing::debug!(program = %program, compact, "Running JSON formatter");

        let mut child = Command::new(&self.program)
            .args(Self::args(compact))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            // A child that exits early closes the pipe; its status says why.
            match stdin.write_all(input.as_bytes()) {
                Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(e.into()),
                _ => {}
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(Error::Subprocess {
                program,
                status: output.status.code().unwrap_or(-1),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for JqFormatter {
    fn default() -> Self {
        Self::new()
    }
}
