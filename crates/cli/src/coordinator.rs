//! Run coordinator
//!
//! Drives one invocation from raw arguments to an exit code:
//! parse, configure (logging, stream color, run settings), dispatch, and
//! translate any failure into an exit code and a one-line diagnostic.

use std::ffi::OsString;
use std::io::Write as _;

use clap::Parser;

use lv_core::{
    CloudSelector, ConfigManager, Error, LogLevel, OutputTarget, Result, RunConfig, TextEncoding,
    path,
};

use crate::commands::{Cli, CommandHandler, CommandId, HandlerTable, PROGRAM_NAME};
use crate::context::RunContext;
use crate::exit_code::ExitCode;
use crate::logging;
use crate::output::OutputContext;

/// Runs a single invocation
#[derive(Debug)]
pub struct Coordinator {
    streams: OutputContext,
    handlers: HandlerTable,
}

impl Coordinator {
    /// Coordinator with the built-in command handlers
    pub fn new(streams: OutputContext) -> Self {
        Self {
            streams,
            handlers: HandlerTable::default(),
        }
    }

    /// Replace the handler for a command
    pub fn with_handler(mut self, id: CommandId, handler: impl CommandHandler + 'static) -> Self {
        self.handlers.register(id, handler);
        self
    }

    /// Run the tool with `argv`, including the program name as the first item
    ///
    /// Returns the exit code the process should end with. In traceback mode
    /// a failure with a non-zero code is returned as the original error
    /// instead of being printed.
    pub async fn run<I, T>(self, argv: I) -> Result<ExitCode>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let Coordinator {
            mut streams,
            handlers,
        } = self;

        let cli = match parse_args(argv, &mut streams) {
            Ok(cli) => cli,
            // The parser has already printed help or the usage error
            Err(err) => return Ok(ExitCode::new(err.exit_code())),
        };

        let traceback = cli.traceback;
        streams.enable_color(cli.monochrome);
        let log_level = cli.loglevel.parse::<LogLevel>().unwrap_or_default();
        logging::init(log_level, streams.stderr.colorize());

        let config = match configure(&cli, log_level, &streams) {
            Ok(config) => config,
            Err(err) => return finish(Err(err), &mut streams, traceback),
        };
        tracing::debug!(?config, "Run configured");

        let id = cli.command_id();
        let mut ctx = RunContext::new(cli, config, streams);
        let result = match handlers.get(id) {
            Some(handler) => {
                tracing::debug!(command = %id, "Dispatching");
                handler.run(&mut ctx).await
            }
            None => Err(Error::General(format!(
                "No handler registered for command '{id}'"
            ))),
        };

        finish(result, &mut ctx.streams, traceback)
    }
}

/// Parse arguments, printing help or usage errors the way clap would
fn parse_args<I, T>(argv: I, streams: &mut OutputContext) -> Result<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(argv).map_err(|e| {
        let message = e.render().to_string();
        let stream = if e.use_stderr() {
            &mut streams.stderr
        } else {
            &mut streams.stdout
        };
        let printed = stream
            .write_all(message.as_bytes())
            .and_then(|()| stream.flush());
        if let Err(io) = printed {
            tracing::debug!(error = %io, "Failed to print argument error");
        }
        Error::Usage {
            code: e.exit_code(),
            message,
        }
    })
}

/// Derive the run settings from the command line and the project file
fn configure(cli: &Cli, log_level: LogLevel, streams: &OutputContext) -> Result<RunConfig> {
    let cwd = path::absolute_dir(&cli.cwd)?;
    let project = ConfigManager::in_dir(&cwd).load()?;
    let defaults = project.defaults;

    let encoding_label = cli
        .text_encoding
        .as_deref()
        .or(defaults.text_encoding.as_deref())
        .unwrap_or("utf-8");
    let encoding = TextEncoding::parse(encoding_label)?;

    let venv_dir = cli
        .venv_dir
        .as_deref()
        .or(defaults.venv_dir.as_deref())
        .map(|dir| path::resolve(&cwd, dir))
        .transpose()?;

    let output = match &cli.output_file {
        Some(file) => OutputTarget::File(file.into()),
        None => OutputTarget::Stdout,
    };

    Ok(RunConfig {
        raw: cli.raw,
        compact: cli.compact,
        output,
        encoding,
        monochrome: cli.monochrome,
        colorize_stdout: streams.stdout.colorize(),
        colorize_stderr: streams.stderr.colorize(),
        cloud: CloudSelector {
            profile: cli.aws_profile.clone().or(defaults.aws_profile),
            region: cli.aws_region.clone().or(defaults.aws_region),
        },
        cwd,
        venv_dir,
        traceback: cli.traceback,
        log_level,
    })
}

/// Turn a handler outcome into the run's exit code
fn finish(
    result: Result<ExitCode>,
    streams: &mut OutputContext,
    traceback: bool,
) -> Result<ExitCode> {
    let err = match result {
        Ok(code) => return Ok(code),
        Err(err) => err,
    };

    let code = ExitCode::new(err.exit_code());
    if code.is_success() || err.is_reported() {
        return Ok(code);
    }
    if traceback {
        return Err(err);
    }

    tracing::debug!(error = ?err, %code, "Command failed");
    if let Err(io) = streams.error_line(PROGRAM_NAME, &err.to_string()) {
        tracing::debug!(error = %io, "Failed to print diagnostic");
    }
    Ok(code)
}

/// Run the tool on the process's standard streams
///
/// Exit signals that escape in traceback mode become plain exit codes;
/// any other failure is handed to the caller.
pub async fn run<I, T>(argv: I) -> anyhow::Result<ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Coordinator::new(OutputContext::stdio()).run(argv).await {
        Ok(code) => Ok(code),
        Err(err) if err.is_exit_signal() => Ok(ExitCode::new(err.exit_code())),
        Err(err) => Err(err.into()),
    }
}
