//! CLI command definitions and dispatch
//!
//! The argument grammar lives here, along with the table that maps each
//! command to the handler that runs it.

use std::collections::HashMap;
use std::io::Write as _;

use async_trait::async_trait;
use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};

use lv_core::{LogLevel, Result};

use crate::context::RunContext;
use crate::exit_code::ExitCode;

mod selftest;
mod version;

pub use selftest::TestHandler;
pub use version::VersionHandler;

/// Name used in diagnostics
pub const PROGRAM_NAME: &str = "lambda-venv";

/// AWS lambda virtualenv management tool.
#[derive(Parser, Debug, Clone)]
#[command(name = "lambda-venv")]
#[command(about, long_about = None)]
pub struct Cli {
    /// Display detailed exception information
    #[arg(long, visible_alias = "tb", global = true)]
    pub traceback: bool,

    /// Set the logging level
    #[arg(
        long,
        global = true,
        default_value = "warning",
        value_parser = PossibleValuesParser::new(LogLevel::NAMES)
    )]
    pub loglevel: String,

    /// Output to stdout/stderr in monochrome. Default is to colorize if stream is a compatible terminal
    #[arg(short = 'M', long, global = true)]
    pub monochrome: bool,

    /// Compact instead of pretty-printed output
    #[arg(short, long, global = true)]
    pub compact: bool,

    /// Output raw strings directly, not json-encoded. Values embedded in structured results are not affected
    #[arg(short, long, global = true)]
    pub raw: bool,

    /// Write output value to the specified file instead of stdout
    #[arg(short, long = "output", global = true, value_name = "FILE")]
    pub output_file: Option<String>,

    /// The encoding used for text [default: utf-8]
    #[arg(long, global = true, value_name = "ENCODING")]
    pub text_encoding: Option<String>,

    /// Change the effective directory used to search for configuration
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub cwd: String,

    /// The AWS profile to use. Default is to use the default AWS settings
    #[arg(short = 'p', long, global = true)]
    pub aws_profile: Option<String>,

    /// The AWS region to use. Default is the region of the selected profile
    #[arg(long, global = true)]
    pub aws_region: Option<String>,

    /// The directory containing the virtualenv
    #[arg(short = 'e', long = "venv", global = true, value_name = "DIR")]
    pub venv_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Display version information. JSON-quoted string. If a raw string is desired, use -r
    Version,

    /// Run a simple test. For debugging only. Will be removed
    Test,

    #[command(external_subcommand)]
    External(Vec<String>),
}

impl Cli {
    /// The command this invocation selects
    pub fn command_id(&self) -> CommandId {
        match &self.command {
            Some(Commands::Version) => CommandId::Version,
            Some(Commands::Test) => CommandId::Test,
            Some(Commands::External(_)) | None => CommandId::Bare,
        }
    }
}

/// Identifies a command in the handler table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    /// No (recognized) command given
    Bare,
    Version,
    Test,
}

impl std::fmt::Display for CommandId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CommandId::Bare => "<none>",
            CommandId::Version => "version",
            CommandId::Test => "test",
        })
    }
}

/// A command implementation
///
/// Handlers return an exit code directly, or fail with an error that the
/// coordinator turns into one.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(&self, ctx: &mut RunContext) -> Result<ExitCode>;
}

/// Handler used when no command was given
#[derive(Debug, Clone, Copy, Default)]
pub struct BareHandler;

#[async_trait]
impl CommandHandler for BareHandler {
    async fn run(&self, ctx: &mut RunContext) -> Result<ExitCode> {
        if let Some(Commands::External(args)) = &ctx.args.command {
            tracing::debug!(command = ?args.first(), "Unrecognized command");
        }
        writeln!(ctx.streams.stderr, "A command is required")?;
        Ok(ExitCode::FAILURE)
    }
}

/// Maps each command to its handler
pub struct HandlerTable {
    handlers: HashMap<CommandId, Box<dyn CommandHandler>>,
}

impl HandlerTable {
    /// A table with no handlers
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register `handler` for `id`, replacing any previous one
    pub fn register(&mut self, id: CommandId, handler: impl CommandHandler + 'static) {
        self.handlers.insert(id, Box::new(handler));
    }

    /// Look up the handler for `id`
    pub fn get(&self, id: CommandId) -> Option<&dyn CommandHandler> {
        self.handlers.get(&id).map(|h| h.as_ref())
    }
}

impl Default for HandlerTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.register(CommandId::Bare, BareHandler);
        table.register(CommandId::Version, VersionHandler);
        table.register(CommandId::Test, TestHandler);
        table
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}
