//! Run configuration
//!
//! `RunConfig` is the snapshot every component of a run reads from. It is
//! assembled once from the parsed command line and the optional project
//! file `lambda-venv.toml` found in the effective working directory.
//! Command-line values always win over file values.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::error::{Error, Result};
use crate::path;

/// Current project file schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Name of the project file looked up in the working directory
pub const PROJECT_FILE_NAME: &str = "lambda-venv.toml";

/// Logging verbosity requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Critical,
    Error,
    #[default]
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    /// Accepted names, in the order shown in help output
    pub const NAMES: [&'static str; 5] = ["critical", "error", "warning", "info", "debug"];

    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Critical => "critical",
            LogLevel::Error => "error",
            LogLevel::Warning => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }

    /// The tracing filter for this level
    ///
    /// tracing has no level above ERROR, so critical shares it.
    pub const fn level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Critical | LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
        }
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Ok(LogLevel::Critical),
            "error" => Ok(LogLevel::Error),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(Error::Config(format!("Unknown log level: {other}"))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text encoding for file output
///
/// Output is produced as Rust strings, so UTF-8 is the only encoding that
/// can be written faithfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
}

impl TextEncoding {
    /// Parse an encoding label such as `utf-8`
    pub fn parse(label: &str) -> Result<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" | "utf_8" => Ok(TextEncoding::Utf8),
            other => Err(Error::Config(format!(
                "Unsupported text encoding '{other}': only utf-8 is supported"
            ))),
        }
    }
}

/// Where rendered values go
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputTarget {
    /// The default output stream
    #[default]
    Stdout,
    /// A file, created or truncated on each render
    File(PathBuf),
}

/// Cloud profile and region selection, both optional
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CloudSelector {
    pub profile: Option<String>,
    pub region: Option<String>,
}

/// Snapshot of the settings for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Emit string results verbatim instead of JSON-encoded
    pub raw: bool,
    /// Compact instead of pretty-printed JSON
    pub compact: bool,
    /// Output destination for rendered values
    pub output: OutputTarget,
    /// Encoding for file output
    pub encoding: TextEncoding,
    /// Monochrome was requested
    pub monochrome: bool,
    /// Standard output accepts color escape codes
    pub colorize_stdout: bool,
    /// Standard error accepts color escape codes
    pub colorize_stderr: bool,
    /// Effective working directory (absolute)
    pub cwd: PathBuf,
    /// Cloud profile and region
    pub cloud: CloudSelector,
    /// Directory containing the virtualenv
    pub venv_dir: Option<PathBuf>,
    /// Let failures propagate instead of printing a one-line diagnostic
    pub traceback: bool,
    /// Requested log level
    pub log_level: LogLevel,
}

impl RunConfig {
    /// Resolve a user-supplied path against the run's working directory
    pub fn abspath(&self, path: &str) -> Result<PathBuf> {
        path::resolve(&self.cwd, path)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            raw: false,
            compact: false,
            output: OutputTarget::Stdout,
            encoding: TextEncoding::Utf8,
            monochrome: false,
            colorize_stdout: false,
            colorize_stderr: false,
            cwd: PathBuf::from("."),
            cloud: CloudSelector::default(),
            venv_dir: None,
            traceback: false,
            log_level: LogLevel::Warning,
        }
    }
}

/// Contents of the project file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Default settings
    #[serde(default)]
    pub defaults: Defaults,
}

/// Defaults applied when the command line leaves a value unset
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Defaults {
    /// AWS profile name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_profile: Option<String>,

    /// AWS region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,

    /// Virtualenv directory, relative to the project file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venv_dir: Option<String>,

    /// Text encoding label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_encoding: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            defaults: Defaults::default(),
        }
    }
}

/// Loads the project file
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Look for the project file in `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            config_path: dir.join(PROJECT_FILE_NAME),
        }
    }

    /// Use an explicit project file path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the project file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load the project file
    ///
    /// A missing file yields the default configuration.
    pub fn load(&self) -> Result<ProjectConfig> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "No project file");
            return Ok(ProjectConfig::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config: ProjectConfig = toml::from_str(&content)?;

        if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Project file version {} is newer than supported version {}. Please upgrade lambda-venv.",
                config.schema_version, SCHEMA_VERSION
            )));
        }

        tracing::debug!(path = %self.config_path.display(), "Loaded project file");
        Ok(config)
    }
}
