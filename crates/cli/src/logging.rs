//! Logging setup
//!
//! The requested level applies to lambda-venv itself. The AWS SDK and its
//! HTTP stack log a great deal at debug level, so their targets are clamped
//! to INFO, and credential resolution to WARN, whatever was requested.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use lv_core::LogLevel;

/// SDK and transport targets limited to INFO
const CHATTY_TARGETS: &[&str] = &[
    "aws_smithy_runtime",
    "aws_smithy_runtime_api",
    "aws_smithy_http",
    "aws_sdk_s3",
    "aws_sigv4",
    "aws_config",
    "hyper",
    "hyper_util",
    "h2",
    "rustls",
];

/// Credential resolution targets limited to WARN
const CREDENTIAL_TARGETS: &[&str] = &[
    "aws_credential_types",
    "aws_config::profile",
    "aws_config::default_provider::credentials",
    "aws_config::imds",
];

/// Build the filter directives for a requested level
pub fn filter_directives(level: LogLevel) -> String {
    let requested = level.level_filter();
    let chatty = requested.min(LevelFilter::INFO);
    let credentials = requested.min(LevelFilter::WARN);

    let mut directives = vec![requested.to_string()];
    directives.extend(CHATTY_TARGETS.iter().map(|t| format!("{t}={chatty}")));
    directives.extend(CREDENTIAL_TARGETS.iter().map(|t| format!("{t}={credentials}")));
    directives.join(",")
}

/// Install the global subscriber, writing to standard error
///
/// Only the first call in a process takes effect.
pub fn init(level: LogLevel, ansi: bool) {
    let filter = EnvFilter::try_new(filter_directives(level))
        .unwrap_or_else(|_| EnvFilter::new(level.level_filter().to_string()));

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_target(true),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = %level, "Logging initialized");
    }
}
