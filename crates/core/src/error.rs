//! Error types for lv-core
//!
//! A single error type carries every way a run can fail. Each variant knows
//! the process exit code it maps to, and whether the user has already been
//! told about it.

use thiserror::Error;

/// Result type alias for lv-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for lambda-venv operations
#[derive(Error, Debug)]
pub enum Error {
    /// Explicit request to stop the run with a specific exit code
    #[error("{message}")]
    Exit { code: i32, message: String },

    /// The argument parser stopped early and already printed its own message
    #[error("{message}")]
    Usage { code: i32, message: String },

    /// An external helper process exited with a non-zero status
    #[error("Command '{program}' returned non-zero exit status {status}")]
    Subprocess { program: String, status: i32 },

    /// Cloud session or credential failure
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Build an exit signal, with the default message when none is given
    pub fn exit(code: i32, message: Option<String>) -> Self {
        let message =
            message.unwrap_or_else(|| format!("Command exited with return code {code}"));
        Error::Exit { code, message }
    }

    /// Get the process exit code for this error
    ///
    /// Only exit signals and parser exits carry their own code; everything
    /// else is a plain failure.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Exit { code, .. } | Error::Usage { code, .. } => *code,
            _ => 1,
        }
    }

    /// Whether the user has already seen a message for this failure
    pub const fn is_reported(&self) -> bool {
        matches!(self, Error::Usage { .. })
    }

    /// Whether this is an explicit exit request (signal or parser exit)
    pub const fn is_exit_signal(&self) -> bool {
        matches!(self, Error::Exit { .. } | Error::Usage { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_default_message() {
        let err = Error::exit(3, None);
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "Command exited with return code 3");
    }

    #[test]
    fn test_exit_custom_message() {
        let err = Error::exit(42, Some("bucket is gone".into()));
        assert_eq!(err.exit_code(), 42);
        assert_eq!(err.to_string(), "bucket is gone");
    }

    #[test]
    fn test_exit_zero_is_still_a_signal() {
        let err = Error::exit(0, None);
        assert_eq!(err.exit_code(), 0);
        assert!(err.is_exit_signal());
        assert!(!err.is_reported());
    }

    #[test]
    fn test_unclassified_errors_map_to_one() {
        assert_eq!(Error::Auth("no credentials".into()).exit_code(), 1);
        assert_eq!(Error::Config("bad".into()).exit_code(), 1);
        assert_eq!(Error::General("boom".into()).exit_code(), 1);
        let io = std::io::Error::other("disk");
        assert_eq!(Error::from(io).exit_code(), 1);
        let sub = Error::Subprocess {
            program: "jq".into(),
            status: 5,
        };
        assert_eq!(sub.exit_code(), 1);
    }

    #[test]
    fn test_usage_is_reported() {
        let err = Error::Usage {
            code: 2,
            message: "error: unexpected argument".into(),
        };
        assert!(err.is_reported());
        assert!(err.is_exit_signal());
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_subprocess_display() {
        let err = Error::Subprocess {
            program: "jq".into(),
            status: 2,
        };
        assert_eq!(
            err.to_string(),
            "Command 'jq' returned non-zero exit status 2"
        );
    }
}
