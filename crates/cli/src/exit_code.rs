//! Process exit codes for lambda-venv
//!
//! Commands and exit signals may choose any code, so this is an open
//! newtype rather than a closed set. The named constants cover the codes
//! the harness itself produces.

/// Process exit code of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Operation completed successfully
    pub const SUCCESS: Self = Self(0);

    /// General failure, including any error that is not an exit signal
    pub const FAILURE: Self = Self(1);

    /// Invalid command-line arguments, as reported by the argument parser
    pub const USAGE: Self = Self(2);

    /// Create an exit code from a raw value
    #[inline]
    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Whether this code reports success
    #[inline]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }
}

impl From<i32> for ExitCode {
    fn from(code: i32) -> Self {
        Self(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "exit code {}", self.0)
    }
}
