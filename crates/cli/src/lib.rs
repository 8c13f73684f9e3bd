//! lambda-venv CLI library
//!
//! This module exports the CLI components for use in integration tests.

pub mod commands;
pub mod context;
pub mod coordinator;
pub mod exit_code;
pub mod logging;
pub mod output;

pub use coordinator::{Coordinator, run};
pub use exit_code::ExitCode;
