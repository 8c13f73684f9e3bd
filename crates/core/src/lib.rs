//! lv-core: Core library for the lambda-venv command-line harness
//!
//! This crate provides the pieces of a run that do not depend on any
//! particular cloud SDK:
//! - The error type, including explicit exit signals
//! - Run configuration and the optional project file
//! - Local path resolution
//! - Lazily memoized cloud session and storage client

pub mod cloud;
pub mod config;
pub mod error;
pub mod path;

pub use cloud::{CloudContext, CloudProvider};
pub use config::{
    CloudSelector, ConfigManager, LogLevel, OutputTarget, ProjectConfig, RunConfig, TextEncoding,
};
pub use error::{Error, Result};
