//! version command
//!
//! Prints the tool's version as a JSON string, or bare with `--raw`.

use async_trait::async_trait;

use lv_core::Result;

use super::CommandHandler;
use crate::context::RunContext;
use crate::exit_code::ExitCode;

/// The version reported by `lambda-venv version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy, Default)]
pub struct VersionHandler;

#[async_trait]
impl CommandHandler for VersionHandler {
    async fn run(&self, ctx: &mut RunContext) -> Result<ExitCode> {
        ctx.render(VERSION)?;
        Ok(ExitCode::SUCCESS)
    }
}
