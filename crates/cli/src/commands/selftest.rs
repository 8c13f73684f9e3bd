//! test command
//!
//! Prints the parsed arguments. For debugging only; will be removed.

use std::io::Write as _;

use async_trait::async_trait;

use lv_core::Result;

use super::CommandHandler;
use crate::context::RunContext;
use crate::exit_code::ExitCode;

#[derive(Debug, Clone, Copy, Default)]
pub struct TestHandler;

#[async_trait]
impl CommandHandler for TestHandler {
    async fn run(&self, ctx: &mut RunContext) -> Result<ExitCode> {
        writeln!(ctx.streams.stdout, "Test command, args={:?}", ctx.args)?;
        Ok(ExitCode::SUCCESS)
    }
}
