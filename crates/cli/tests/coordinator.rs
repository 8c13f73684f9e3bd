//! Coordinator tests with in-memory streams
//!
//! Streams can claim to be terminals here, which the binary tests cannot do.

use async_trait::async_trait;
use lambda_venv::commands::{CommandHandler, CommandId};
use lambda_venv::context::RunContext;
use lambda_venv::output::{OutputContext, OutputStream, SharedBuffer};
use lambda_venv::{Coordinator, ExitCode};
use lv_core::{Error, Result};
use serde_json::json;

struct Streams {
    out: SharedBuffer,
    err: SharedBuffer,
}

fn streams(terminal: bool) -> (OutputContext, Streams) {
    let out = SharedBuffer::new();
    let err = SharedBuffer::new();
    let ctx = OutputContext::new(
        OutputStream::new(out.clone(), terminal),
        OutputStream::new(err.clone(), terminal),
    );
    (ctx, Streams { out, err })
}

/// Renders a fixed document, then exits with a chosen code
struct Report {
    exit: Option<i32>,
}

#[async_trait]
impl CommandHandler for Report {
    async fn run(&self, ctx: &mut RunContext) -> Result<ExitCode> {
        ctx.render(&json!({"uploaded": 3, "bucket": "lambda-artifacts"}))?;
        match self.exit {
            Some(code) => Err(Error::exit(code, Some(format!("stopping with {code}")))),
            None => Ok(ExitCode::SUCCESS),
        }
    }
}

/// Returns a non-zero code without failing
struct Quiet;

#[async_trait]
impl CommandHandler for Quiet {
    async fn run(&self, _ctx: &mut RunContext) -> Result<ExitCode> {
        Ok(ExitCode::new(3))
    }
}

#[tokio::test]
async fn test_pretty_report() {
    let (ctx, s) = streams(false);
    let code = Coordinator::new(ctx)
        .with_handler(CommandId::Test, Report { exit: None })
        .run(["lambda-venv", "test"])
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(
        s.out.contents(),
        "{\n  \"bucket\": \"lambda-artifacts\",\n  \"uploaded\": 3\n}\n"
    );
}

#[tokio::test]
async fn test_compact_report() {
    let (ctx, s) = streams(false);
    Coordinator::new(ctx)
        .with_handler(CommandId::Test, Report { exit: None })
        .run(["lambda-venv", "--compact", "test"])
        .await
        .unwrap();
    assert_eq!(
        s.out.contents(),
        "{\"bucket\":\"lambda-artifacts\",\"uploaded\":3}\n"
    );
}

#[tokio::test]
async fn test_output_written_before_exit_signal() {
    let (ctx, s) = streams(false);
    let code = Coordinator::new(ctx)
        .with_handler(CommandId::Test, Report { exit: Some(4) })
        .run(["lambda-venv", "-c", "test"])
        .await
        .unwrap();
    assert_eq!(code, ExitCode::new(4));
    assert!(s.out.contents().contains("lambda-artifacts"));
    assert_eq!(s.err.contents(), "lambda-venv: error: stopping with 4\n");
}

#[tokio::test]
async fn test_traceback_keeps_exit_signal() {
    let (ctx, s) = streams(false);
    let result = Coordinator::new(ctx)
        .with_handler(CommandId::Test, Report { exit: Some(9) })
        .run(["lambda-venv", "--traceback", "-c", "test"])
        .await;
    let err = result.unwrap_err();
    assert!(err.is_exit_signal());
    assert_eq!(err.exit_code(), 9);
    assert_eq!(err.to_string(), "stopping with 9");
    assert_eq!(s.err.contents(), "");
}

#[tokio::test]
async fn test_handler_exit_code_passes_through() {
    let (ctx, s) = streams(false);
    let code = Coordinator::new(ctx)
        .with_handler(CommandId::Version, Quiet)
        .run(["lambda-venv", "version"])
        .await
        .unwrap();
    assert_eq!(code, ExitCode::new(3));
    assert_eq!(s.err.contents(), "");
}

#[tokio::test]
async fn test_colorize_disabled_for_file_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    let (ctx, s) = streams(true);
    let code = Coordinator::new(ctx)
        .with_handler(CommandId::Test, Report { exit: None })
        .run(["lambda-venv", "-c", "-o", path.to_str().unwrap(), "test"])
        .await
        .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(s.out.contents(), "");
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "{\"bucket\":\"lambda-artifacts\",\"uploaded\":3}\n"
    );
}
