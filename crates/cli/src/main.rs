//! lambda-venv - AWS lambda virtualenv management tool
//!
//! Thin entry point: all of the work happens in the library's coordinator.

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let exit_code = lambda_venv::run(std::env::args_os()).await?;

    std::process::exit(exit_code.as_i32());
}
