use anyhow::Result;
use membership::{
    cli::{start, telemetry},
    views::ErrorReport,
    GIT_COMMIT_HASH,
};
use std::process::ExitCode;
use tracing::debug;

async fn run() -> Result<()> {
    let (globals, action) = start()?;

    debug!(build = GIT_COMMIT_HASH, "starting {action:?}");

    action.execute(&globals).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let code = match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", ErrorReport::from_error(&err));
            ExitCode::FAILURE
        }
    };

    telemetry::shutdown_tracer();

    code
}
