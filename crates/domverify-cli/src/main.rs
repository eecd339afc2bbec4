//! domverify - domain ownership verification from the command line.

use anyhow::Result;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    domverify_cli::run().await
}
