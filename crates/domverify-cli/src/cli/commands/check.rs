//! `domverify check` - one consensus check across all resolvers.

use anyhow::Result;
use domverify::{record_host, ConsensusChecker};
use std::process::ExitCode;
use tracing::debug;

use super::Context;
use crate::cli::args::CheckArgs;
use crate::output;

pub async fn execute(ctx: Context, args: CheckArgs) -> Result<ExitCode> {
    let mut config = ctx.engine_config()?;
    if args.no_system {
        config.resolvers.system = false;
    }

    let label = args.label.as_deref().unwrap_or(&config.record_host_label);
    let host = record_host(label, &args.domain);

    let checker = ConsensusChecker::from_settings(&config.resolvers)?;
    debug!(resolvers = ?checker.resolver_names(), %host, "running consensus check");

    let report = checker.check(&host, args.token.trim()).await;
    output::print_report(ctx.output_format, &report)?;

    Ok(if report.verified {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
