//! `domverify instructions` - what to publish for a domain.

use anyhow::Result;
use domverify::{record_host, Instructions, TokenGenerator, TXT_RECORD_TYPE};
use std::process::ExitCode;

use super::Context;
use crate::cli::args::InstructionsArgs;
use crate::output;

pub fn execute(ctx: &Context, args: InstructionsArgs) -> Result<ExitCode> {
    let config = ctx.engine_config()?;

    let expected_value = match args.token {
        Some(token) => token.trim().to_string(),
        None => TokenGenerator::new(config.token_bytes).token()?,
    };
    let label = args.label.as_deref().unwrap_or(&config.record_host_label);

    let instructions = Instructions {
        host: record_host(label, &args.domain),
        record_type: TXT_RECORD_TYPE.to_string(),
        expected_value,
    };
    output::print_instructions(ctx.output_format, &instructions)?;

    Ok(ExitCode::SUCCESS)
}
