//! `domverify config` - config file management.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config;
use crate::output::OutputFormat;

pub fn execute(ctx: &Context, args: ConfigArgs) -> Result<ExitCode> {
    match args.command {
        ConfigCommands::Path => show_path(ctx),
        ConfigCommands::Show => show_config(ctx)?,
        ConfigCommands::Init { force } => init_config(ctx, force)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn show_path(ctx: &Context) {
    println!("{}", ctx.config_path.display());
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = ctx.engine_config()?;

    match ctx.output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        OutputFormat::Pretty => {
            if ctx.config_path.exists() {
                println!("{} {}", "# Loaded from".dimmed(), ctx.config_path.display());
            } else {
                println!("{}", "# No config file, showing defaults".dimmed());
            }
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn init_config(ctx: &Context, force: bool) -> Result<()> {
    config::init(&ctx.config_path, force)?;
    println!(
        "{} Wrote default config to {}",
        "Success:".green().bold(),
        ctx.config_path.display()
    );
    Ok(())
}
