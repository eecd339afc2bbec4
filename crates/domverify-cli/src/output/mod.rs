//! Output formatting for different formats.

use clap::ValueEnum;
use colored::Colorize;
use domverify::{ConsensusReport, Instructions, ResolverOutcome};
use serde::{Deserialize, Serialize};

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Print a consensus report.
pub fn print_report(format: OutputFormat, report: &ConsensusReport) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Pretty => {
            println!("{} {}", "Host:".bold(), report.record_name.cyan());
            println!("{} {}", "Expected:".bold(), report.expected_value);
            println!();

            println!("{}", "Resolvers:".bold().underline());
            for (name, outcome) in &report.per_resolver {
                println!("  {:12} {}", name, describe_outcome(outcome));
            }
            println!();

            let verdict = if report.verified {
                "VERIFIED".green().bold()
            } else {
                "NOT VERIFIED".red().bold()
            };
            println!("{verdict} {}", report.message());
        }
    }
    Ok(())
}

/// Print DNS publishing instructions.
pub fn print_instructions(format: OutputFormat, instructions: &Instructions) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(instructions)?),
        OutputFormat::Pretty => {
            println!("{}", "Publish this DNS record:".bold());
            println!();
            println!("  {} {}", "Host: ".bold(), instructions.host.cyan());
            println!("  {} {}", "Type: ".bold(), instructions.record_type);
            println!("  {} {}", "Value:".bold(), instructions.expected_value.green());
            println!();
            println!(
                "{}",
                "Enter the value exactly as shown, without quotes.".dimmed()
            );
        }
    }
    Ok(())
}

fn describe_outcome(outcome: &ResolverOutcome) -> String {
    match outcome {
        ResolverOutcome::Answered { records } if records.is_empty() => {
            "no TXT records".yellow().to_string()
        }
        ResolverOutcome::Answered { records } => records
            .iter()
            .map(|r| format!("\"{r}\""))
            .collect::<Vec<_>>()
            .join(", "),
        ResolverOutcome::Failed { error } => format!("{} {error}", "failed:".red()),
        ResolverOutcome::TimedOut => "timed out".red().to_string(),
    }
}
