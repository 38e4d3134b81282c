mod config;
mod scenario;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use landing_core::form::{self, SignupFields, ValidationPolicy};
use shared::error::ErrorReport;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::scenario::Scenario;

/// Drives the landing page controller against a headless page.
#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Runs a scenario file and prints what the controller did.
    Run {
        scenario: PathBuf,
        /// Print the full run summary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Checks signup fields with the join form's rules.
    Validate {
        name: String,
        email: String,
        intent: String,
        #[arg(long)]
        all_errors: bool,
    },
    /// Prints the effective configuration.
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = config::load_config(&cli.config)?;

    match cli.command {
        Command::Run { scenario, json } => {
            let raw = fs::read_to_string(&scenario)
                .with_context(|| format!("failed to read {}", scenario.display()))?;
            let parsed = Scenario::from_toml(&raw)?;
            info!(path = %scenario.display(), steps = parsed.steps.len(), "sim: running scenario");
            let summary = scenario::run(&parsed, settings)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }
            if !summary.missing.is_empty() {
                println!("missing regions: {:?}", summary.missing);
            }
            if let Some(failure) = &summary.failure {
                println!("setup failed ({:?}): {}", failure.code, failure.message);
            }
            for step in &summary.steps {
                println!("#{} {} -> {} commands", step.index, step.action, step.commands.len());
            }
            println!("{}", serde_json::to_string_pretty(&summary.final_state)?);
        }
        Command::Validate {
            name,
            email,
            intent,
            all_errors,
        } => {
            let policy = if all_errors {
                ValidationPolicy::AllErrors
            } else {
                settings.validation_policy
            };
            match form::validate(&SignupFields::new(name, email, intent), policy) {
                Ok(signup) => println!("valid: {}", serde_json::to_string(&signup)?),
                Err(errors) => {
                    for error in errors {
                        let report = ErrorReport::from(error);
                        println!("{:?}: {}", report.code, report.message);
                    }
                    anyhow::bail!("signup rejected");
                }
            }
        }
        Command::Config => {
            print!(
                "{}",
                toml::to_string_pretty(&settings).context("failed to render configuration")?
            );
        }
    }

    Ok(())
}
