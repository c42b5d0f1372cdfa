use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::context::Context;
use crate::error::ThreatScopeResult;
use crate::orchestrator::{CycleOutcome, VALIDATION_MESSAGE};

use super::interactive::InteractiveShell;

#[derive(Parser)]
#[command(name = "threatscope")]
#[command(about = "Terminal front end for a remote OSINT threat scanning API")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, global = true)]
    pub verbose: bool,

    #[arg(long, short, global = true, help = "Path to a configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Override the scanning API base URL")]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a single target and write the result page
    Analyze {
        #[arg(help = "Domain, email, phone number or other identifier")]
        target: String,

        #[arg(short, long, help = "Output HTML page")]
        output: Option<PathBuf>,
    },

    /// Start the interactive shell
    Shell {
        #[arg(short, long, help = "Output HTML page")]
        output: Option<PathBuf>,
    },

    /// Write the default configuration file
    Init {
        #[arg(short, long, help = "Force overwrite existing configuration")]
        force: bool,
    },
}

/// Execute a command. Returns `false` when the command ran but did not succeed.
pub async fn execute_command(command: &Commands, config: Config) -> ThreatScopeResult<bool> {
    match command {
        Commands::Analyze { target, output } => {
            let context = Context::new(config)?;
            let output = resolve_output(&context, output.as_deref());
            context.prepare_output(&output).await?;

            let outcome = context.orchestrator.analyze(target).await;
            context.display.write_html(&output).await?;
            report_outcome(target, outcome, &output);

            Ok(outcome.is_completed())
        }
        Commands::Shell { output } => {
            let context = Context::new(config)?;
            let output = resolve_output(&context, output.as_deref());
            context.prepare_output(&output).await?;

            let mut shell = InteractiveShell::new(&context, output);
            shell.run().await?;
            Ok(true)
        }
        Commands::Init { force } => {
            let config_path = Config::init(*force)?;
            info!("Configuration initialized");
            println!("Configuration initialized at {}", config_path.display());
            Ok(true)
        }
    }
}

pub(crate) fn resolve_output(context: &Context, output: Option<&Path>) -> PathBuf {
    output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| context.config.output.page_path.clone())
}

pub(crate) fn report_outcome(target: &str, outcome: CycleOutcome, output: &Path) {
    match outcome {
        CycleOutcome::Completed => {
            println!("Analysis of {} complete. Results written to {}", target.trim(), output.display());
        }
        CycleOutcome::Rejected => println!("{}", VALIDATION_MESSAGE),
        CycleOutcome::Failed => {
            println!("Failed to analyze {}. Please try again later.", target.trim());
        }
        CycleOutcome::Superseded => println!("Analysis of {} was replaced by a newer request", target.trim()),
        CycleOutcome::Busy => println!("Another analysis is still running"),
    }
}
