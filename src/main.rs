//! patient-guide - Patient-education documents from consultation transcripts
//!
//! Entry point for the patient-guide CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use patient_guide::cli::{Cli, Commands};
use patient_guide::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let fallback_filter = if cli.verbose {
        "info,patient_guide=debug"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_filter)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Completions { shell } => patient_guide::cli::completions::print(shell),
        // Load configuration only for runtime commands.
        command => run(command, Settings::load()?).await?,
    }

    Ok(())
}

async fn run(command: Commands, settings: Settings) -> Result<()> {
    match command {
        Commands::Generate(args) => {
            patient_guide::cli::commands::generate_document(&settings, args).await
        }
        Commands::Prompt { input } => patient_guide::cli::commands::show_prompt(&input),
        Commands::Doctor { json } => patient_guide::cli::commands::run_doctor(&settings, json),
        Commands::Config(config_cmd) => {
            patient_guide::cli::commands::config_command(&settings, config_cmd)
        }
        Commands::Completions { shell } => {
            patient_guide::cli::completions::print(shell);
            Ok(())
        }
    }
}
