//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// patient-guide - Patient-education documents from consultation transcripts
#[derive(Parser, Debug)]
#[command(name = "patient-guide")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a patient-education document from a consultation input file
    Generate(GenerateArgs),

    /// Print the rendered prompt without calling the model
    Prompt {
        /// Consultation input JSON file ("-" reads stdin)
        #[arg(default_value = "input_file.json")]
        input: PathBuf,
    },

    /// Check connection settings without calling the model
    Doctor {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Print a shell completion script
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Consultation input JSON file ("-" reads stdin)
    #[arg(default_value = "input_file.json")]
    pub input: PathBuf,

    /// Write the output record to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum tokens in the generated document
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 - 1.0)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Nucleus sampling probability (0.0 - 1.0)
    #[arg(long)]
    pub top_p: Option<f64>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
