//! CLI interface for book-leadlag
//!
//! Provides subcommands for:
//! - `analyze`: Run the lead-lag analysis on a panel export
//! - `variables`: List tracked variables by tier
//! - `config`: Show configuration

mod analyze;
mod variables;

pub use analyze::{run_analysis, AnalyzeArgs, OutputFormat};
pub use variables::VariablesArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "book-leadlag")]
#[command(about = "Lead-lag (Granger) analysis between two prediction-market order books")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the lead-lag analysis
    Analyze(AnalyzeArgs),
    /// List tracked variables by tier
    Variables(VariablesArgs),
    /// Show configuration
    Config,
}
