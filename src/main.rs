use book_leadlag::cli::{Cli, Commands};
use book_leadlag::config::Config;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            toml::from_str(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    book_leadlag::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Analyze(args) => {
            tracing::info!("Starting lead-lag analysis");
            args.execute(&config)?;
        }
        Commands::Variables(args) => {
            args.execute(&config.venues)?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Input: {} (timestamp column {})",
                config.input.path.display(),
                config.input.timestamp_column
            );
            if let Some(minutes) = config.input.interval_minutes {
                println!("  Interval: {} minutes", minutes);
            }
            println!("  Venues: A={} B={}", config.venues.a, config.venues.b);
            println!(
                "  Analysis: intercept={}, parallel={}, variables={}",
                config.analysis.include_intercept,
                config.analysis.parallel,
                if config.analysis.variables.is_empty() {
                    "all".to_string()
                } else {
                    config.analysis.variables.join(",")
                }
            );
            println!(
                "  Telemetry: level={} format={:?}",
                config.telemetry.log_level, config.telemetry.log_format
            );
        }
    }

    Ok(())
}
