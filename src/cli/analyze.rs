//! Analyze command implementation

use anyhow::Context;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use crate::causality::{LeadLagReport, PairwiseEvaluator, TieredAggregator};
use crate::config::Config;
use crate::data::PanelLoader;
use crate::panel::TimeSeriesPanel;
use crate::regression::OlsFitter;

/// Report rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Per-tier text table
    Table,
    /// Full report as JSON
    Json,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Panel export (CSV or Parquet); overrides `input.path`
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Output format: table or json
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print both regressions of one variable before the table
    #[arg(long)]
    pub detail: Option<String>,
}

impl AnalyzeArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let path = self.input.as_ref().unwrap_or(&config.input.path);
        let loader = PanelLoader::new(config.input.timestamp_column.clone(), config.venues.clone());
        let panel = loader
            .load_panel(path)
            .with_context(|| format!("Failed to load panel from {}", path.display()))?;
        check_interval(&panel, config.input.interval_minutes)?;

        let report = run_analysis(&panel, config)?;
        let rendered = self.render(&report, config)?;

        match &self.output {
            Some(output) => {
                std::fs::write(output, rendered)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                tracing::info!(path = ?output, "Report written");
            }
            None => print!("{}", rendered),
        }

        Ok(())
    }

    fn render(&self, report: &LeadLagReport, config: &Config) -> anyhow::Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)? + "\n"),
            OutputFormat::Table => {
                let mut out = String::new();
                if let Some(variable) = &self.detail {
                    match report.verdict(variable) {
                        Some(verdict) => out.push_str(&verdict.format_detail(&config.venues)),
                        None => tracing::warn!(variable = %variable, "No verdict to detail"),
                    }
                }
                out.push_str(&report.format_table(&config.venues));
                Ok(out)
            }
        }
    }
}

/// Run the configured analysis on a loaded panel
pub fn run_analysis(panel: &TimeSeriesPanel, config: &Config) -> anyhow::Result<LeadLagReport> {
    let evaluator = PairwiseEvaluator::new(OlsFitter::with_intercept(
        config.analysis.include_intercept,
    ));
    let aggregator = TieredAggregator::with_variables(evaluator, &config.analysis.variables)?
        .parallel(config.analysis.parallel);
    Ok(aggregator.run(panel)?)
}

fn check_interval(panel: &TimeSeriesPanel, expected_minutes: Option<u64>) -> anyhow::Result<()> {
    let (Some(expected), Some(actual)) = (expected_minutes, panel.interval()) else {
        return Ok(());
    };
    if actual != chrono::Duration::minutes(expected as i64) {
        anyhow::bail!(
            "Panel interval is {} minutes, configured interval_minutes is {}",
            actual.num_minutes(),
            expected
        );
    }
    Ok(())
}
