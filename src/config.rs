//! Configuration types for book-leadlag

use serde::Deserialize;
use std::path::PathBuf;

use crate::panel::Venue;
use crate::telemetry::LogFormat;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    #[serde(default)]
    pub venues: VenuesConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Preprocessed panel export
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// CSV or Parquet file, one row per interval
    pub path: PathBuf,

    /// Unix-millisecond timestamp column
    #[serde(default = "default_timestamp_column")]
    pub timestamp_column: String,

    /// Expected grid spacing; checked against the data when set
    #[serde(default)]
    pub interval_minutes: Option<u64>,
}

fn default_timestamp_column() -> String {
    "timestamp_ms".to_string()
}

/// Column prefixes of the two venues
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VenuesConfig {
    #[serde(default = "default_venue_a")]
    pub a: String,
    #[serde(default = "default_venue_b")]
    pub b: String,
}

fn default_venue_a() -> String {
    "poly".to_string()
}
fn default_venue_b() -> String {
    "kalshi".to_string()
}

impl Default for VenuesConfig {
    fn default() -> Self {
        Self {
            a: default_venue_a(),
            b: default_venue_b(),
        }
    }
}

impl VenuesConfig {
    /// Prefix (and display label) of a venue
    pub fn label(&self, venue: Venue) -> &str {
        match venue {
            Venue::A => &self.a,
            Venue::B => &self.b,
        }
    }

    /// Input column holding a venue's variable
    pub fn column(&self, venue: Venue, variable: &str) -> String {
        format!("{}_{}", self.label(venue), variable)
    }
}

/// Lead-lag analysis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Estimate an intercept in every regression
    #[serde(default = "default_true")]
    pub include_intercept: bool,

    /// Evaluate variables on the rayon pool
    #[serde(default)]
    pub parallel: bool,

    /// Subset of variables to analyse (empty = all)
    #[serde(default)]
    pub variables: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            include_intercept: true,
            parallel: false,
            variables: Vec::new(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
