//! End-to-end integration tests: export file -> loader -> analysis -> rendering

use book_leadlag::causality::{Tier, TierRollup, UnavailableReason, VariableOutcome};
use book_leadlag::cli::{run_analysis, AnalyzeArgs, OutputFormat};
use book_leadlag::config::Config;
use book_leadlag::data::PanelLoader;
use book_leadlag::panel::Venue;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::common::{follower, grid, panel, random_walk, rng};

const ROWS: usize = 20;

fn config(path: &Path) -> Config {
    let mut config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    config.input.path = path.to_path_buf();
    config
}

/// Export with all variables; price signals on kalshi follow poly
fn write_export(dir: &TempDir, rows: usize, skip_column: Option<&str>) -> PathBuf {
    let mut rng = rng(2025);
    let mut columns: Vec<(String, Vec<f64>)> = Vec::new();
    for (tier, variable) in book_leadlag::causality::all_variables() {
        let poly = random_walk(&mut rng, rows);
        let kalshi = if tier == Tier::PriceSignals {
            follower(&poly, &mut rng, 0.1)
        } else {
            random_walk(&mut rng, rows)
        };
        columns.push((format!("poly_{}", variable), poly));
        columns.push((format!("kalshi_{}", variable), kalshi));
    }
    columns.retain(|(name, _)| Some(name.as_str()) != skip_column);

    let mut csv = String::from("timestamp_ms,timestamp_et");
    for (name, _) in &columns {
        let _ = write!(csv, ",{}", name);
    }
    csv.push('\n');

    for (row, timestamp) in grid(rows).iter().enumerate() {
        let _ = write!(csv, "{},{}", timestamp.timestamp_millis(), timestamp.format("%Y-%m-%d %H:%M"));
        for (_, values) in &columns {
            let _ = write!(csv, ",{}", values[row]);
        }
        csv.push('\n');
    }

    let path = dir.path().join("orderbooks_preprocessed.csv");
    std::fs::write(&path, csv).unwrap();
    path
}

#[test]
fn test_example_config_loads() {
    let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example")).unwrap();
    assert_eq!(config.venues.a, "poly");
    assert_eq!(config.input.timestamp_column, "timestamp_ms");
}

#[test]
fn test_csv_export_to_report() {
    let dir = TempDir::new().unwrap();
    let path = write_export(&dir, 120, Some("kalshi_vwap_no"));
    let config = config(&path);

    let panel = PanelLoader::new(&config.input.timestamp_column, config.venues.clone())
        .load_panel(&path)
        .unwrap();
    assert_eq!(panel.len(), 120);

    let report = run_analysis(&panel, &config).unwrap();
    assert_eq!(report.entries.len(), 19);
    assert_eq!(report.tiers.len(), 4);

    let mid = report.verdict("mid").unwrap();
    assert!(mid.a_to_b.is_significant());
    assert_eq!(mid.predict_b.n, 118);
    assert_eq!(
        report.tier(Tier::PriceSignals).unwrap().rollup,
        TierRollup::ClearLeader(Venue::A)
    );

    let vwap_no = report.get("vwap_no").unwrap();
    assert_eq!(
        vwap_no.outcome,
        VariableOutcome::Unavailable(UnavailableReason::MissingColumn(vec![Venue::B]))
    );
    assert_eq!(report.tier(Tier::BookStructure).unwrap().unavailable, 1);
}

#[test]
fn test_missing_value_isolated_to_its_variable() {
    let mut rng = rng(77);
    let mut columns = Vec::new();
    for variable in ["mid", "spread", "imbalance_best"] {
        columns.push((variable, random_walk(&mut rng, ROWS), random_walk(&mut rng, ROWS)));
    }
    columns[0].1[10] = f64::NAN;

    let config = config(Path::new("unused.csv"));
    let report = run_analysis(&panel(columns), &config).unwrap();

    let mid = report.verdict("mid").unwrap();
    assert_eq!(mid.predict_a.n, 15);
    assert_eq!(mid.b_to_a.n, 15);
    assert_eq!(mid.predict_b.n, 16);
    assert_eq!(mid.a_to_b.n, 16);

    for variable in ["spread", "imbalance_best"] {
        let verdict = report.verdict(variable).unwrap();
        assert_eq!(verdict.predict_a.n, ROWS - 2);
        assert_eq!(verdict.predict_b.n, ROWS - 2);
    }
    assert_eq!(report.entries.len(), 19);
    assert_eq!(
        report
            .entries
            .iter()
            .filter(|e| matches!(e.outcome, VariableOutcome::Unavailable(_)))
            .count(),
        16
    );
}

#[test]
fn test_analyze_command_writes_json() {
    let dir = TempDir::new().unwrap();
    let path = write_export(&dir, 80, None);
    let output = dir.path().join("report.json");

    let args = AnalyzeArgs {
        input: Some(path.clone()),
        format: OutputFormat::Json,
        output: Some(output.clone()),
        detail: None,
    };
    args.execute(&config(Path::new("ignored.csv"))).unwrap();

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 19);
    assert_eq!(entries[0]["variable"], "mid");
    assert_eq!(entries[0]["tier"], "PriceSignals");
    assert!(entries[0]["outcome"]["Computed"]["a_to_b"]["f_statistic"].is_number());
    assert_eq!(json["tiers"].as_array().unwrap().len(), 4);
}

#[test]
fn test_analyze_command_writes_table() {
    let dir = TempDir::new().unwrap();
    let path = write_export(&dir, 80, None);
    let output = dir.path().join("report.txt");

    let args = AnalyzeArgs {
        input: Some(path),
        format: OutputFormat::Table,
        output: Some(output.clone()),
        detail: Some("mid".to_string()),
    };
    args.execute(&config(Path::new("ignored.csv"))).unwrap();

    let table = std::fs::read_to_string(&output).unwrap();
    assert!(table.contains("VAR RESULTS: MID"));
    assert!(table.contains("TIER 1: PRICE SIGNALS"));
    assert!(table.contains("TIER 4: BOOK STRUCTURE"));
    assert!(table.contains("Poly moves -> Kalshi follows"));
}

#[test]
fn test_analyze_rejects_interval_mismatch() {
    let dir = TempDir::new().unwrap();
    let path = write_export(&dir, 30, None);
    let mut config = config(&path);
    config.input.interval_minutes = Some(15);

    let args = AnalyzeArgs {
        input: None,
        format: OutputFormat::Json,
        output: Some(dir.path().join("never.json")),
        detail: None,
    };
    let err = args.execute(&config).unwrap_err();
    assert!(err.to_string().contains("interval"));
    assert!(!dir.path().join("never.json").exists());
}
