//! book-leadlag: lead-lag analysis between two prediction-market order books
//!
//! This library provides the core components for:
//! - Aligning two venues' interval panels and building lag-1 differences
//! - OLS fits with named predictors (equilibrated Householder QR)
//! - Nested-model F-tests for Granger-style predictive significance
//! - Per-variable leader verdicts and per-tier rollups
//! - Loading the preprocessed export from CSV or Parquet
//! - Logging and run metrics

pub mod causality;
pub mod cli;
pub mod config;
pub mod data;
pub mod panel;
pub mod regression;
pub mod telemetry;
