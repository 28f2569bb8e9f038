//! Regression module
//!
//! Linear least squares with named predictors and the nested-model F-test
//! used for Granger-style lead-lag significance.

mod ftest;
mod ols;
mod types;

pub use ftest::{
    compare as nested_f_test, f_statistic, upper_tail, PERFECT_FIT_TOLERANCE, SIGNIFICANCE_LEVEL,
};
pub use ols::{OlsFitter, RANK_TOLERANCE};
pub use types::{
    FitResult, NestedTestResult, Predictor, RegressionDesign, RegressionError, TestOutcome,
};
