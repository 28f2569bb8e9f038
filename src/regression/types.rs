//! Regression types
//!
//! Named predictors, designs, fit results and nested test results.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::panel::Venue;

/// Regression errors
#[derive(Debug, Error)]
pub enum RegressionError {
    /// Design is rank-deficient or has too few rows
    #[error("Singular design: {0}")]
    SingularDesign(String),
    /// Restricted and unrestricted fits used different rows
    #[error("Imbalanced fits: unrestricted used {unrestricted} rows, restricted used {restricted}")]
    ImbalancedFit {
        /// Rows in the unrestricted fit
        unrestricted: usize,
        /// Rows in the restricted fit
        restricted: usize,
    },
    /// Restricted model is not a strict sub-model of the unrestricted one
    #[error("Models are not nested: {0}")]
    NotNested(String),
    /// Design vectors have inconsistent shape or contain non-finite values
    #[error("Invalid design: {0}")]
    InvalidDesign(String),
    /// F distribution could not be constructed
    #[error("Distribution error: {0}")]
    Distribution(String),
}

/// A named regression parameter
///
/// Coefficients are always looked up by name, never by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Predictor {
    /// Constant term
    Intercept,
    /// One-period lag of a venue's first difference
    Lag(Venue),
}

impl std::fmt::Display for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predictor::Intercept => write!(f, "intercept"),
            Predictor::Lag(Venue::A) => write!(f, "lag_a"),
            Predictor::Lag(Venue::B) => write!(f, "lag_b"),
        }
    }
}

/// Response vector, named predictor columns and the panel rows they came from
#[derive(Debug, Clone)]
pub struct RegressionDesign {
    /// Venue whose first difference is the response
    pub response_venue: Venue,
    /// Response values
    pub response: Vec<f64>,
    /// Predictor columns in declared order (intercept excluded)
    pub predictors: Vec<(Predictor, Vec<f64>)>,
    /// Panel row index of every observation
    pub rows: Vec<usize>,
}

impl RegressionDesign {
    /// Number of observations
    pub fn len(&self) -> usize {
        self.response.len()
    }

    /// Check if the design has no observations
    pub fn is_empty(&self) -> bool {
        self.response.is_empty()
    }

    /// Predictor names in declared order
    pub fn predictor_names(&self) -> Vec<Predictor> {
        self.predictors.iter().map(|(p, _)| *p).collect()
    }
}

/// Result of an OLS fit
///
/// Immutable once produced.
#[derive(Debug, Clone)]
pub struct FitResult {
    pub(crate) response_venue: Venue,
    pub(crate) coefficients: Vec<(Predictor, f64)>,
    pub(crate) residuals: Vec<f64>,
    pub(crate) rss: f64,
    pub(crate) tss: f64,
    pub(crate) r_squared: f64,
    pub(crate) rows: Vec<usize>,
}

impl FitResult {
    /// Venue whose first difference was the response
    pub fn response_venue(&self) -> Venue {
        self.response_venue
    }

    /// Coefficient of a named predictor
    pub fn coefficient(&self, predictor: &Predictor) -> Option<f64> {
        self.coefficients
            .iter()
            .find(|(p, _)| p == predictor)
            .map(|(_, c)| *c)
    }

    /// All coefficients, intercept first then declared predictor order
    pub fn coefficients(&self) -> &[(Predictor, f64)] {
        &self.coefficients
    }

    /// Non-intercept predictors
    pub fn predictors(&self) -> impl Iterator<Item = Predictor> + '_ {
        self.coefficients
            .iter()
            .map(|(p, _)| *p)
            .filter(|p| *p != Predictor::Intercept)
    }

    /// Whether an intercept was estimated
    pub fn has_intercept(&self) -> bool {
        self.coefficient(&Predictor::Intercept).is_some()
    }

    /// Number of estimated parameters (intercept included)
    pub fn parameter_count(&self) -> usize {
        self.coefficients.len()
    }

    /// Residuals in row order
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Residual sum of squares
    pub fn rss(&self) -> f64 {
        self.rss
    }

    /// Total sum of squares
    pub fn tss(&self) -> f64 {
        self.tss
    }

    /// Coefficient of determination
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    /// Rows used
    pub fn n(&self) -> usize {
        self.rows.len()
    }

    /// Panel row indices used
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }
}

/// Outcome of a nested F-test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestOutcome {
    /// p below the significance level
    Significant,
    /// p at or above the significance level
    NotSignificant,
    /// F undefined (perfect unrestricted fit or no residual degrees of freedom)
    Indeterminate,
}

impl std::fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestOutcome::Significant => write!(f, "significant"),
            TestOutcome::NotSignificant => write!(f, "not significant"),
            TestOutcome::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// Nested model comparison result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NestedTestResult {
    /// F statistic (NaN when indeterminate)
    pub f_statistic: f64,
    /// Upper-tail p-value (NaN when indeterminate)
    pub p_value: f64,
    /// Numerator degrees of freedom (predictors removed)
    pub df_numerator: usize,
    /// Denominator degrees of freedom (residual df of the unrestricted fit)
    pub df_denominator: usize,
    /// Rows shared by both fits
    pub n: usize,
    /// Decision at the fixed significance level
    pub outcome: TestOutcome,
}

impl NestedTestResult {
    /// Check if the test is significant
    pub fn is_significant(&self) -> bool {
        self.outcome == TestOutcome::Significant
    }

    /// Check if the test could not be decided
    pub fn is_indeterminate(&self) -> bool {
        self.outcome == TestOutcome::Indeterminate
    }
}
