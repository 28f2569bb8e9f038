//! Ordinary least squares
//!
//! Solves y = Xβ + ε with a column-equilibrated Householder QR:
//! 1. Every design column (intercept included) is scaled to unit norm
//! 2. The scaled matrix is factorised as QR
//! 3. R γ = Qᵀ y is solved by back-substitution and β_j = γ_j / ‖x_j‖
//!
//! No inverse of XᵀX is ever formed. A diagonal entry of R at or below
//! [`RANK_TOLERANCE`] means the columns are (numerically) collinear.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use super::types::{FitResult, Predictor, RegressionDesign, RegressionError};

/// Smallest |R_jj| accepted on unit-norm columns
pub const RANK_TOLERANCE: f64 = 1e-10;

/// OLS fitter
#[derive(Debug, Clone, Copy)]
pub struct OlsFitter {
    include_intercept: bool,
}

impl Default for OlsFitter {
    fn default() -> Self {
        Self::new()
    }
}

impl OlsFitter {
    /// Create a fitter that estimates an intercept
    pub fn new() -> Self {
        Self {
            include_intercept: true,
        }
    }

    /// Create a fitter with or without an intercept
    pub fn with_intercept(include_intercept: bool) -> Self {
        Self { include_intercept }
    }

    /// Whether an intercept is estimated
    pub fn include_intercept(&self) -> bool {
        self.include_intercept
    }

    /// Fit a design
    pub fn fit(&self, design: &RegressionDesign) -> Result<FitResult, RegressionError> {
        let n = design.len();
        validate(design)?;

        let mut names = Vec::with_capacity(design.predictors.len() + 1);
        let mut columns: Vec<Vec<f64>> = Vec::with_capacity(design.predictors.len() + 1);
        if self.include_intercept {
            names.push(Predictor::Intercept);
            columns.push(vec![1.0; n]);
        }
        for (name, values) in &design.predictors {
            names.push(*name);
            columns.push(values.clone());
        }

        let p = names.len();
        if p == 0 {
            return Err(RegressionError::SingularDesign(
                "no parameters to estimate".to_string(),
            ));
        }
        if n < p {
            return Err(RegressionError::SingularDesign(format!(
                "{} rows for {} parameters",
                n, p
            )));
        }

        let mut norms = Vec::with_capacity(p);
        for (name, column) in names.iter().zip(&columns) {
            let norm = column.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm == 0.0 || !norm.is_finite() {
                return Err(RegressionError::SingularDesign(format!(
                    "predictor {} is identically zero",
                    name
                )));
            }
            norms.push(norm);
        }

        let x = DMatrix::from_fn(n, p, |i, j| columns[j][i] / norms[j]);
        let y = DVector::from_column_slice(&design.response);

        let qr = x.qr();
        let r = qr.r();
        for (j, name) in names.iter().enumerate() {
            if r[(j, j)].abs() <= RANK_TOLERANCE {
                return Err(RegressionError::SingularDesign(format!(
                    "predictor {} is collinear with earlier columns",
                    name
                )));
            }
        }

        let qty = qr.q().transpose() * &y;
        let gamma = r.solve_upper_triangular(&qty).ok_or_else(|| {
            RegressionError::SingularDesign("triangular solve failed".to_string())
        })?;

        let coefficients: Vec<(Predictor, f64)> = names
            .iter()
            .enumerate()
            .map(|(j, name)| (*name, gamma[j] / norms[j]))
            .collect();

        let residuals: Vec<f64> = (0..n)
            .map(|i| {
                let fitted: f64 = coefficients
                    .iter()
                    .zip(&columns)
                    .map(|((_, beta), column)| beta * column[i])
                    .sum();
                design.response[i] - fitted
            })
            .collect();

        let rss: f64 = residuals.iter().map(|e| e * e).sum();
        let tss = total_sum_of_squares(&design.response, self.include_intercept);
        let r_squared = if tss > 0.0 {
            (1.0 - rss / tss).clamp(0.0, 1.0)
        } else {
            0.0
        };

        debug!(
            response = %design.response_venue,
            n,
            parameters = p,
            rss,
            r_squared,
            "OLS fit"
        );

        Ok(FitResult {
            response_venue: design.response_venue,
            coefficients,
            residuals,
            rss,
            tss,
            r_squared,
            rows: design.rows.clone(),
        })
    }
}

fn validate(design: &RegressionDesign) -> Result<(), RegressionError> {
    let n = design.len();
    if design.rows.len() != n {
        return Err(RegressionError::InvalidDesign(format!(
            "{} row indices for {} observations",
            design.rows.len(),
            n
        )));
    }
    if design.response.iter().any(|v| !v.is_finite()) {
        return Err(RegressionError::InvalidDesign(
            "non-finite response value".to_string(),
        ));
    }
    for (name, values) in &design.predictors {
        if values.len() != n {
            return Err(RegressionError::InvalidDesign(format!(
                "predictor {} has {} values for {} observations",
                name,
                values.len(),
                n
            )));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(RegressionError::InvalidDesign(format!(
                "non-finite value in predictor {}",
                name
            )));
        }
    }
    Ok(())
}

/// Centred TSS with an intercept, uncentred without
fn total_sum_of_squares(y: &[f64], centred: bool) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let mean = if centred {
        y.iter().sum::<f64>() / y.len() as f64
    } else {
        0.0
    };
    y.iter().map(|v| (v - mean).powi(2)).sum()
}
