//! Nested-model F-test
//!
//! F = [(RSS_r - RSS_u) / m] / [RSS_u / (N - k - 1)]
//!
//! m is the number of predictors removed from the unrestricted model and
//! k the number of unrestricted predictors. Without an intercept the
//! denominator degrees of freedom are N - k.

use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use tracing::debug;

use super::types::{FitResult, NestedTestResult, RegressionError, TestOutcome};

/// Fixed significance level
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// RSS_u at or below this fraction of TSS counts as a perfect fit
pub const PERFECT_FIT_TOLERANCE: f64 = 1e-12;

/// F statistic from residual sums of squares
///
/// Clamped at zero when rounding leaves RSS_r marginally below RSS_u.
pub fn f_statistic(rss_restricted: f64, rss_unrestricted: f64, m: usize, df_denominator: usize) -> f64 {
    let numerator = ((rss_restricted - rss_unrestricted) / m as f64).max(0.0);
    let denominator = rss_unrestricted / df_denominator as f64;
    numerator / denominator
}

/// Upper-tail probability of F(df1, df2) at `f`
pub fn upper_tail(f: f64, df1: usize, df2: usize) -> Result<f64, RegressionError> {
    let dist = FisherSnedecor::new(df1 as f64, df2 as f64)
        .map_err(|e| RegressionError::Distribution(e.to_string()))?;
    Ok(dist.sf(f))
}

/// Compare an unrestricted fit against a restricted fit of the same response
pub fn compare(
    unrestricted: &FitResult,
    restricted: &FitResult,
) -> Result<NestedTestResult, RegressionError> {
    if unrestricted.response_venue() != restricted.response_venue() {
        return Err(RegressionError::NotNested(format!(
            "responses differ: {} vs {}",
            unrestricted.response_venue(),
            restricted.response_venue()
        )));
    }

    if unrestricted.rows() != restricted.rows() {
        return Err(RegressionError::ImbalancedFit {
            unrestricted: unrestricted.n(),
            restricted: restricted.n(),
        });
    }

    if unrestricted.has_intercept() != restricted.has_intercept() {
        return Err(RegressionError::NotNested(
            "only one model has an intercept".to_string(),
        ));
    }

    let k = unrestricted.predictors().count();
    let kept = restricted.predictors().count();
    if kept >= k {
        return Err(RegressionError::NotNested(format!(
            "restricted model keeps {} of {} predictors",
            kept, k
        )));
    }
    if let Some(extra) = restricted
        .predictors()
        .find(|p| unrestricted.coefficient(p).is_none())
    {
        return Err(RegressionError::NotNested(format!(
            "restricted predictor {} missing from unrestricted model",
            extra
        )));
    }

    let n = unrestricted.n();
    let m = k - kept;
    let df_denominator = n.saturating_sub(unrestricted.parameter_count());

    let indeterminate = NestedTestResult {
        f_statistic: f64::NAN,
        p_value: f64::NAN,
        df_numerator: m,
        df_denominator,
        n,
        outcome: TestOutcome::Indeterminate,
    };

    let perfect_fit =
        unrestricted.rss() <= PERFECT_FIT_TOLERANCE * unrestricted.tss().max(f64::MIN_POSITIVE);
    if perfect_fit || df_denominator == 0 {
        debug!(
            n,
            rss_unrestricted = unrestricted.rss(),
            df_denominator,
            "F-test indeterminate"
        );
        return Ok(indeterminate);
    }

    let f = f_statistic(restricted.rss(), unrestricted.rss(), m, df_denominator);
    if !f.is_finite() {
        return Ok(indeterminate);
    }

    let p_value = upper_tail(f, m, df_denominator)?;
    if !p_value.is_finite() {
        return Ok(NestedTestResult {
            f_statistic: f,
            ..indeterminate
        });
    }

    let outcome = if p_value < SIGNIFICANCE_LEVEL {
        TestOutcome::Significant
    } else {
        TestOutcome::NotSignificant
    };

    debug!(n, m, df_denominator, f, p_value, %outcome, "F-test");

    Ok(NestedTestResult {
        f_statistic: f,
        p_value,
        df_numerator: m,
        df_denominator,
        n,
        outcome,
    })
}
