//! Pairwise causality evaluation
//!
//! For one variable:
//! 1. Fit ΔA ~ lag(A) + lag(B) and ΔB ~ lag(A) + lag(B)
//! 2. Refit each response on its own lag only, over the same rows
//! 3. Test B->A (does lag(B) help predict A) and A->B
//! 4. Read the cross-lag coefficients by predictor name
//! 5. Declare a leader only for significant one-way flow

use tracing::debug;

use crate::panel::{LaggedVariable, Venue};
use crate::regression::{nested_f_test, FitResult, NestedTestResult, OlsFitter, Predictor, RegressionError};

use super::types::{CausalityTestResult, Direction, FitSummary, FlowPattern, Leader, VariableVerdict};

const UNRESTRICTED: [Predictor; 2] = [Predictor::Lag(Venue::A), Predictor::Lag(Venue::B)];

/// Runs the four fits and two nested tests of one variable
#[derive(Debug, Clone, Copy, Default)]
pub struct PairwiseEvaluator {
    fitter: OlsFitter,
}

impl PairwiseEvaluator {
    /// Create an evaluator with the given fitter
    pub fn new(fitter: OlsFitter) -> Self {
        Self { fitter }
    }

    /// Get the fitter
    pub fn fitter(&self) -> &OlsFitter {
        &self.fitter
    }

    /// Evaluate one variable
    ///
    /// `SingularDesign` means the variable has too little usable data;
    /// any other error is a logic fault.
    pub fn evaluate(&self, series: &LaggedVariable) -> Result<VariableVerdict, RegressionError> {
        let (predict_a, b_to_a) = self.predict(series, Venue::A)?;
        let (predict_b, a_to_b) = self.predict(series, Venue::B)?;

        let a_to_b = CausalityTestResult::new(Direction::AToB, a_to_b);
        let b_to_a = CausalityTestResult::new(Direction::BToA, b_to_a);

        let a_effect_on_b = cross_coefficient(&predict_b, Venue::A)?;
        let b_effect_on_a = cross_coefficient(&predict_a, Venue::B)?;

        let flow = FlowPattern::classify(&a_to_b, &b_to_a);
        let leader = flow.leader();
        let leader_effect = match leader {
            Leader::VenueA => Some(a_effect_on_b),
            Leader::VenueB => Some(b_effect_on_a),
            Leader::None => None,
        };

        debug!(
            variable = %series.variable,
            f_a_to_b = a_to_b.f_statistic,
            p_a_to_b = a_to_b.p_value,
            f_b_to_a = b_to_a.f_statistic,
            p_b_to_a = b_to_a.p_value,
            ?leader,
            "Variable evaluated"
        );

        Ok(VariableVerdict {
            variable: series.variable.clone(),
            predict_a: FitSummary::from(&predict_a),
            predict_b: FitSummary::from(&predict_b),
            a_to_b,
            b_to_a,
            a_effect_on_b,
            b_effect_on_a,
            flow,
            leader,
            leader_effect,
        })
    }

    /// Unrestricted fit of `response` and the test of the other venue's lag
    fn predict(
        &self,
        series: &LaggedVariable,
        response: Venue,
    ) -> Result<(FitResult, NestedTestResult), RegressionError> {
        let rows = series.complete_rows(response, &UNRESTRICTED);
        let own_lag = [Predictor::Lag(response)];

        let unrestricted = self
            .fitter
            .fit(&series.design(response, &UNRESTRICTED, &rows))?;
        let restricted = self.fitter.fit(&series.design(response, &own_lag, &rows))?;
        let test = nested_f_test(&unrestricted, &restricted)?;

        Ok((unrestricted, test))
    }
}

fn cross_coefficient(fit: &FitResult, source: Venue) -> Result<f64, RegressionError> {
    let predictor = Predictor::Lag(source);
    fit.coefficient(&predictor).ok_or_else(|| {
        RegressionError::InvalidDesign(format!("fit has no coefficient for {}", predictor))
    })
}
