//! Differenced and lagged series
//!
//! For one variable, builds Δx_t = x_t - x_{t-1} for both venues and the
//! lag-1 predictors Δx_{t-1}. Response rows start at t = 2: row 0 has no
//! difference and row 1 has no lagged difference.

use std::ops::Range;

use crate::regression::{Predictor, RegressionDesign};

use super::types::{TimeSeriesPanel, Venue};

/// First differences of one variable on one venue
///
/// Indexed by panel row. Row 0 is undefined (NaN).
#[derive(Debug, Clone)]
pub struct VariableSeries {
    /// Variable name
    pub variable: String,
    /// Venue
    pub venue: Venue,
    deltas: Vec<f64>,
}

impl VariableSeries {
    /// Difference a level series
    pub fn from_levels(variable: impl Into<String>, venue: Venue, levels: &[f64]) -> Self {
        let deltas = (0..levels.len())
            .map(|t| {
                if t == 0 {
                    f64::NAN
                } else {
                    levels[t] - levels[t - 1]
                }
            })
            .collect();

        Self {
            variable: variable.into(),
            venue,
            deltas,
        }
    }

    /// Δx_t (non-finite when undefined or missing)
    pub fn delta(&self, t: usize) -> f64 {
        self.deltas.get(t).copied().unwrap_or(f64::NAN)
    }

    /// Δx_{t-1}
    pub fn lagged(&self, t: usize) -> f64 {
        match t {
            0 => f64::NAN,
            _ => self.delta(t - 1),
        }
    }

    /// All differences by panel row
    pub fn deltas(&self) -> &[f64] {
        &self.deltas
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.deltas.len()
    }

    /// Check if the series has no rows
    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }
}

/// Both venues' differenced series for one variable
#[derive(Debug, Clone)]
pub struct LaggedVariable {
    /// Variable name
    pub variable: String,
    venue_a: VariableSeries,
    venue_b: VariableSeries,
}

impl LaggedVariable {
    /// Build from both venues' level series
    pub fn from_levels(variable: impl Into<String>, levels_a: &[f64], levels_b: &[f64]) -> Self {
        let variable = variable.into();
        Self {
            venue_a: VariableSeries::from_levels(variable.clone(), Venue::A, levels_a),
            venue_b: VariableSeries::from_levels(variable.clone(), Venue::B, levels_b),
            variable,
        }
    }

    /// Differenced series of a venue
    pub fn series(&self, venue: Venue) -> &VariableSeries {
        match venue {
            Venue::A => &self.venue_a,
            Venue::B => &self.venue_b,
        }
    }

    /// Candidate response rows before missing-value exclusion
    pub fn response_rows(&self) -> Range<usize> {
        2..self.venue_a.len().min(self.venue_b.len()).max(2)
    }

    /// Value of a named predictor at response row t
    pub fn predictor_value(&self, predictor: Predictor, t: usize) -> f64 {
        match predictor {
            Predictor::Intercept => 1.0,
            Predictor::Lag(venue) => self.series(venue).lagged(t),
        }
    }

    /// Rows where the response and every listed predictor are finite
    pub fn complete_rows(&self, response: Venue, predictors: &[Predictor]) -> Vec<usize> {
        let series = self.series(response);
        self.response_rows()
            .filter(|&t| {
                series.delta(t).is_finite()
                    && predictors
                        .iter()
                        .all(|p| self.predictor_value(*p, t).is_finite())
            })
            .collect()
    }

    /// Build a design over the given rows
    ///
    /// Rows normally come from [`complete_rows`](Self::complete_rows) so that
    /// nested models share one row set.
    pub fn design(&self, response: Venue, predictors: &[Predictor], rows: &[usize]) -> RegressionDesign {
        let series = self.series(response);
        RegressionDesign {
            response_venue: response,
            response: rows.iter().map(|&t| series.delta(t)).collect(),
            predictors: predictors
                .iter()
                .map(|p| (*p, rows.iter().map(|&t| self.predictor_value(*p, t)).collect()))
                .collect(),
            rows: rows.to_vec(),
        }
    }
}

/// Derives lagged series from an aligned panel
pub struct PanelBuilder<'a> {
    panel: &'a TimeSeriesPanel,
}

impl<'a> PanelBuilder<'a> {
    /// Create a builder over a panel
    pub fn new(panel: &'a TimeSeriesPanel) -> Self {
        Self { panel }
    }

    /// Venues lacking a column for the variable
    pub fn missing_venues(&self, variable: &str) -> Vec<Venue> {
        [Venue::A, Venue::B]
            .into_iter()
            .filter(|v| self.panel.column(*v, variable).is_none())
            .collect()
    }

    /// Differenced and lagged series for a variable
    ///
    /// Returns None when either venue lacks the column.
    pub fn variable(&self, variable: &str) -> Option<LaggedVariable> {
        let levels_a = self.panel.column(Venue::A, variable)?;
        let levels_b = self.panel.column(Venue::B, variable)?;
        Some(LaggedVariable::from_levels(variable, levels_a, levels_b))
    }
}
