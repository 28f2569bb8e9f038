//! Panel module
//!
//! Aligns the two venues' interval tables and derives the first-difference
//! and lag-1 series every regression is built from:
//!
//! 1. Both tables must share one strictly increasing, evenly spaced index
//! 2. Δx_t = x_t - x_{t-1} per venue and variable
//! 3. Predictors at row t are Δx_{t-1}
//! 4. Rows with a non-finite response or predictor are dropped per regression

mod builder;
mod types;

pub use builder::{LaggedVariable, PanelBuilder, VariableSeries};
pub use types::{PanelError, TimeSeriesPanel, Venue, VenueTable};
