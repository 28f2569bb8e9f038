//! Panel types
//!
//! Per-venue tables and the aligned panel built from them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// One of the two venues whose order books are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Venue {
    /// First venue (Polymarket by default)
    A,
    /// Second venue (Kalshi by default)
    B,
}

impl Venue {
    /// Get the other venue
    pub fn other(&self) -> Self {
        match self {
            Venue::A => Venue::B,
            Venue::B => Venue::A,
        }
    }
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Venue::A => write!(f, "A"),
            Venue::B => write!(f, "B"),
        }
    }
}

/// Panel construction errors
#[derive(Debug, Error)]
pub enum PanelError {
    /// Venue tables do not share a usable timestamp index
    #[error("Alignment error: {0}")]
    Alignment(String),
}

/// One venue's variables on a timestamp index
///
/// Non-finite values mark missing observations.
#[derive(Debug, Clone, Default)]
pub struct VenueTable {
    /// Interval timestamps
    pub timestamps: Vec<DateTime<Utc>>,
    /// Variable name -> values, one per timestamp
    pub columns: BTreeMap<String, Vec<f64>>,
}

impl VenueTable {
    /// Create an empty table over the given timestamps
    pub fn new(timestamps: Vec<DateTime<Utc>>) -> Self {
        Self {
            timestamps,
            columns: BTreeMap::new(),
        }
    }

    /// Add (or replace) a variable column
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.insert(name.into(), values);
        self
    }

    /// Get a variable column
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Time-aligned observations of both venues
///
/// Timestamps are strictly increasing and uniformly spaced. Gaps are rows
/// holding non-finite values, never skipped rows.
#[derive(Debug, Clone)]
pub struct TimeSeriesPanel {
    timestamps: Vec<DateTime<Utc>>,
    interval: Option<Duration>,
    venue_a: BTreeMap<String, Vec<f64>>,
    venue_b: BTreeMap<String, Vec<f64>>,
}

impl TimeSeriesPanel {
    /// Align two venue tables into a panel
    ///
    /// Fails with [`PanelError::Alignment`] when the timestamp indices differ,
    /// are not strictly increasing and evenly spaced, or when a column length
    /// does not match the index.
    pub fn align(a: VenueTable, b: VenueTable) -> Result<Self, PanelError> {
        if a.timestamps.len() != b.timestamps.len() {
            return Err(PanelError::Alignment(format!(
                "venue tables have {} and {} rows",
                a.timestamps.len(),
                b.timestamps.len()
            )));
        }

        if let Some(row) = a
            .timestamps
            .iter()
            .zip(&b.timestamps)
            .position(|(ta, tb)| ta != tb)
        {
            return Err(PanelError::Alignment(format!(
                "timestamps differ at row {}: {} vs {}",
                row, a.timestamps[row], b.timestamps[row]
            )));
        }

        let interval = check_spacing(&a.timestamps)?;

        for (venue, table) in [(Venue::A, &a), (Venue::B, &b)] {
            for (name, values) in &table.columns {
                if values.len() != table.timestamps.len() {
                    return Err(PanelError::Alignment(format!(
                        "venue {} column '{}' has {} values for {} timestamps",
                        venue,
                        name,
                        values.len(),
                        table.timestamps.len()
                    )));
                }
            }
        }

        Ok(Self {
            timestamps: a.timestamps,
            interval,
            venue_a: a.columns,
            venue_b: b.columns,
        })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the panel has no rows
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Row timestamps
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Spacing between rows (None with fewer than two rows)
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Get a venue's column for a variable
    pub fn column(&self, venue: Venue, variable: &str) -> Option<&[f64]> {
        let columns = match venue {
            Venue::A => &self.venue_a,
            Venue::B => &self.venue_b,
        };
        columns.get(variable).map(Vec::as_slice)
    }
}

fn check_spacing(timestamps: &[DateTime<Utc>]) -> Result<Option<Duration>, PanelError> {
    let Some(interval) = timestamps.windows(2).next().map(|w| w[1] - w[0]) else {
        return Ok(None);
    };

    for (i, pair) in timestamps.windows(2).enumerate() {
        let step = pair[1] - pair[0];
        if step <= Duration::zero() {
            return Err(PanelError::Alignment(format!(
                "timestamps not strictly increasing at row {} ({})",
                i + 1,
                pair[1]
            )));
        }
        if step != interval {
            return Err(PanelError::Alignment(format!(
                "uneven spacing at row {}: {}s, expected {}s",
                i + 1,
                step.num_seconds(),
                interval.num_seconds()
            )));
        }
    }

    Ok(Some(interval))
}
