//! Lead-lag result types

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::panel::{PanelError, Venue};
use crate::regression::{FitResult, NestedTestResult, RegressionError, TestOutcome};

use super::tiers::Tier;

/// Analysis errors that abort the whole run
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Venue tables could not be aligned
    #[error(transparent)]
    Panel(#[from] PanelError),
    /// Regression invariant violated
    #[error(transparent)]
    Regression(#[from] RegressionError),
    /// Configured variable is not one of the tracked variables
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
}

/// Direction of a Granger test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    /// Does lag(A) help predict B
    AToB,
    /// Does lag(B) help predict A
    BToA,
}

impl Direction {
    /// Venue whose lag is tested
    pub fn source(&self) -> Venue {
        match self {
            Direction::AToB => Venue::A,
            Direction::BToA => Venue::B,
        }
    }

    /// Venue being predicted
    pub fn target(&self) -> Venue {
        self.source().other()
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}->{}", self.source(), self.target())
    }
}

/// Granger test result for one direction of one variable
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CausalityTestResult {
    /// Tested direction
    pub direction: Direction,
    /// F statistic (NaN when indeterminate)
    pub f_statistic: f64,
    /// p-value (NaN when indeterminate)
    pub p_value: f64,
    /// Numerator degrees of freedom
    pub df_numerator: usize,
    /// Denominator degrees of freedom
    pub df_denominator: usize,
    /// Rows used by both nested fits
    pub n: usize,
    /// Decision at α = 0.05
    pub outcome: TestOutcome,
}

impl CausalityTestResult {
    /// Attach a direction to a nested test result
    pub fn new(direction: Direction, test: NestedTestResult) -> Self {
        Self {
            direction,
            f_statistic: test.f_statistic,
            p_value: test.p_value,
            df_numerator: test.df_numerator,
            df_denominator: test.df_denominator,
            n: test.n,
            outcome: test.outcome,
        }
    }

    /// Check if the test is significant
    pub fn is_significant(&self) -> bool {
        self.outcome == TestOutcome::Significant
    }

    /// Check if the test could not be decided
    pub fn is_indeterminate(&self) -> bool {
        self.outcome == TestOutcome::Indeterminate
    }
}

/// Venue declared to lead a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Leader {
    /// Venue A leads
    VenueA,
    /// Venue B leads
    VenueB,
    /// No clear leader
    None,
}

impl Leader {
    /// Leading venue, if any
    pub fn venue(&self) -> Option<Venue> {
        match self {
            Leader::VenueA => Some(Venue::A),
            Leader::VenueB => Some(Venue::B),
            Leader::None => None,
        }
    }
}

/// Cross-venue information flow pattern of one variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowPattern {
    /// Only A's past predicts B
    AToB,
    /// Only B's past predicts A
    BToA,
    /// Each venue's past predicts the other
    Bidirectional,
    /// Neither direction is significant
    NoFlow,
    /// Neither direction is significant and at least one is undefined
    Indeterminate,
}

impl FlowPattern {
    /// Classify from both directional tests
    pub fn classify(a_to_b: &CausalityTestResult, b_to_a: &CausalityTestResult) -> Self {
        match (a_to_b.is_significant(), b_to_a.is_significant()) {
            (true, false) => FlowPattern::AToB,
            (false, true) => FlowPattern::BToA,
            (true, true) => FlowPattern::Bidirectional,
            (false, false) if a_to_b.is_indeterminate() || b_to_a.is_indeterminate() => {
                FlowPattern::Indeterminate
            }
            (false, false) => FlowPattern::NoFlow,
        }
    }

    /// Leader implied by the pattern
    ///
    /// A venue leads only when its test is significant and the reverse is not.
    pub fn leader(&self) -> Leader {
        match self {
            FlowPattern::AToB => Leader::VenueA,
            FlowPattern::BToA => Leader::VenueB,
            _ => Leader::None,
        }
    }
}

/// Serializable view of an unrestricted fit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitSummary {
    /// Venue being predicted
    pub response: Venue,
    /// Rows used
    pub n: usize,
    /// Coefficient of determination
    pub r_squared: f64,
    /// Residual sum of squares
    pub rss: f64,
    /// Coefficients by predictor name
    pub coefficients: BTreeMap<String, f64>,
}

impl From<&FitResult> for FitSummary {
    fn from(fit: &FitResult) -> Self {
        Self {
            response: fit.response_venue(),
            n: fit.n(),
            r_squared: fit.r_squared(),
            rss: fit.rss(),
            coefficients: fit
                .coefficients()
                .iter()
                .map(|(p, c)| (p.to_string(), *c))
                .collect(),
        }
    }
}

/// Lead-lag verdict for one variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableVerdict {
    /// Variable name
    pub variable: String,
    /// ΔA ~ lag(A) + lag(B)
    pub predict_a: FitSummary,
    /// ΔB ~ lag(A) + lag(B)
    pub predict_b: FitSummary,
    /// Does lag(A) help predict B
    pub a_to_b: CausalityTestResult,
    /// Does lag(B) help predict A
    pub b_to_a: CausalityTestResult,
    /// Coefficient on lag(A) when predicting B
    pub a_effect_on_b: f64,
    /// Coefficient on lag(B) when predicting A
    pub b_effect_on_a: f64,
    /// Flow pattern
    pub flow: FlowPattern,
    /// Declared leader
    pub leader: Leader,
    /// Cross-lag coefficient of the leader: a 1-unit move in the leader
    /// predicts a `leader_effect`-unit move in the follower next period
    pub leader_effect: Option<f64>,
}

/// Why a variable has no verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UnavailableReason {
    /// Input lacks the variable for these venues
    MissingColumn(Vec<Venue>),
    /// Too few usable rows or degenerate predictors
    InsufficientData(String),
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::MissingColumn(venues) => {
                let names: Vec<String> = venues.iter().map(|v| v.to_string()).collect();
                write!(f, "missing column for venue {}", names.join(", "))
            }
            UnavailableReason::InsufficientData(detail) => {
                write!(f, "insufficient data: {}", detail)
            }
        }
    }
}

/// Per-variable outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VariableOutcome {
    /// Full statistics
    Computed(Box<VariableVerdict>),
    /// Explicit reason the variable could not be computed
    Unavailable(UnavailableReason),
}

/// One report entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableReport {
    /// Variable name
    pub variable: String,
    /// Tier the variable belongs to
    pub tier: Tier,
    /// Verdict or reason
    pub outcome: VariableOutcome,
}

impl VariableReport {
    /// Verdict, if computed
    pub fn verdict(&self) -> Option<&VariableVerdict> {
        match &self.outcome {
            VariableOutcome::Computed(verdict) => Some(&**verdict),
            VariableOutcome::Unavailable(_) => None,
        }
    }

    /// Leader, or None when unavailable
    pub fn leader(&self) -> Leader {
        self.verdict().map(|v| v.leader).unwrap_or(Leader::None)
    }
}

/// Qualitative rollup of a tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TierRollup {
    /// All declared leaders are on one venue
    ClearLeader(Venue),
    /// No variable shows cross-venue flow
    NoCrossVenueFlow,
    /// Leaders on both venues, or only bidirectional flow
    Mixed,
}

impl TierRollup {
    /// Derive from leader counts
    pub fn from_counts(leaders_a: usize, leaders_b: usize, bidirectional: usize) -> Self {
        match (leaders_a, leaders_b) {
            (0, 0) if bidirectional > 0 => TierRollup::Mixed,
            (0, 0) => TierRollup::NoCrossVenueFlow,
            (_, 0) => TierRollup::ClearLeader(Venue::A),
            (0, _) => TierRollup::ClearLeader(Venue::B),
            _ => TierRollup::Mixed,
        }
    }
}

/// Grouped verdicts of one tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierReport {
    /// Tier
    pub tier: Tier,
    /// Variables in report order
    pub variables: Vec<String>,
    /// Variables led by venue A
    pub leaders_a: usize,
    /// Variables led by venue B
    pub leaders_b: usize,
    /// Variables with significant flow both ways
    pub bidirectional: usize,
    /// Variables without a verdict
    pub unavailable: usize,
    /// Qualitative rollup
    pub rollup: TierRollup,
}

/// Full analysis result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadLagReport {
    /// Every analysed variable exactly once, in tier/variable order
    pub entries: Vec<VariableReport>,
    /// Rollups of the tiers that have variables
    pub tiers: Vec<TierReport>,
}

impl LeadLagReport {
    /// Entry for a variable
    pub fn get(&self, variable: &str) -> Option<&VariableReport> {
        self.entries.iter().find(|e| e.variable == variable)
    }

    /// Verdict for a variable
    pub fn verdict(&self, variable: &str) -> Option<&VariableVerdict> {
        self.get(variable).and_then(VariableReport::verdict)
    }

    /// Rollup of a tier
    pub fn tier(&self, tier: Tier) -> Option<&TierReport> {
        self.tiers.iter().find(|t| t.tier == tier)
    }

    /// Number of variables with a declared leader
    pub fn leader_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.leader() != Leader::None)
            .count()
    }
}
