//! Lead-lag causality engine
//!
//! Per variable, two lag-1 regressions and two nested F-tests decide
//! whether one venue's past changes predict the other's. Verdicts are
//! collected in fixed tier/variable order and folded into tier rollups.

mod aggregator;
mod evaluator;
mod report;
mod tiers;
mod types;

pub use aggregator::{rollup_tiers, TieredAggregator};
pub use evaluator::PairwiseEvaluator;
pub use report::interpretation;
pub use tiers::{all_variables, Tier};
pub use types::{
    AnalysisError, CausalityTestResult, Direction, FitSummary, FlowPattern, Leader,
    LeadLagReport, TierReport, TierRollup, UnavailableReason, VariableOutcome, VariableReport,
    VariableVerdict,
};
