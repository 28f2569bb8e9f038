//! Tiered aggregation of per-variable verdicts

use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::panel::{PanelBuilder, TimeSeriesPanel, VenueTable};
use crate::regression::RegressionError;
use crate::telemetry::{self, CounterMetric};

use super::evaluator::PairwiseEvaluator;
use super::tiers::{all_variables, Tier};
use super::types::{
    AnalysisError, FlowPattern, Leader, LeadLagReport, TierReport, TierRollup, UnavailableReason,
    VariableOutcome, VariableReport,
};

/// Runs the evaluator over a variable set in tier/variable order
#[derive(Debug, Clone)]
pub struct TieredAggregator {
    evaluator: PairwiseEvaluator,
    variables: Vec<(Tier, &'static str)>,
    parallel: bool,
}

impl TieredAggregator {
    /// Aggregate over all tracked variables
    pub fn new(evaluator: PairwiseEvaluator) -> Self {
        Self {
            evaluator,
            variables: all_variables().collect(),
            parallel: false,
        }
    }

    /// Aggregate over a subset of variables
    ///
    /// The subset keeps the canonical order regardless of the order given.
    /// An empty subset means all variables.
    pub fn with_variables(
        evaluator: PairwiseEvaluator,
        variables: &[String],
    ) -> Result<Self, AnalysisError> {
        if let Some(unknown) = variables.iter().find(|v| Tier::of(v).is_none()) {
            return Err(AnalysisError::UnknownVariable(unknown.clone()));
        }

        let mut aggregator = Self::new(evaluator);
        if !variables.is_empty() {
            aggregator
                .variables
                .retain(|(_, name)| variables.iter().any(|v| v == name));
        }
        Ok(aggregator)
    }

    /// Evaluate variables on the rayon pool
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Variables to analyse, in report order
    pub fn variables(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.variables.iter().map(|(_, v)| *v)
    }

    /// Align two venue tables and analyse them
    pub fn analyze_tables(
        &self,
        venue_a: VenueTable,
        venue_b: VenueTable,
    ) -> Result<LeadLagReport, AnalysisError> {
        let panel = TimeSeriesPanel::align(venue_a, venue_b)?;
        self.run(&panel)
    }

    /// Analyse an aligned panel
    pub fn run(&self, panel: &TimeSeriesPanel) -> Result<LeadLagReport, AnalysisError> {
        let start = Instant::now();
        let builder = PanelBuilder::new(panel);

        info!(
            rows = panel.len(),
            variables = self.variables.len(),
            parallel = self.parallel,
            "Running lead-lag analysis"
        );

        let entries: Vec<VariableReport> = if self.parallel {
            self.variables
                .par_iter()
                .map(|(tier, variable)| self.entry(&builder, *tier, variable))
                .collect::<Result<_, _>>()?
        } else {
            self.variables
                .iter()
                .map(|(tier, variable)| self.entry(&builder, *tier, variable))
                .collect::<Result<_, _>>()?
        };

        let tiers = rollup_tiers(&entries);
        let report = LeadLagReport { entries, tiers };

        telemetry::set_gauge(
            telemetry::GaugeMetric::LeadersDetected,
            report.leader_count() as f64,
        );
        info!(
            leaders = report.leader_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Lead-lag analysis complete"
        );

        Ok(report)
    }

    fn entry(
        &self,
        builder: &PanelBuilder<'_>,
        tier: Tier,
        variable: &str,
    ) -> Result<VariableReport, AnalysisError> {
        let start = Instant::now();

        let outcome = match builder.variable(variable) {
            None => VariableOutcome::Unavailable(UnavailableReason::MissingColumn(
                builder.missing_venues(variable),
            )),
            Some(series) => match self.evaluator.evaluate(&series) {
                Ok(verdict) => VariableOutcome::Computed(Box::new(verdict)),
                Err(RegressionError::SingularDesign(detail)) => {
                    VariableOutcome::Unavailable(UnavailableReason::InsufficientData(detail))
                }
                Err(e) => return Err(e.into()),
            },
        };

        match &outcome {
            VariableOutcome::Computed(_) => {
                telemetry::increment(CounterMetric::VariablesEvaluated);
                telemetry::record_latency(telemetry::LatencyMetric::VariableEvaluation, start.elapsed());
            }
            VariableOutcome::Unavailable(reason) => {
                telemetry::increment(CounterMetric::VariablesUnavailable);
                warn!(variable, %reason, "Variable unavailable");
            }
        }

        Ok(VariableReport {
            variable: variable.to_string(),
            tier,
            outcome,
        })
    }
}

/// Fold per-variable entries into tier rollups
///
/// Tiers appear in canonical order; tiers without entries are omitted.
pub fn rollup_tiers(entries: &[VariableReport]) -> Vec<TierReport> {
    Tier::ALL
        .into_iter()
        .filter_map(|tier| {
            let members: Vec<&VariableReport> = entries.iter().filter(|e| e.tier == tier).collect();
            if members.is_empty() {
                return None;
            }

            let count = |leader: Leader| members.iter().filter(|e| e.leader() == leader).count();
            let leaders_a = count(Leader::VenueA);
            let leaders_b = count(Leader::VenueB);
            let bidirectional = members
                .iter()
                .filter(|e| e.verdict().map(|v| v.flow) == Some(FlowPattern::Bidirectional))
                .count();
            let unavailable = members.iter().filter(|e| e.verdict().is_none()).count();

            Some(TierReport {
                tier,
                variables: members.iter().map(|e| e.variable.clone()).collect(),
                leaders_a,
                leaders_b,
                bidirectional,
                unavailable,
                rollup: TierRollup::from_counts(leaders_a, leaders_b, bidirectional),
            })
        })
        .collect()
}
