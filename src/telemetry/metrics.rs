//! Run metrics
//!
//! Recorded through the `metrics` facade. Without an installed recorder
//! every call is a no-op.

use std::time::Duration;

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Variables with a computed verdict
    VariablesEvaluated,
    /// Variables reported unavailable
    VariablesUnavailable,
}

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Four fits and two tests of one variable
    VariableEvaluation,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Variables with a declared leader in the last run
    LeadersDetected,
}

impl CounterMetric {
    fn name(&self) -> &'static str {
        match self {
            CounterMetric::VariablesEvaluated => "leadlag_variables_evaluated_total",
            CounterMetric::VariablesUnavailable => "leadlag_variables_unavailable_total",
        }
    }
}

impl LatencyMetric {
    fn name(&self) -> &'static str {
        match self {
            LatencyMetric::VariableEvaluation => "leadlag_variable_evaluation_ms",
        }
    }
}

impl GaugeMetric {
    fn name(&self) -> &'static str {
        match self {
            GaugeMetric::LeadersDetected => "leadlag_leaders_detected",
        }
    }
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    ::metrics::counter!(metric.name()).increment(1);
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let value_ms = duration.as_secs_f64() * 1000.0;
    ::metrics::histogram!(metric.name()).record(value_ms);
    tracing::trace!(metric = metric.name(), value_ms, "Recording latency");
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    ::metrics::gauge!(metric.name()).set(value);
}
