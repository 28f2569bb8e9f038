//! Text rendering of lead-lag reports

use std::fmt::Write;

use crate::config::VenuesConfig;
use crate::panel::Venue;

use super::types::{
    CausalityTestResult, FlowPattern, LeadLagReport, TierReport, TierRollup, VariableOutcome,
    VariableVerdict,
};

const RULE: &str = "════════════════════════════════════════════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "────────────────────────────────────────────────────────────────────────────────────────────────────";

/// One-line reading of a verdict
pub fn interpretation(verdict: &VariableVerdict, venues: &VenuesConfig) -> String {
    let a = capitalize(venues.label(Venue::A));
    let b = capitalize(venues.label(Venue::B));
    match verdict.flow {
        FlowPattern::AToB => format!("{} moves -> {} follows ({:.2}x)", a, b, verdict.a_effect_on_b),
        FlowPattern::BToA => format!("{} moves -> {} follows ({:.2}x)", b, a, verdict.b_effect_on_a),
        FlowPattern::Bidirectional => "Bidirectional flow".to_string(),
        FlowPattern::NoFlow => "No significant cross-venue flow".to_string(),
        FlowPattern::Indeterminate => "Indeterminate (perfect fit or no residual df)".to_string(),
    }
}

/// F column cell: `F=12.3***` when significant
fn f_cell(test: &CausalityTestResult) -> String {
    if test.is_indeterminate() || !test.f_statistic.is_finite() {
        return "F=n/a".to_string();
    }
    let stars = if test.is_significant() { "***" } else { "" };
    format!("F={:.1}{}", test.f_statistic, stars)
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn rollup_line(tier: &TierReport, venues: &VenuesConfig) -> String {
    let verdict = match tier.rollup {
        TierRollup::ClearLeader(venue) => format!("{} leads", venues.label(venue).to_uppercase()),
        TierRollup::NoCrossVenueFlow => "no cross-venue flow".to_string(),
        TierRollup::Mixed => "mixed".to_string(),
    };
    format!(
        "Rollup: {} ({} led by {}, {} led by {}, {} bidirectional, {} unavailable)",
        verdict,
        tier.leaders_a,
        venues.label(Venue::A),
        tier.leaders_b,
        venues.label(Venue::B),
        tier.bidirectional,
        tier.unavailable
    )
}

impl LeadLagReport {
    /// Per-tier table: F per direction, leader and interpretation
    pub fn format_table(&self, venues: &VenuesConfig) -> String {
        let a = capitalize(venues.label(Venue::A));
        let b = capitalize(venues.label(Venue::B));
        let a_to_b = format!("{}->{}", a, b);
        let b_to_a = format!("{}->{}", b, a);

        let mut out = String::new();
        for tier in &self.tiers {
            let _ = writeln!(out, "\n{}", RULE);
            let _ = writeln!(out, "{}", tier.tier.title());
            let _ = writeln!(out, "Question: {}", tier.tier.question());
            let _ = writeln!(out, "{}", RULE);
            let _ = writeln!(
                out,
                "\n{:<20} {:<18} {:<18} {:<12} Interpretation",
                "Variable", a_to_b, b_to_a, "Leader"
            );
            let _ = writeln!(out, "{}", THIN_RULE);

            for entry in self.entries.iter().filter(|e| e.tier == tier.tier) {
                match &entry.outcome {
                    VariableOutcome::Computed(verdict) => {
                        let leader = verdict
                            .leader
                            .venue()
                            .map(|v| venues.label(v).to_uppercase())
                            .unwrap_or_else(|| "NONE".to_string());
                        let _ = writeln!(
                            out,
                            "{:<20} {:<18} {:<18} {:<12} {}",
                            entry.variable,
                            f_cell(&verdict.a_to_b),
                            f_cell(&verdict.b_to_a),
                            leader,
                            interpretation(verdict, venues)
                        );
                    }
                    VariableOutcome::Unavailable(reason) => {
                        let _ = writeln!(out, "{:<20} UNAVAILABLE: {}", entry.variable, reason);
                    }
                }
            }

            let _ = writeln!(out, "\n{}", rollup_line(tier, venues));
        }

        let _ = writeln!(out, "\n{}", RULE);
        let _ = writeln!(out, "***: significant at the 5% level (p < 0.05)");
        let _ = writeln!(
            out,
            "Leader: a venue leads when its past predicts the other and not the reverse"
        );
        out
    }
}

impl VariableVerdict {
    /// Both regressions and tests of one variable
    pub fn format_detail(&self, venues: &VenuesConfig) -> String {
        let a = capitalize(venues.label(Venue::A));
        let b = capitalize(venues.label(Venue::B));
        let coefficient = |fit: &super::types::FitSummary, name: &str| {
            fit.coefficients.get(name).copied().unwrap_or(0.0)
        };

        let mut out = String::new();
        let _ = writeln!(out, "{}", RULE);
        let _ = writeln!(out, "VAR RESULTS: {}", self.variable.to_uppercase());
        let _ = writeln!(out, "{}", RULE);

        for (fit, response) in [(&self.predict_a, &a), (&self.predict_b, &b)] {
            let _ = writeln!(out, "\n--- Predicting Δ{} (N = {}) ---", response, fit.n);
            let _ = writeln!(
                out,
                "Δ{}_t = {:.6} + {:.4}·Δ{}_{{t-1}} + {:.4}·Δ{}_{{t-1}}",
                response,
                coefficient(fit, "intercept"),
                coefficient(fit, "lag_a"),
                a,
                coefficient(fit, "lag_b"),
                b
            );
            let _ = writeln!(
                out,
                "R² = {:.4} ({:.1}% of variance explained)",
                fit.r_squared,
                fit.r_squared * 100.0
            );
        }

        let _ = writeln!(out, "\n--- Granger Causality Tests ---");
        for (test, from, to) in [(&self.b_to_a, &b, &a), (&self.a_to_b, &a, &b)] {
            let mark = if test.is_significant() {
                "***"
            } else if test.is_indeterminate() {
                "(indeterminate)"
            } else {
                "(not significant)"
            };
            let _ = writeln!(
                out,
                "{} → {}:  F = {:.3}, p = {:.4} {}",
                from, to, test.f_statistic, test.p_value, mark
            );
        }

        let _ = writeln!(out, "\n--- Interpretation ---");
        let _ = writeln!(out, "→ {}", interpretation(self, venues));
        if let (Some(leader), Some(effect)) = (self.leader.venue(), self.leader_effect) {
            let _ = writeln!(
                out,
                "  A 1-unit move in {} predicts a {:.2}-unit move in {} next period",
                capitalize(venues.label(leader)),
                effect,
                capitalize(venues.label(leader.other()))
            );
        }
        out
    }
}
