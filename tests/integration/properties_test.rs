//! Statistical properties over seeded synthetic panels

use book_leadlag::causality::{
    all_variables, Leader, LeadLagReport, PairwiseEvaluator, TieredAggregator,
};
use book_leadlag::panel::{LaggedVariable, Venue};
use book_leadlag::regression::{
    f_statistic, nested_f_test, OlsFitter, Predictor, RegressionError,
};
use rand::Rng;

use crate::common::{follower, panel, random_walk, rng};

const FULL: [Predictor; 2] = [Predictor::Lag(Venue::A), Predictor::Lag(Venue::B)];

fn full_panel_report(seed: u64, n: usize, parallel: bool) -> LeadLagReport {
    let mut rng = rng(seed);
    let columns: Vec<(&str, Vec<f64>, Vec<f64>)> = all_variables()
        .map(|(_, variable)| {
            let a = random_walk(&mut rng, n);
            let b = follower(&a, &mut rng, 0.5);
            (variable, a, b)
        })
        .collect();

    TieredAggregator::new(PairwiseEvaluator::default())
        .parallel(parallel)
        .run(&panel(columns))
        .unwrap()
}

/// Every float in the report as raw bits, in report order
fn report_bits(report: &LeadLagReport) -> Vec<u64> {
    report
        .entries
        .iter()
        .filter_map(|e| e.verdict())
        .flat_map(|v| {
            let mut values = vec![
                v.a_to_b.f_statistic,
                v.a_to_b.p_value,
                v.b_to_a.f_statistic,
                v.b_to_a.p_value,
                v.a_effect_on_b,
                v.b_effect_on_a,
                v.predict_a.r_squared,
                v.predict_b.r_squared,
                v.predict_a.rss,
                v.predict_b.rss,
            ];
            values.extend(v.predict_a.coefficients.values());
            values.extend(v.predict_b.coefficients.values());
            values
        })
        .map(f64::to_bits)
        .collect()
}

#[test]
fn test_repeated_runs_are_bit_identical() {
    let first = full_panel_report(42, 150, false);
    let second = full_panel_report(42, 150, false);

    assert_eq!(first.entries.len(), 19);
    assert_eq!(report_bits(&first).len(), 19 * 16);
    assert_eq!(report_bits(&first), report_bits(&second));
}

#[test]
fn test_parallel_matches_sequential() {
    let sequential = full_panel_report(7, 120, false);
    let parallel = full_panel_report(7, 120, true);

    let order = |r: &LeadLagReport| r.entries.iter().map(|e| e.variable.clone()).collect::<Vec<_>>();
    assert_eq!(order(&sequential), order(&parallel));
    assert_eq!(report_bits(&sequential), report_bits(&parallel));
    assert_eq!(sequential.tiers, parallel.tiers);
}

#[test]
fn test_r_squared_bounds() {
    for seed in 0..10 {
        let report = full_panel_report(seed, 60, false);
        for verdict in report.entries.iter().filter_map(|e| e.verdict()) {
            for fit in [&verdict.predict_a, &verdict.predict_b] {
                assert!(fit.r_squared >= -1e-9 && fit.r_squared <= 1.0 + 1e-9);
                assert!(fit.r_squared < 1.0);
            }
        }
    }
}

#[test]
fn test_f_monotone_in_restricted_rss() {
    let mut rng = rng(99);
    for _ in 0..100 {
        let rss_u: f64 = rng.gen_range(0.1..10.0);
        let df = rng.gen_range(5..500);
        let m = rng.gen_range(1..3);
        let lower = rss_u + rng.gen_range(0.0..5.0);
        let higher = lower + rng.gen_range(1e-6..5.0);
        assert!(f_statistic(higher, rss_u, m, df) > f_statistic(lower, rss_u, m, df));
    }
}

#[test]
fn test_independent_noise_rarely_significant() {
    let trials = 200;
    let mut rejections_a_to_b = 0;
    let mut rejections_b_to_a = 0;
    let evaluator = PairwiseEvaluator::default();

    for seed in 0..trials {
        let mut rng = rng(1_000 + seed);
        let a = random_walk(&mut rng, 200);
        let b = random_walk(&mut rng, 200);
        let verdict = evaluator
            .evaluate(&LaggedVariable::from_levels("mid", &a, &b))
            .unwrap();
        rejections_a_to_b += verdict.a_to_b.is_significant() as usize;
        rejections_b_to_a += verdict.b_to_a.is_significant() as usize;
    }

    // Nominal rate is 5%
    let rate = |count: usize| count as f64 / trials as f64;
    assert!(rate(rejections_a_to_b) < 0.12, "A->B rejection rate {}", rate(rejections_a_to_b));
    assert!(rate(rejections_b_to_a) < 0.12, "B->A rejection rate {}", rate(rejections_b_to_a));
}

#[test]
fn test_known_answer_b_follows_a() {
    let evaluator = PairwiseEvaluator::default();
    let mut a_leads = 0;

    for seed in 0..20 {
        let mut rng = rng(500 + seed);
        let a = random_walk(&mut rng, 200);
        let b = follower(&a, &mut rng, 0.3);
        let verdict = evaluator
            .evaluate(&LaggedVariable::from_levels("mid", &a, &b))
            .unwrap();

        assert!(verdict.a_to_b.is_significant(), "seed {}: p = {}", seed, verdict.a_to_b.p_value);
        assert!(verdict.a_effect_on_b > 0.5);
        if verdict.leader == Leader::VenueA {
            assert!(!verdict.b_to_a.is_significant());
            assert_eq!(verdict.leader_effect, Some(verdict.a_effect_on_b));
            a_leads += 1;
        }
    }

    assert!(a_leads >= 16, "A led in {} of 20 seeds", a_leads);
}

#[test]
fn test_mismatched_rows_are_imbalanced() {
    let mut rng = rng(3);
    let a = random_walk(&mut rng, 40);
    let b = random_walk(&mut rng, 40);
    let series = LaggedVariable::from_levels("spread", &a, &b);

    let rows = series.complete_rows(Venue::B, &FULL);
    let fitter = OlsFitter::new();
    let unrestricted = fitter.fit(&series.design(Venue::B, &FULL, &rows)).unwrap();
    let restricted = fitter
        .fit(&series.design(Venue::B, &[Predictor::Lag(Venue::B)], &rows[1..]))
        .unwrap();

    assert_eq!(unrestricted.n(), 38);
    assert_eq!(restricted.n(), 37);
    assert!(matches!(
        nested_f_test(&unrestricted, &restricted),
        Err(RegressionError::ImbalancedFit {
            unrestricted: 38,
            restricted: 37
        })
    ));
}

#[test]
fn test_nested_pairs_share_rows() {
    let mut rng = rng(11);
    let mut a = random_walk(&mut rng, 60);
    let b = random_walk(&mut rng, 60);
    a[30] = f64::NAN;
    let verdict = PairwiseEvaluator::default()
        .evaluate(&LaggedVariable::from_levels("mid", &a, &b))
        .unwrap();

    assert_eq!(verdict.b_to_a.n, verdict.predict_a.n);
    assert_eq!(verdict.a_to_b.n, verdict.predict_b.n);
    assert_eq!(verdict.b_to_a.df_denominator, verdict.predict_a.n - 3);
}
