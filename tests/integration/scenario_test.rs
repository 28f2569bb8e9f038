//! Hand-checkable five-row scenario: B repeats A one interval later

use book_leadlag::causality::{
    FlowPattern, Leader, PairwiseEvaluator, TieredAggregator, UnavailableReason, VariableOutcome,
};
use book_leadlag::panel::{PanelBuilder, Venue};
use book_leadlag::regression::{nested_f_test, OlsFitter, Predictor, TestOutcome};

use crate::common::panel;

const LEVELS_A: [f64; 5] = [0.0, 1.0, 1.0, 2.0, 2.0];
const LEVELS_B: [f64; 5] = [0.0, 0.0, 1.0, 1.0, 2.0];

fn scenario() -> book_leadlag::panel::TimeSeriesPanel {
    panel(vec![("mid", LEVELS_A.to_vec(), LEVELS_B.to_vec())])
}

#[test]
fn test_differences() {
    let panel = scenario();
    let series = PanelBuilder::new(&panel).variable("mid").unwrap();

    assert!(series.series(Venue::A).delta(0).is_nan());
    assert_eq!(&series.series(Venue::A).deltas()[1..], &[1.0, 0.0, 1.0, 0.0]);
    assert_eq!(&series.series(Venue::B).deltas()[1..], &[0.0, 1.0, 0.0, 1.0]);
    assert_eq!(series.response_rows(), 2..5);
}

#[test]
fn test_lag_a_recovers_unit_coefficient() {
    let panel = scenario();
    let series = PanelBuilder::new(&panel).variable("mid").unwrap();
    let lag_a = [Predictor::Lag(Venue::A)];
    let rows = series.complete_rows(Venue::B, &lag_a);
    assert_eq!(rows, vec![2, 3, 4]);

    let fitter = OlsFitter::new();
    let unrestricted = fitter.fit(&series.design(Venue::B, &lag_a, &rows)).unwrap();
    let restricted = fitter.fit(&series.design(Venue::B, &[], &rows)).unwrap();

    assert!((unrestricted.coefficient(&Predictor::Lag(Venue::A)).unwrap() - 1.0).abs() < 1e-9);
    assert!(unrestricted.coefficient(&Predictor::Intercept).unwrap().abs() < 1e-9);
    assert!(unrestricted.rss() < 1e-20);

    let test = nested_f_test(&unrestricted, &restricted).unwrap();
    assert_eq!(test.outcome, TestOutcome::Indeterminate);
    assert!(!test.is_significant());
    assert!(test.f_statistic.is_nan());
    assert_eq!(test.n, 3);
}

#[test]
fn test_perfect_fit_without_intercept_is_indeterminate() {
    let panel = scenario();
    let series = PanelBuilder::new(&panel).variable("mid").unwrap();
    let evaluator = PairwiseEvaluator::new(OlsFitter::with_intercept(false));
    let verdict = evaluator.evaluate(&series).unwrap();

    assert!((verdict.a_effect_on_b - 1.0).abs() < 1e-9);
    assert!(verdict.predict_b.rss < 1e-20);
    assert_eq!(verdict.a_to_b.outcome, TestOutcome::Indeterminate);
    assert_eq!(verdict.a_to_b.df_denominator, 1);
    assert_eq!(verdict.b_to_a.outcome, TestOutcome::Indeterminate);
    assert_eq!(verdict.flow, FlowPattern::Indeterminate);
    assert_eq!(verdict.leader, Leader::None);
    assert!(verdict.leader_effect.is_none());
}

#[test]
fn test_with_intercept_is_reported_unavailable() {
    // lag(A) + lag(B) = 1 on rows 2..5: collinear with the intercept
    let report = TieredAggregator::with_variables(PairwiseEvaluator::default(), &["mid".to_string()])
        .unwrap()
        .run(&scenario())
        .unwrap();

    assert_eq!(report.entries.len(), 1);
    assert!(matches!(
        report.entries[0].outcome,
        VariableOutcome::Unavailable(UnavailableReason::InsufficientData(_))
    ));
    assert_eq!(report.entries[0].leader(), Leader::None);
    assert_eq!(report.leader_count(), 0);
}
