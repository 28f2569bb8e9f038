//! Shared synthetic fixtures

use book_leadlag::panel::{TimeSeriesPanel, VenueTable};
use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Thirty-minute grid starting 2024-12-01 00:00 UTC
pub fn grid(n: usize) -> Vec<DateTime<Utc>> {
    let start = DateTime::from_timestamp(1_733_011_200, 0).unwrap();
    (0..n)
        .map(|i| start + Duration::minutes(30 * i as i64))
        .collect()
}

/// Level series whose differences are iid uniform on [-1, 1)
pub fn random_walk(rng: &mut ChaCha8Rng, n: usize) -> Vec<f64> {
    let mut level = 0.0;
    (0..n)
        .map(|_| {
            level += rng.gen_range(-1.0..1.0);
            level
        })
        .collect()
}

/// `follower[t] = leader[t - 1] + noise`
pub fn follower(leader: &[f64], rng: &mut ChaCha8Rng, noise: f64) -> Vec<f64> {
    (0..leader.len())
        .map(|t| {
            let base = if t == 0 { leader[0] } else { leader[t - 1] };
            base + noise * rng.gen_range(-1.0..1.0)
        })
        .collect()
}

/// Panel from (variable, venue A levels, venue B levels)
pub fn panel(columns: Vec<(&str, Vec<f64>, Vec<f64>)>) -> TimeSeriesPanel {
    let n = columns.first().map(|(_, a, _)| a.len()).unwrap_or(0);
    let mut a = VenueTable::new(grid(n));
    let mut b = VenueTable::new(grid(n));
    for (variable, levels_a, levels_b) in columns {
        a = a.with_column(variable, levels_a);
        b = b.with_column(variable, levels_b);
    }
    TimeSeriesPanel::align(a, b).unwrap()
}
