//! Rubric score aggregation

use crate::model::Domain;

/// Reduce a rated rubric payload to a single score on the 0-4 scale.
///
/// All indicators across all domains are flattened and carry equal weight;
/// domain boundaries do not affect the average. "Not Observed" indicators
/// contribute to neither numerator nor denominator. The result is rounded to
/// one decimal place. A payload with zero rated indicators scores 0 (not NaN,
/// not an error).
///
/// Pure and deterministic: no state, no side effects.
pub fn score_domains(domains: &[Domain]) -> f64 {
    let mut total_points: u32 = 0;
    let mut observed_count: u32 = 0;

    for domain in domains {
        for indicator in &domain.indicators {
            if let Some(points) = indicator.rating.points() {
                total_points += u32::from(points);
                observed_count += 1;
            }
        }
    }

    if observed_count == 0 {
        return 0.0;
    }

    round_one_decimal(f64::from(total_points) / f64::from(observed_count))
}

/// Round half away from zero to one decimal place
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
