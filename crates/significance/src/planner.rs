//! Fixed-horizon sample-size planning and traffic-velocity estimation.

use chrono::{DateTime, Utc};
use convertlab_core::error::{AnalysisError, AnalysisResult};
use tracing::debug;

use crate::normal;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Visitors required per variant to detect a relative conversion-rate
/// change of `minimum_detectable_effect` over `baseline_rate` at the given
/// power and two-sided alpha.
pub fn required_sample_size(
    baseline_rate: f64,
    minimum_detectable_effect: f64,
    power: f64,
    alpha: f64,
) -> AnalysisResult<u64> {
    if !baseline_rate.is_finite() || baseline_rate <= 0.0 || baseline_rate >= 1.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "baseline rate must be in (0, 1), got {baseline_rate}"
        )));
    }
    if !minimum_detectable_effect.is_finite() || minimum_detectable_effect == 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "minimum detectable effect must be a non-zero finite ratio, got {minimum_detectable_effect}"
        )));
    }

    let z_alpha = normal::inverse_cdf(1.0 - alpha / 2.0)?;
    let z_beta = normal::inverse_cdf(power)?;

    let p1 = baseline_rate;
    let p2 = baseline_rate * (1.0 + minimum_detectable_effect);

    let numerator = 2.0 * (z_alpha + z_beta).powi(2) * p1 * (1.0 - p1);
    let denominator = (p2 - p1).powi(2);
    let required = (numerator / denominator).ceil() as u64;

    debug!(baseline_rate, minimum_detectable_effect, required, "Planned sample size");

    Ok(required)
}

/// Elapsed days since the experiment started, rounded up. Can be zero or
/// negative under clock skew; velocity estimation clamps it.
pub fn days_since_start(started_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (now - started_at).num_seconds();
    (seconds as f64 / SECONDS_PER_DAY).ceil() as i64
}

/// Days until the experiment reaches `2 * required_per_variant` total
/// visitors at the observed daily velocity. `None` when no traffic has
/// arrived, so velocity is unknown. A completed experiment reports 0, not a
/// negative count.
pub fn estimate_days_remaining(
    total_visitors: u64,
    required_per_variant: u64,
    days_since_start: i64,
) -> Option<u64> {
    let daily_velocity = total_visitors as f64 / days_since_start.max(1) as f64;
    if daily_velocity == 0.0 {
        return None;
    }

    let still_needed =
        required_per_variant.saturating_mul(2) as f64 - total_visitors as f64;
    Some((still_needed / daily_velocity).ceil().max(0.0) as u64)
}
