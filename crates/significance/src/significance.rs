//! Pooled two-proportion z-test over raw variant counters.

use convertlab_core::error::AnalysisResult;
use convertlab_core::types::{SignificanceResult, VariantStats};
use tracing::debug;

use crate::normal;

/// Run the two-sided z-test for treatment vs. control.
///
/// Degenerate inputs (an arm with no visitors, or zero pooled variance)
/// resolve to the conservative `p = 1` result rather than an error: a
/// no-data state is never reported as significant.
pub fn compute(
    control: &VariantStats,
    treatment: &VariantStats,
) -> AnalysisResult<SignificanceResult> {
    control.validate()?;
    treatment.validate()?;

    let control_rate = control.conversion_rate();
    let treatment_rate = treatment.conversion_rate();

    if control.visitors == 0 || treatment.visitors == 0 {
        return Ok(SignificanceResult {
            z_score: 0.0,
            p_value: 1.0,
            confidence_pct: 0.0,
            lift_pct: None,
        });
    }

    let pooled_rate = (control.conversions + treatment.conversions) as f64
        / (control.visitors + treatment.visitors) as f64;
    let standard_error = (pooled_rate
        * (1.0 - pooled_rate)
        * (1.0 / control.visitors as f64 + 1.0 / treatment.visitors as f64))
        .sqrt();

    // Pooled rate of exactly 0 or 1: no variance to test against.
    if standard_error == 0.0 {
        return Ok(SignificanceResult {
            z_score: 0.0,
            p_value: 1.0,
            confidence_pct: 0.0,
            lift_pct: lift_pct(control_rate, treatment_rate),
        });
    }

    let z_score = (treatment_rate - control_rate) / standard_error;
    let p_value = (2.0 * (1.0 - normal::cdf(z_score.abs())?)).clamp(0.0, 1.0);
    let confidence_pct = (1.0 - p_value) * 100.0;

    debug!(z_score, p_value, confidence_pct, "Computed two-proportion z-test");

    Ok(SignificanceResult {
        z_score,
        p_value,
        confidence_pct,
        lift_pct: lift_pct(control_rate, treatment_rate),
    })
}

fn lift_pct(control_rate: f64, treatment_rate: f64) -> Option<f64> {
    if control_rate == 0.0 {
        None
    } else {
        Some((treatment_rate - control_rate) / control_rate * 100.0)
    }
}
