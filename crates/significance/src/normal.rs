//! Standard normal distribution primitives.

use convertlab_core::error::{AnalysisError, AnalysisResult};

// Abramowitz & Stegun 7.1.26 erf coefficients, max absolute error 1.5e-7.
const A1: f64 = 0.254829592;
const A2: f64 = -0.284496736;
const A3: f64 = 1.421413741;
const A4: f64 = -1.453152027;
const A5: f64 = 1.061405429;
const P: f64 = 0.3275911;

/// Beyond this the CDF is indistinguishable from 0 or 1 at the precision
/// the approximation delivers.
const SATURATION_BOUND: f64 = 8.0;

/// Standard normal cumulative distribution function.
///
/// Accurate to roughly 7 decimal digits for `|x| <= 8`; saturates to 0 or 1
/// beyond that. Non-finite input is a caller bug and is rejected rather
/// than clamped.
pub fn cdf(x: f64) -> AnalysisResult<f64> {
    if !x.is_finite() {
        return Err(AnalysisError::InvalidInput(format!(
            "normal cdf requires a finite argument, got {x}"
        )));
    }
    // The polynomial misses exactness at the origin by ~1e-9.
    if x == 0.0 {
        return Ok(0.5);
    }
    if x > SATURATION_BOUND {
        return Ok(1.0);
    }
    if x < -SATURATION_BOUND {
        return Ok(0.0);
    }

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs() / std::f64::consts::SQRT_2;

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - ((((A5 * t + A4) * t + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    Ok(0.5 * (1.0 + sign * y))
}

/// Inverse CDF (probit) by bisection over the saturation interval.
///
/// Resolution is bounded by the CDF approximation error, which is ample for
/// critical values at conventional alpha/power operating points.
pub fn inverse_cdf(p: f64) -> AnalysisResult<f64> {
    if !p.is_finite() || p <= 0.0 || p >= 1.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "inverse cdf requires a probability in (0, 1), got {p}"
        )));
    }

    let mut lo = -SATURATION_BOUND;
    let mut hi = SATURATION_BOUND;
    // 60 halvings shrink the bracket far below the CDF's own error.
    for _ in 0..60 {
        let mid = 0.5 * (lo + hi);
        if cdf(mid)? < p {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}
