use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Thresholds and planning defaults for experiment analysis. The defaults
/// mirror the conventional operating point: 95% significance, 80% power,
/// 10% minimum detectable effect, 100-visitor reporting floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Total visitors (both arms) below which no verdict is reported.
    #[serde(default = "default_min_total_visitors")]
    pub min_total_visitors: u64,
    /// Confidence (percent) required to declare a winner.
    #[serde(default = "default_significance_threshold_pct")]
    pub significance_threshold_pct: f64,
    /// Confidence (percent) at which a running test is reported as trending.
    #[serde(default = "default_trending_threshold_pct")]
    pub trending_threshold_pct: f64,
    /// Smallest relative conversion-rate change worth detecting.
    #[serde(default = "default_minimum_detectable_effect")]
    pub minimum_detectable_effect: f64,
    /// Statistical power of the sample-size plan.
    #[serde(default = "default_power")]
    pub power: f64,
    /// Two-sided false-positive rate of the sample-size plan.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

fn default_min_total_visitors() -> u64 {
    100
}
fn default_significance_threshold_pct() -> f64 {
    95.0
}
fn default_trending_threshold_pct() -> f64 {
    80.0
}
fn default_minimum_detectable_effect() -> f64 {
    0.10
}
fn default_power() -> f64 {
    0.80
}
fn default_alpha() -> f64 {
    0.05
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_total_visitors: default_min_total_visitors(),
            significance_threshold_pct: default_significance_threshold_pct(),
            trending_threshold_pct: default_trending_threshold_pct(),
            minimum_detectable_effect: default_minimum_detectable_effect(),
            power: default_power(),
            alpha: default_alpha(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }
        if !(self.power > 0.0 && self.power < 1.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "power must be in (0, 1), got {}",
                self.power
            )));
        }
        if !self.minimum_detectable_effect.is_finite() || self.minimum_detectable_effect == 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "minimum detectable effect must be a non-zero finite ratio, got {}",
                self.minimum_detectable_effect
            )));
        }
        if !self.significance_threshold_pct.is_finite() || !self.trending_threshold_pct.is_finite()
        {
            return Err(AnalysisError::InvalidInput(
                "confidence thresholds must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_total_visitors, 100);
        assert_eq!(config.significance_threshold_pct, 95.0);
    }

    #[test]
    fn test_out_of_range_alpha_rejected() {
        let config = AnalysisConfig {
            alpha: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = AnalysisConfig {
            alpha: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_effect_size_rejected() {
        let config = AnalysisConfig {
            minimum_detectable_effect: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let config: AnalysisConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }
}
