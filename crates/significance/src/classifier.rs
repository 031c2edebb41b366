//! Decision classification: combines the z-test verdict with the
//! sample-size plan into the record the caller persists.

use chrono::{DateTime, Utc};
use tracing::info;

use convertlab_core::config::AnalysisConfig;
use convertlab_core::error::AnalysisResult;
use convertlab_core::types::{
    Decision, DecisionStatus, ExperimentInput, SampleSizePlan, SignificanceResult,
};

use crate::{planner, significance};

/// Analyze one experiment snapshot into a fresh `Decision`.
///
/// `now` is supplied by the caller so identical inputs always produce
/// identical decisions; it drives traffic-velocity estimation and the
/// `evaluated_at` stamp, never statistical validity.
pub fn analyze(
    input: &ExperimentInput,
    config: &AnalysisConfig,
    now: DateTime<Utc>,
) -> AnalysisResult<Decision> {
    config.validate()?;

    let significance = significance::compute(&input.control, &input.treatment)?;

    let total_visitors = input.control.visitors + input.treatment.visitors;
    let plan = build_plan(input, config, total_visitors, now);

    let (status, recommendation) =
        classify(&significance, plan.as_ref(), total_visitors, config);

    info!(
        experiment_id = %input.experiment_id,
        status = ?status,
        confidence_pct = significance.confidence_pct,
        "Experiment analyzed"
    );

    Ok(Decision {
        experiment_id: input.experiment_id,
        status,
        recommendation,
        significance,
        plan,
        evaluated_at: now,
    })
}

/// Sample-size planning off the observed control baseline. A zero baseline
/// makes the plan undefined; that surfaces as `None` so the significance
/// verdict is still returned.
fn build_plan(
    input: &ExperimentInput,
    config: &AnalysisConfig,
    total_visitors: u64,
    now: DateTime<Utc>,
) -> Option<SampleSizePlan> {
    let required_per_variant = planner::required_sample_size(
        input.control.conversion_rate(),
        config.minimum_detectable_effect,
        config.power,
        config.alpha,
    )
    .ok()?;

    let days = planner::days_since_start(input.started_at, now);
    Some(SampleSizePlan {
        required_per_variant,
        estimated_days_remaining: planner::estimate_days_remaining(
            total_visitors,
            required_per_variant,
            days,
        ),
    })
}

/// Transition rules in strict order; first match wins. `running` and
/// `not_significant` are not sticky: the next snapshot is classified from
/// scratch.
fn classify(
    significance: &SignificanceResult,
    plan: Option<&SampleSizePlan>,
    total_visitors: u64,
    config: &AnalysisConfig,
) -> (DecisionStatus, String) {
    if total_visitors < config.min_total_visitors {
        let recommendation = match plan {
            Some(plan) => format!(
                "Need more data. Currently {} visitors, recommend at least {}.",
                total_visitors,
                plan.required_per_variant.saturating_mul(2)
            ),
            None => format!(
                "Need more data. Currently {} visitors; a sample-size target needs control conversions first.",
                total_visitors
            ),
        };
        return (DecisionStatus::NeedsData, recommendation);
    }

    if significance.confidence_pct >= config.significance_threshold_pct {
        let recommendation = match significance.lift_pct {
            Some(lift) if lift > 0.0 => format!(
                "WINNER: treatment with {:.1}% lift at {:.1}% confidence. Implement treatment.",
                lift, significance.confidence_pct
            ),
            Some(lift) => format!(
                "WINNER: control. Treatment performed {:.1}% worse. Keep control.",
                lift.abs()
            ),
            // Lift is undefined off a zero control baseline, but the
            // z-score can only be positive there: treatment leads.
            None => format!(
                "WINNER: treatment at {:.1}% confidence. Control recorded no conversions. Implement treatment.",
                significance.confidence_pct
            ),
        };
        return (DecisionStatus::Significant, recommendation);
    }

    if significance.confidence_pct >= config.trending_threshold_pct {
        let direction = if significance.z_score > 0.0 {
            "positive"
        } else {
            "negative"
        };
        let recommendation = match plan.and_then(|p| p.estimated_days_remaining) {
            Some(days) => format!(
                "Trending {} ({:.1}% confidence). Continue test for {} more days.",
                direction, significance.confidence_pct, days
            ),
            None => format!(
                "Trending {} ({:.1}% confidence). Continue the test to reach significance.",
                direction, significance.confidence_pct
            ),
        };
        return (DecisionStatus::Running, recommendation);
    }

    (
        DecisionStatus::NotSignificant,
        "No significant difference detected. Continue test or increase traffic.".to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use convertlab_core::types::VariantStats;
    use uuid::Uuid;

    fn variant(visitors: u64, conversions: u64) -> VariantStats {
        VariantStats {
            visitors,
            conversions,
            revenue: 0.0,
        }
    }

    fn experiment(control: VariantStats, treatment: VariantStats) -> (ExperimentInput, DateTime<Utc>) {
        let now = Utc::now();
        let input = ExperimentInput {
            experiment_id: Uuid::new_v4(),
            control,
            treatment,
            started_at: now - Duration::days(14),
        };
        (input, now)
    }

    #[test]
    fn test_significant_winner() {
        let (input, now) = experiment(variant(1000, 100), variant(1000, 130));
        let decision = analyze(&input, &AnalysisConfig::default(), now).unwrap();

        assert_eq!(decision.status, DecisionStatus::Significant);
        assert!(decision.recommendation.starts_with("WINNER: treatment"));
        assert!(decision.recommendation.contains("30.0% lift"));
        assert!(decision.plan.is_some());
        assert_eq!(decision.evaluated_at, now);
        assert_eq!(decision.experiment_id, input.experiment_id);
    }

    #[test]
    fn test_significant_degradation_keeps_control() {
        let (input, now) = experiment(variant(1000, 130), variant(1000, 100));
        let decision = analyze(&input, &AnalysisConfig::default(), now).unwrap();

        assert_eq!(decision.status, DecisionStatus::Significant);
        assert!(decision.recommendation.starts_with("WINNER: control"));
        assert!(decision.recommendation.contains("worse"));
    }

    #[test]
    fn test_needs_data_overrides_confidence() {
        // 60 total visitors stays below the floor no matter the split.
        let (input, now) = experiment(variant(30, 3), variant(30, 5));
        let decision = analyze(&input, &AnalysisConfig::default(), now).unwrap();

        assert_eq!(decision.status, DecisionStatus::NeedsData);
        assert!(decision.recommendation.starts_with("Need more data"));
        let required = decision.plan.unwrap().required_per_variant;
        assert!(decision
            .recommendation
            .contains(&(required * 2).to_string()));
    }

    #[test]
    fn test_trending_reports_direction_and_days() {
        // z ≈ 1.43 puts confidence near 84.7%: trending, not significant.
        let (input, now) = experiment(variant(1000, 100), variant(1000, 120));
        let decision = analyze(&input, &AnalysisConfig::default(), now).unwrap();

        assert_eq!(decision.status, DecisionStatus::Running);
        assert!(decision.significance.confidence_pct < 95.0);
        assert!(decision.recommendation.contains("Trending positive"));
        assert!(decision.recommendation.contains("more days"));
    }

    #[test]
    fn test_small_difference_is_not_significant() {
        let (input, now) = experiment(variant(1000, 100), variant(1000, 105));
        let decision = analyze(&input, &AnalysisConfig::default(), now).unwrap();

        assert_eq!(decision.status, DecisionStatus::NotSignificant);
        assert!(decision
            .recommendation
            .contains("No significant difference"));
    }

    #[test]
    fn test_below_threshold_never_classifies_significant() {
        let (input, now) = experiment(variant(1000, 100), variant(1000, 120));
        let significance =
            significance::compute(&input.control, &input.treatment).unwrap();
        assert!(significance.confidence_pct < 95.0);

        let decision = analyze(&input, &AnalysisConfig::default(), now).unwrap();
        assert_ne!(decision.status, DecisionStatus::Significant);
    }

    #[test]
    fn test_zero_baseline_keeps_verdict_and_drops_plan() {
        let (input, now) = experiment(variant(500, 0), variant(500, 20));
        let decision = analyze(&input, &AnalysisConfig::default(), now).unwrap();

        assert_eq!(decision.status, DecisionStatus::Significant);
        assert_eq!(decision.plan, None);
        assert_eq!(decision.significance.lift_pct, None);
        assert!(decision.recommendation.starts_with("WINNER: treatment"));
        assert!(decision.recommendation.contains("no conversions"));
    }

    #[test]
    fn test_identical_inputs_give_identical_decisions() {
        let (input, now) = experiment(variant(1000, 100), variant(1000, 130));
        let config = AnalysisConfig::default();

        let first = analyze(&input, &config, now).unwrap();
        let second = analyze(&input, &config, now).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_visitor_floor_is_configurable() {
        let config = AnalysisConfig {
            min_total_visitors: 10,
            ..Default::default()
        };
        let (input, now) = experiment(variant(30, 3), variant(30, 5));
        let decision = analyze(&input, &config, now).unwrap();
        assert_ne!(decision.status, DecisionStatus::NeedsData);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = AnalysisConfig {
            alpha: 0.0,
            ..Default::default()
        };
        let (input, now) = experiment(variant(1000, 100), variant(1000, 130));
        assert!(analyze(&input, &config, now).is_err());
    }
}
