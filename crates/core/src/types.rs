//! Core experiment analysis types shared across the workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AnalysisError, AnalysisResult};

// ─── Inputs ─────────────────────────────────────────────────────────────

/// Raw counters for one experiment arm, as accumulated by the tracking
/// layer. Rates are derived on demand rather than stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VariantStats {
    pub visitors: u64,
    pub conversions: u64,
    pub revenue: f64,
}

impl VariantStats {
    pub fn new(visitors: u64, conversions: u64, revenue: f64) -> AnalysisResult<Self> {
        let stats = Self {
            visitors,
            conversions,
            revenue,
        };
        stats.validate()?;
        Ok(stats)
    }

    /// Contract checks: conversions cannot exceed visitors, revenue must be
    /// a non-negative finite amount.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.conversions > self.visitors {
            return Err(AnalysisError::InvalidInput(format!(
                "conversions ({}) exceed visitors ({})",
                self.conversions, self.visitors
            )));
        }
        if !self.revenue.is_finite() || self.revenue < 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "revenue must be non-negative and finite, got {}",
                self.revenue
            )));
        }
        Ok(())
    }

    /// Fraction of visitors that converted. 0.0 before any traffic arrives.
    pub fn conversion_rate(&self) -> f64 {
        if self.visitors == 0 {
            0.0
        } else {
            self.conversions as f64 / self.visitors as f64
        }
    }

    pub fn revenue_per_visitor(&self) -> f64 {
        if self.visitors == 0 {
            0.0
        } else {
            self.revenue / self.visitors as f64
        }
    }
}

/// Everything the engine needs to analyze one two-arm experiment. Roles are
/// fixed: the engine never infers which arm is control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentInput {
    pub experiment_id: Uuid,
    pub control: VariantStats,
    pub treatment: VariantStats,
    /// Used only for traffic-velocity estimation, never for statistical
    /// validity.
    pub started_at: DateTime<Utc>,
}

// ─── Results ────────────────────────────────────────────────────────────

/// Outcome of the two-proportion z-test. A positive z-score means the
/// treatment arm converts better than control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignificanceResult {
    pub z_score: f64,
    pub p_value: f64,
    pub confidence_pct: f64,
    /// Relative conversion-rate change of treatment vs. control, in percent.
    /// `None` when the control rate is 0 and the ratio is undefined.
    pub lift_pct: Option<f64>,
}

/// Fixed-horizon sample-size plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSizePlan {
    pub required_per_variant: u64,
    /// `None` when no traffic has arrived yet, so daily velocity is unknown.
    pub estimated_days_remaining: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    NeedsData,
    Running,
    Significant,
    NotSignificant,
}

/// The record persisted per analysis pass. Immutable once produced; a later
/// pass with fresher counts replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub experiment_id: Uuid,
    pub status: DecisionStatus,
    /// Complete human-readable sentence; needs no further templating.
    pub recommendation: String,
    pub significance: SignificanceResult,
    /// `None` when the control arm has no conversions yet: a zero baseline
    /// makes sample-size planning undefined.
    pub plan: Option<SampleSizePlan>,
    pub evaluated_at: DateTime<Utc>,
}
