//! Comparative adjustment: small bounded deltas that need the whole field.

use serde::Serialize;
use tracing::warn;

use super::config::AdjustmentConfig;
use crate::error::AnalysisError;
use crate::scoring::ScoredEntrant;

/// Raw-score range of the field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldStats {
    pub size: usize,
    pub min_raw: f64,
    pub max_raw: f64,
}

impl FieldStats {
    pub fn from_field(field: &[ScoredEntrant]) -> Self {
        let (min_raw, max_raw) = field
            .iter()
            .map(|e| e.raw_score)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| (lo.min(s), hi.max(s)));
        if field.is_empty() {
            return Self {
                size: 0,
                min_raw: 0.0,
                max_raw: 0.0,
            };
        }
        Self {
            size: field.len(),
            min_raw,
            max_raw,
        }
    }

    /// Where `raw` sits between the field's worst (0) and best (1) raw scores
    pub fn relative_position(&self, raw: f64) -> f64 {
        let range = self.max_raw - self.min_raw;
        if range <= 0.0 {
            0.5
        } else {
            ((raw - self.min_raw) / range).clamp(0.0, 1.0)
        }
    }
}

/// Why a delta was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    Consistent,
    Inconsistent,
    StrongMomentum,
    WeakMomentum,
    EliteJockeyInCompetitiveField,
    SparseRecord,
}

impl AdjustmentReason {
    pub fn label(self) -> &'static str {
        match self {
            AdjustmentReason::Consistent => "consistent",
            AdjustmentReason::Inconsistent => "inconsistent",
            AdjustmentReason::StrongMomentum => "strong momentum",
            AdjustmentReason::WeakMomentum => "weak momentum",
            AdjustmentReason::EliteJockeyInCompetitiveField => "elite jockey",
            AdjustmentReason::SparseRecord => "sparse record",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Adjustment {
    pub delta: f64,
    pub relative_position: f64,
    pub reasons: Vec<(AdjustmentReason, f64)>,
}

impl Adjustment {
    fn neutral(relative_position: f64) -> Self {
        Self {
            delta: 0.0,
            relative_position,
            reasons: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComparativeAdjuster {
    config: AdjustmentConfig,
}

impl ComparativeAdjuster {
    pub fn new(config: AdjustmentConfig) -> Self {
        Self { config }
    }

    /// One adjustment per entrant, in field order.
    ///
    /// A field of one has nothing to compare against: every delta is zero.
    pub fn adjust(&self, field: &[ScoredEntrant]) -> Vec<Adjustment> {
        let stats = FieldStats::from_field(field);
        field
            .iter()
            .map(|entrant| {
                let position = stats.relative_position(entrant.raw_score);
                if stats.size <= 1 {
                    return Adjustment::neutral(position);
                }
                match self.adjustment_for(entrant, &stats) {
                    Ok(adjustment) => adjustment,
                    Err(e) => {
                        warn!("{}; keeping unadjusted score", e);
                        Adjustment::neutral(position)
                    }
                }
            })
            .collect()
    }

    fn adjustment_for(
        &self,
        entrant: &ScoredEntrant,
        stats: &FieldStats,
    ) -> Result<Adjustment, AnalysisError> {
        let cfg = &self.config;
        let form = &entrant.features.form;
        let mut reasons = Vec::new();

        if form.consistency_index > cfg.consistency_high {
            reasons.push((AdjustmentReason::Consistent, cfg.consistency_delta));
        } else if form.consistency_index < cfg.consistency_low {
            reasons.push((AdjustmentReason::Inconsistent, -cfg.consistency_delta));
        }

        if form.momentum_index > cfg.momentum_high {
            reasons.push((AdjustmentReason::StrongMomentum, cfg.momentum_delta));
        } else if form.momentum_index < cfg.momentum_low {
            reasons.push((AdjustmentReason::WeakMomentum, -cfg.momentum_delta));
        }

        if entrant.components.jockey >= cfg.elite_jockey_score
            && stats.size > cfg.competitive_field_size
        {
            reasons.push((
                AdjustmentReason::EliteJockeyInCompetitiveField,
                cfg.elite_jockey_delta,
            ));
        }

        if entrant.features.missing_core >= cfg.missing_core_threshold
            && stats.size > cfg.min_field_size
        {
            reasons.push((AdjustmentReason::SparseRecord, -cfg.sparse_record_delta));
        }

        let delta: f64 = reasons.iter().map(|(_, d)| d).sum();
        if !delta.is_finite() {
            return Err(AnalysisError::NonFiniteScore {
                name: entrant.entrant.name.clone(),
                component: "Adjustment".to_string(),
            });
        }

        Ok(Adjustment {
            delta,
            relative_position: stats.relative_position(entrant.raw_score),
            reasons,
        })
    }
}
