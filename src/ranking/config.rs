use serde::{Deserialize, Serialize};

/// Field-level ranking configuration.
///
/// Example YAML:
/// ```yaml
/// ranking:
///   favourite_max_odds: 5.0
///   adjustment:
///     competitive_field_size: 10
///     consistency_delta: 0.3
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RankingConfig {
    /// Field-relative deltas applied after aggregation
    #[serde(default)]
    pub adjustment: Option<AdjustmentConfig>,

    /// Longest decimal price that still counts as a favourite (default: 4.0, i.e. 3/1)
    #[serde(default)]
    pub favourite_max_odds: Option<f64>,
}

pub const DEFAULT_FAVOURITE_MAX_ODDS: f64 = 4.0;

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            adjustment: Some(AdjustmentConfig::default()),
            favourite_max_odds: Some(DEFAULT_FAVOURITE_MAX_ODDS),
        }
    }
}

/// Thresholds and deltas of the comparative adjustment.
///
/// Consistency and momentum thresholds are on the 0-100 form indices.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AdjustmentConfig {
    pub consistency_high: f64,
    pub consistency_low: f64,
    pub consistency_delta: f64,

    pub momentum_high: f64,
    pub momentum_low: f64,
    pub momentum_delta: f64,

    /// Jockey component score that counts as elite
    pub elite_jockey_score: f64,
    /// The elite jockey bonus only applies in fields larger than this
    pub competitive_field_size: usize,
    pub elite_jockey_delta: f64,

    /// Missing core fields (rating, form, weight, age) that trigger the penalty
    pub missing_core_threshold: usize,
    /// The sparse-record penalty only applies in fields larger than this
    pub min_field_size: usize,
    pub sparse_record_delta: f64,
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            consistency_high: 70.0,
            consistency_low: 30.0,
            consistency_delta: 0.2,
            momentum_high: 70.0,
            momentum_low: 30.0,
            momentum_delta: 0.15,
            elite_jockey_score: 8.0,
            competitive_field_size: 8,
            elite_jockey_delta: 0.1,
            missing_core_threshold: 2,
            min_field_size: 5,
            sparse_record_delta: 0.1,
        }
    }
}

/// Largest delta any single rule may apply
const MAX_DELTA: f64 = 1.0;

/// Validate ranking configuration, collecting every problem.
pub fn validate_ranking(config: &RankingConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(odds) = config.favourite_max_odds {
        if !odds.is_finite() || odds < 1.0 {
            errors.push(format!(
                "ranking.favourite_max_odds: must be at least 1.0, got {}",
                odds
            ));
        }
    }

    if let Some(ref adj) = config.adjustment {
        let bands = [
            ("consistency", adj.consistency_low, adj.consistency_high),
            ("momentum", adj.momentum_low, adj.momentum_high),
        ];
        for (name, low, high) in bands {
            if !(0.0..=100.0).contains(&low) || !(0.0..=100.0).contains(&high) {
                errors.push(format!(
                    "ranking.adjustment.{}_low/high: must be between 0 and 100",
                    name
                ));
            } else if low >= high {
                errors.push(format!(
                    "ranking.adjustment.{}_low: must be below {}_high ({} >= {})",
                    name, name, low, high
                ));
            }
        }

        let deltas = [
            ("consistency_delta", adj.consistency_delta),
            ("momentum_delta", adj.momentum_delta),
            ("elite_jockey_delta", adj.elite_jockey_delta),
            ("sparse_record_delta", adj.sparse_record_delta),
        ];
        for (name, delta) in deltas {
            if !(0.0..=MAX_DELTA).contains(&delta) {
                errors.push(format!(
                    "ranking.adjustment.{}: must be between 0 and {}, got {}",
                    name, MAX_DELTA, delta
                ));
            }
        }

        if !(0.0..=10.0).contains(&adj.elite_jockey_score) {
            errors.push("ranking.adjustment.elite_jockey_score: must be between 0 and 10".to_string());
        }
        if adj.missing_core_threshold == 0 || adj.missing_core_threshold > 4 {
            errors.push("ranking.adjustment.missing_core_threshold: must be between 1 and 4".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
