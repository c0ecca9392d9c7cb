use serde::{Deserialize, Serialize};

use crate::ranking::{validate_ranking, RankingConfig};
use crate::scoring::{validate_scoring, ScoringConfig};

/// Top-level config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
    #[serde(default)]
    pub ranking: Option<RankingConfig>,
}

impl Config {
    /// Scoring config in effect: the file's, or the built-in defaults
    pub fn effective_scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn effective_ranking(&self) -> RankingConfig {
        self.ranking.clone().unwrap_or_default()
    }

    /// Every section filled in, for display
    pub fn effective(&self) -> Self {
        Self {
            scoring: Some(self.effective_scoring()),
            ranking: Some(self.effective_ranking()),
        }
    }
}

/// Validate the whole config, collecting every problem.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    if let Some(ref scoring) = config.scoring {
        if let Err(e) = validate_scoring(scoring) {
            errors.extend(e);
        }
    }
    if let Some(ref ranking) = config.ranking {
        if let Err(e) = validate_ranking(ranking) {
            errors.extend(e);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
