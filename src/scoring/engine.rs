use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use super::components::{
    age_score, clamp_score, context_score, draw_score, form_score, jockey_score, momentum_score,
    odds_score, rating_score, trainer_score, value_score, weight_score, ComponentScores, Factor,
    Roster,
};
use super::config::{
    BandEntry, BandsConfig, FactorWeights, RosterConfig, ScoringConfig, DEFAULT_MISSING_DATA_THRESHOLD,
    DEFAULT_RATING_DIVISOR,
};
use super::factors::Band;
use super::features::{EntrantFeatures, MissingDataPolicy};
use crate::error::AnalysisError;
use crate::race::Entrant;

/// One line of the score breakdown
#[derive(Debug, Clone, Serialize)]
pub struct FactorContribution {
    pub factor: Factor,
    pub score: f64,  // Component score, 0-10
    pub weight: f64, // Share of the raw score
    pub contribution: f64,
}

/// An entrant after per-entrant scoring, before any field-relative adjustment.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredEntrant {
    pub entrant: Entrant,
    pub features: EntrantFeatures,
    pub components: ComponentScores,
    /// Weighted sum of the components, 0-10
    pub raw_score: f64,
    /// `raw_score` on a 0-100 display scale, one decimal
    pub total_score: f64,
    pub breakdown: Vec<FactorContribution>,
    /// The sparse-record fallback replaced rating, form and jockey
    pub missing_data_override: bool,
}

/// Parsed threshold tables for the banded factors.
#[derive(Debug, Clone, PartialEq)]
pub struct BandTables {
    pub odds: Vec<Band>,
    pub weight: Vec<Band>,
    pub draw: Vec<Band>,
    pub age: Vec<Band>,
}

impl BandTables {
    /// Tables left out of the config keep their built-in rows
    pub fn from_config(config: Option<&BandsConfig>) -> Result<Self> {
        let defaults = BandsConfig::default();
        let pick = |name: &str,
                    configured: Option<&Vec<BandEntry>>,
                    fallback: &Option<Vec<BandEntry>>|
         -> Result<Vec<Band>> {
            let rows = configured.or(fallback.as_ref()).map(Vec::as_slice).unwrap_or(&[]);
            parse_bands(rows).with_context(|| format!("Invalid {} bands", name))
        };

        Ok(Self {
            odds: pick("odds", config.and_then(|c| c.odds.as_ref()), &defaults.odds)?,
            weight: pick("weight", config.and_then(|c| c.weight.as_ref()), &defaults.weight)?,
            draw: pick("draw", config.and_then(|c| c.draw.as_ref()), &defaults.draw)?,
            age: pick("age", config.and_then(|c| c.age.as_ref()), &defaults.age)?,
        })
    }
}

impl Default for BandTables {
    fn default() -> Self {
        // Built-in rows are static and known to parse
        Self::from_config(None).unwrap_or(Self {
            odds: Vec::new(),
            weight: Vec::new(),
            draw: Vec::new(),
            age: Vec::new(),
        })
    }
}

pub fn parse_bands(entries: &[BandEntry]) -> Result<Vec<Band>> {
    entries
        .iter()
        .map(|entry| {
            Band::parse(&entry.range, entry.score)
                .with_context(|| format!("range '{}'", entry.range))
        })
        .collect()
}

/// Per-entrant scorer: features, eleven components, weighted aggregate.
///
/// Built once per analysis from the scoring config; holds no per-entrant state.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: FactorWeights,
    jockeys: Roster,
    trainers: Roster,
    bands: BandTables,
    rating_divisor: f64,
    missing_data: MissingDataPolicy,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::with_bands(&ScoringConfig::default(), BandTables::default())
    }
}

impl ScoringEngine {
    pub fn new(config: &ScoringConfig) -> Result<Self> {
        let bands = BandTables::from_config(config.bands.as_ref())?;
        Ok(Self::with_bands(config, bands))
    }

    fn with_bands(config: &ScoringConfig, bands: BandTables) -> Self {
        let roster_defaults = RosterConfig::default();
        let rosters = config.rosters.as_ref();
        let jockeys = rosters
            .and_then(|r| r.jockeys.as_ref())
            .or(roster_defaults.jockeys.as_ref());
        let trainers = rosters
            .and_then(|r| r.trainers.as_ref())
            .or(roster_defaults.trainers.as_ref());

        Self {
            weights: config.weights.unwrap_or_default(),
            jockeys: Roster::new(jockeys.into_iter().flatten()),
            trainers: Roster::new(trainers.into_iter().flatten()),
            bands,
            rating_divisor: config.rating_divisor.unwrap_or(DEFAULT_RATING_DIVISOR),
            missing_data: MissingDataPolicy {
                threshold: config
                    .missing_data_threshold
                    .unwrap_or(DEFAULT_MISSING_DATA_THRESHOLD),
            },
        }
    }

    pub fn weights(&self) -> &FactorWeights {
        &self.weights
    }

    /// The eleven component scores, without the missing-data fallback.
    pub fn score_components(&self, entrant: &Entrant, features: &EntrantFeatures) -> ComponentScores {
        let rating = rating_score(features.rating, self.rating_divisor);
        ComponentScores {
            rating,
            form: form_score(&features.form),
            weight: weight_score(features.weight_lbs, &self.bands.weight),
            jockey: jockey_score(
                entrant.jockey_name(),
                entrant.jockey_stats.as_ref(),
                &self.jockeys,
            ),
            trainer: trainer_score(
                entrant.trainer_name(),
                entrant.trainer_stats.as_ref(),
                &self.trainers,
            ),
            age: age_score(features.age, &self.bands.age),
            draw: draw_score(Some(features.draw), &self.bands.draw),
            odds: odds_score(features.decimal_odds, &self.bands.odds),
            momentum: momentum_score(&features.form),
            context: context_score(features),
            value: value_score(features.decimal_odds, rating),
        }
    }

    /// Score one entrant. `position` is its 1-based place in the field.
    pub fn evaluate(&self, entrant: &Entrant, position: usize) -> Result<ScoredEntrant, AnalysisError> {
        let features = EntrantFeatures::extract(entrant, position);
        let mut components = self.score_components(entrant, &features);

        let override_score = self
            .missing_data
            .neutral_band(features.missing_primary, position);
        if let Some(score) = override_score {
            debug!(
                "{}: {} primary fields missing, using positional score {:.1}",
                entrant.name, features.missing_primary, score
            );
            components.rating = score;
            components.form = score;
            components.jockey = score;
        }

        if let Some(factor) = components.first_non_finite() {
            return Err(AnalysisError::NonFiniteScore {
                name: entrant.name.clone(),
                component: factor.label().to_string(),
            });
        }

        let raw_score = aggregate(&components, &self.weights);
        if !raw_score.is_finite() {
            return Err(AnalysisError::NonFiniteScore {
                name: entrant.name.clone(),
                component: "Raw".to_string(),
            });
        }

        let breakdown = components
            .iter()
            .map(|(factor, score)| {
                let weight = self.weights.get(factor);
                FactorContribution {
                    factor,
                    score,
                    weight,
                    contribution: score * weight,
                }
            })
            .collect();

        Ok(ScoredEntrant {
            entrant: entrant.clone(),
            features,
            components,
            raw_score,
            total_score: display_score(raw_score),
            breakdown,
            missing_data_override: override_score.is_some(),
        })
    }
}

/// Weighted sum of the component scores, clamped to [0, 10].
pub fn aggregate(components: &ComponentScores, weights: &FactorWeights) -> f64 {
    let raw: f64 = components
        .iter()
        .map(|(factor, score)| score * weights.get(factor))
        .sum();
    clamp_score(raw)
}

/// Raw score on the 0-100 display scale, rounded to one decimal
pub fn display_score(raw_score: f64) -> f64 {
    (raw_score * 100.0).round() / 10.0
}
