//! The full pipeline: reconcile, score, adjust, rank, classify, summarise.

use serde::Serialize;
use tracing::{info, warn};

use super::adjust::{Adjustment, ComparativeAdjuster};
use super::config::{RankingConfig, DEFAULT_FAVOURITE_MAX_ODDS};
use super::recommend::{MarketCategory, Recommendation};
use super::summary::RaceSummary;
use super::tiers::{percentile, Tier, TierThresholds};
use crate::error::AnalysisError;
use crate::race::{reconcile, Entrant, RaceCard};
use crate::scoring::{
    ComponentScores, EntrantFeatures, FactorContribution, ScoredEntrant, ScoringConfig,
    ScoringEngine,
};

/// One entrant with its place in the field. Never mutated once built.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntrant {
    pub entrant: Entrant,
    /// 1-based order in the reconciled input
    pub position: usize,
    pub features: EntrantFeatures,
    pub components: ComponentScores,
    pub breakdown: Vec<FactorContribution>,
    pub raw_score: f64,
    pub total_score: f64,
    pub adjustment: Adjustment,
    pub adjusted_score: f64,
    pub rank: usize,
    pub percentile: f64,
    pub tier: Tier,
    pub recommendation: Recommendation,
    pub category: MarketCategory,
    pub missing_data_override: bool,
}

impl RankedEntrant {
    pub fn name(&self) -> &str {
        &self.entrant.name
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RaceAnalysis {
    pub title: Option<String>,
    pub going: Option<String>,
    /// Best first
    pub entrants: Vec<RankedEntrant>,
    pub summary: RaceSummary,
    /// Entrants that could not be scored
    pub dropped: Vec<String>,
}

/// Runs one analysis per call; holds configuration only, so one analyzer
/// can serve any number of races, from any number of threads.
#[derive(Debug, Clone)]
pub struct RaceAnalyzer {
    engine: ScoringEngine,
    adjuster: ComparativeAdjuster,
    favourite_max_odds: f64,
}

impl RaceAnalyzer {
    pub fn new(scoring: &ScoringConfig, ranking: &RankingConfig) -> anyhow::Result<Self> {
        Ok(Self {
            engine: ScoringEngine::new(scoring)?,
            adjuster: ComparativeAdjuster::new(ranking.adjustment.unwrap_or_default()),
            favourite_max_odds: ranking
                .favourite_max_odds
                .unwrap_or(DEFAULT_FAVOURITE_MAX_ODDS),
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            engine: ScoringEngine::default(),
            adjuster: ComparativeAdjuster::default(),
            favourite_max_odds: DEFAULT_FAVOURITE_MAX_ODDS,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn analyze_card(&self, card: RaceCard) -> Result<RaceAnalysis, AnalysisError> {
        let mut analysis = self.analyze(card.entrants)?;
        analysis.title = card.title;
        analysis.going = card.going;
        Ok(analysis)
    }

    pub fn analyze(&self, entrants: Vec<Entrant>) -> Result<RaceAnalysis, AnalysisError> {
        let field = reconcile(entrants);

        let mut scored = Vec::with_capacity(field.len());
        let mut dropped = Vec::new();
        for (i, entrant) in field.iter().enumerate() {
            match self.engine.evaluate(entrant, i + 1) {
                Ok(s) => scored.push(s),
                Err(e) => {
                    warn!("Dropping entrant: {}", e);
                    dropped.push(entrant.name.clone());
                }
            }
        }

        if scored.is_empty() {
            return Err(AnalysisError::NoValidEntrants);
        }

        let adjustments = self.adjuster.adjust(&scored);
        let mut ranked: Vec<(ScoredEntrant, Adjustment, f64, usize)> = scored
            .into_iter()
            .zip(adjustments)
            .map(|(s, adjustment)| {
                let adjusted = s.raw_score + adjustment.delta;
                let position = s.features.position;
                if adjusted.is_finite() {
                    (s, adjustment, adjusted, position)
                } else {
                    warn!("{}: adjusted score is not finite, using raw score", s.entrant.name);
                    let raw = s.raw_score;
                    (s, adjustment, raw, position)
                }
            })
            .collect();

        // Stable: equal scores keep input order
        ranked.sort_by(|a, b| b.2.total_cmp(&a.2));

        let scores: Vec<f64> = ranked.iter().map(|r| r.2).collect();
        let thresholds = TierThresholds::from_scores(&scores);
        let field_size = ranked.len();

        let entrants: Vec<RankedEntrant> = ranked
            .into_iter()
            .enumerate()
            .map(|(i, (s, adjustment, adjusted_score, position))| {
                let rank = i + 1;
                RankedEntrant {
                    recommendation: Recommendation::new(
                        s.raw_score,
                        s.features.form.momentum_index,
                    ),
                    category: MarketCategory::classify(
                        s.raw_score,
                        s.features.decimal_odds,
                        self.favourite_max_odds,
                    ),
                    entrant: s.entrant,
                    position,
                    features: s.features,
                    components: s.components,
                    breakdown: s.breakdown,
                    raw_score: s.raw_score,
                    total_score: s.total_score,
                    adjustment,
                    adjusted_score,
                    rank,
                    percentile: percentile(rank, field_size),
                    tier: thresholds.classify(adjusted_score),
                    missing_data_override: s.missing_data_override,
                }
            })
            .collect();

        let summary = RaceSummary::from_ranked(&entrants);
        let top: Vec<String> = entrants
            .iter()
            .take(3)
            .map(|e| format!("{} ({:.2})", e.name(), e.adjusted_score))
            .collect();
        info!(
            "Ranked {} entrants ({}): {}",
            entrants.len(),
            summary.competitiveness,
            top.join(", ")
        );

        Ok(RaceAnalysis {
            title: None,
            going: None,
            entrants,
            summary,
            dropped,
        })
    }
}
