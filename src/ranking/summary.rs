use serde::Serialize;
use std::fmt;

use super::analysis::RankedEntrant;
use super::recommend::MarketCategory;
use super::tiers::Tier;

/// Leaders/trailers are this far from the field mean
const STANDOUT_MARGIN: f64 = 1.0;
/// Names listed per favourites/outsiders group
const STANDOUT_LIMIT: usize = 3;
const UNKNOWN_JOCKEY: &str = "N/A";

/// How tightly bunched the field is, from the top-to-bottom spread of adjusted scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Competitiveness {
    HighlyCompetitive,
    Competitive,
    Moderate,
    Uneven,
}

impl Competitiveness {
    pub fn from_spread(spread: f64) -> Self {
        if spread <= 2.0 {
            Competitiveness::HighlyCompetitive
        } else if spread <= 4.0 {
            Competitiveness::Competitive
        } else if spread <= 6.0 {
            Competitiveness::Moderate
        } else {
            Competitiveness::Uneven
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Competitiveness::HighlyCompetitive => "Highly competitive",
            Competitiveness::Competitive => "Competitive",
            Competitiveness::Moderate => "Moderately competitive",
            Competitiveness::Uneven => "Uneven",
        }
    }
}

impl fmt::Display for Competitiveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierDistribution {
    pub elite: usize,
    pub good: usize,
    pub average: usize,
    pub weak: usize,
}

impl TierDistribution {
    pub fn count(&self, tier: Tier) -> usize {
        match tier {
            Tier::Elite => self.elite,
            Tier::Good => self.good,
            Tier::Average => self.average,
            Tier::Weak => self.weak,
        }
    }

    fn add(&mut self, tier: Tier) {
        match tier {
            Tier::Elite => self.elite += 1,
            Tier::Good => self.good += 1,
            Tier::Average => self.average += 1,
            Tier::Weak => self.weak += 1,
        }
    }
}

/// Leader of the field on one measure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standout {
    /// Horse name, or the jockey's name for the best-jockey standout
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceSummary {
    pub field_size: usize,
    pub mean_score: f64,
    pub max_score: f64,
    pub min_score: f64,
    pub spread: f64,
    pub competitiveness: Competitiveness,
    pub tiers: TierDistribution,
    /// Rank 1
    pub principal_pick: Option<String>,
    /// Adjusted score at least one point above the mean, best first
    pub favourites: Vec<String>,
    /// Adjusted score at least one point below the mean, weakest last
    pub outsiders: Vec<String>,
    pub best_jockey: Option<Standout>,
    pub best_form: Option<Standout>,
    pub highest_momentum: Option<Standout>,
    pub dark_horses: Vec<String>,
    pub value_bets: Vec<String>,
    pub strategy: String,
}

impl RaceSummary {
    /// Summarise a ranked field (best first).
    pub fn from_ranked(ranked: &[RankedEntrant]) -> Self {
        let scores: Vec<f64> = ranked.iter().map(|e| e.adjusted_score).collect();
        let (mean_score, max_score, min_score) = if scores.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                scores.iter().sum::<f64>() / scores.len() as f64,
                scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                scores.iter().copied().fold(f64::INFINITY, f64::min),
            )
        };
        let spread = max_score - min_score;

        let mut tiers = TierDistribution::default();
        for entrant in ranked {
            tiers.add(entrant.tier);
        }

        let favourites = ranked
            .iter()
            .filter(|e| e.adjusted_score >= mean_score + STANDOUT_MARGIN)
            .take(STANDOUT_LIMIT)
            .map(|e| e.name().to_string())
            .collect();

        let mut outsiders: Vec<String> = ranked
            .iter()
            .rev()
            .filter(|e| e.adjusted_score <= mean_score - STANDOUT_MARGIN)
            .take(STANDOUT_LIMIT)
            .map(|e| e.name().to_string())
            .collect();
        outsiders.reverse();

        let with_category = |category: MarketCategory| -> Vec<String> {
            ranked
                .iter()
                .filter(|e| e.category == category)
                .map(|e| e.name().to_string())
                .collect()
        };
        let dark_horses = with_category(MarketCategory::DarkHorse);
        let value_bets = with_category(MarketCategory::ValueBet);

        let principal = ranked.first();
        let strategy = strategy_line(principal, dark_horses.first(), value_bets.first());

        Self {
            field_size: ranked.len(),
            mean_score,
            max_score,
            min_score,
            spread,
            competitiveness: Competitiveness::from_spread(spread),
            tiers,
            principal_pick: principal.map(|e| e.name().to_string()),
            favourites,
            outsiders,
            best_jockey: standout(ranked, |e| e.components.jockey, |e| {
                e.entrant.jockey_name().unwrap_or(UNKNOWN_JOCKEY).to_string()
            }),
            best_form: standout(ranked, |e| e.components.form, horse_name),
            highest_momentum: standout(ranked, |e| e.features.form.momentum_index, horse_name),
            dark_horses,
            value_bets,
            strategy,
        }
    }
}

fn horse_name(entrant: &RankedEntrant) -> String {
    entrant.name().to_string()
}

/// First entrant with the highest value; later ties do not displace it
fn standout<F, L>(ranked: &[RankedEntrant], measure: F, label: L) -> Option<Standout>
where
    F: Fn(&RankedEntrant) -> f64,
    L: Fn(&RankedEntrant) -> String,
{
    ranked
        .iter()
        .map(|e| (e, measure(e)))
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
        .map(|(e, value)| Standout {
            name: label(e),
            value,
        })
}

fn strategy_line(
    principal: Option<&RankedEntrant>,
    dark_horse: Option<&String>,
    value_bet: Option<&String>,
) -> String {
    let Some(principal) = principal else {
        return "No selection".to_string();
    };
    let mut parts = vec![format!(
        "Main pick: {} ({:.1})",
        principal.name(),
        principal.total_score
    )];
    if let Some(name) = dark_horse {
        parts.push(format!("dark horse: {}", name));
    }
    if let Some(name) = value_bet {
        parts.push(format!("value: {}", name));
    }
    parts.join("; ")
}
