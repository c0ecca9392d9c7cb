use serde::{Deserialize, Serialize};

use super::components::Factor;

/// Scoring configuration.
///
/// Every field is optional; anything left out falls back to the built-in
/// value. Band tables use the same range syntax as the rest of the config
/// ("<=2", "3-8", ">=12") and are matched top to bottom, first match wins.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   rating_divisor: 12
///   weights:
///     rating: 0.25
///     form: 0.11
///   rosters:
///     jockeys: ["ryan moore", "moore", "buick"]
///   bands:
///     draw:
///       - { range: "1-4", score: 9 }
///       - { range: ">4", score: 6 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Factor weights; must sum to 1.0
    #[serde(default)]
    pub weights: Option<FactorWeights>,

    /// Official rating that maps to a rating score of 1.0 (default: 12, so OR 120 scores 10)
    #[serde(default)]
    pub rating_divisor: Option<f64>,

    /// Missing primary fields (rating, jockey, weight, age, form) that switch
    /// an entrant to the positional fallback (default: 3)
    #[serde(default)]
    pub missing_data_threshold: Option<usize>,

    /// Elite name fragments, matched case-insensitively as substrings
    #[serde(default)]
    pub rosters: Option<RosterConfig>,

    /// Threshold tables for the banded factors
    #[serde(default)]
    pub bands: Option<BandsConfig>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: Some(FactorWeights::default()),
            rating_divisor: Some(DEFAULT_RATING_DIVISOR),
            missing_data_threshold: Some(DEFAULT_MISSING_DATA_THRESHOLD),
            rosters: Some(RosterConfig::default()),
            bands: Some(BandsConfig::default()),
        }
    }
}

pub const DEFAULT_RATING_DIVISOR: f64 = 12.0;
pub const DEFAULT_MISSING_DATA_THRESHOLD: usize = 3;

/// Weight of each factor in the raw score.
///
/// Fields left out of a config file keep their default weight.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FactorWeights {
    pub rating: f64,
    pub form: f64,
    pub weight: f64,
    pub jockey: f64,
    pub trainer: f64,
    pub age: f64,
    pub draw: f64,
    pub odds: f64,
    pub momentum: f64,
    pub context: f64,
    pub value: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            rating: 0.20,
            form: 0.16,
            weight: 0.08,
            jockey: 0.12,
            trainer: 0.08,
            age: 0.07,
            draw: 0.07,
            odds: 0.04,
            momentum: 0.08,
            context: 0.06,
            value: 0.04,
        }
    }
}

impl FactorWeights {
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Rating => self.rating,
            Factor::Form => self.form,
            Factor::Weight => self.weight,
            Factor::Jockey => self.jockey,
            Factor::Trainer => self.trainer,
            Factor::Age => self.age,
            Factor::Draw => self.draw,
            Factor::Odds => self.odds,
            Factor::Momentum => self.momentum,
            Factor::Context => self.context,
            Factor::Value => self.value,
        }
    }

    pub fn sum(&self) -> f64 {
        Factor::ALL.iter().map(|f| self.get(*f)).sum()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RosterConfig {
    #[serde(default)]
    pub jockeys: Option<Vec<String>>,
    #[serde(default)]
    pub trainers: Option<Vec<String>>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            jockeys: Some(to_strings(&[
                "frankie dettori", "f dettori", "dettori",
                "ryan moore", "r moore", "moore",
                "william buick", "w buick", "buick",
                "oisin murphy", "o murphy", "murphy",
                "tom marquand", "t marquand", "marquand",
                "hollie doyle", "h doyle", "doyle",
            ])),
            trainers: Some(to_strings(&[
                "aidan o'brien", "a o'brien", "o'brien",
                "john gosden", "j gosden", "gosden",
                "charlie appleby", "c appleby", "appleby",
                "william haggas", "w haggas", "haggas",
                "sir michael stoute", "m stoute", "stoute",
            ])),
        }
    }
}

fn to_strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Threshold tables for odds, weight, draw and age.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BandsConfig {
    /// Decimal odds; shorter prices score higher
    #[serde(default)]
    pub odds: Option<Vec<BandEntry>>,
    /// Total pounds carried
    #[serde(default)]
    pub weight: Option<Vec<BandEntry>>,
    /// Stall number
    #[serde(default)]
    pub draw: Option<Vec<BandEntry>>,
    /// Age in years
    #[serde(default)]
    pub age: Option<Vec<BandEntry>>,
}

impl Default for BandsConfig {
    fn default() -> Self {
        Self {
            odds: Some(bands(&[
                ("<=2", 10.0),
                ("<=3", 8.0),
                ("<=5", 6.0),
                ("<=10", 4.0),
                ("<=20", 2.0),
                (">20", 1.0),
            ])),
            // 8-8 or less and the 9-1 to 9-7 bracket score best
            weight: Some(bands(&[
                ("<=120", 10.0),
                ("<=126", 9.0),
                ("<=133", 10.0),
                ("<=140", 9.0),
                (">140", 8.0),
            ])),
            draw: Some(bands(&[
                ("3-8", 8.0),
                ("<=2", 6.0),
                (">=12", 6.0),
                ("9-11", 7.0),
            ])),
            age: Some(bands(&[("4-6", 10.0), ("3", 6.0), ("7", 6.0)])),
        }
    }
}

/// One row of a band table.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BandEntry {
    /// Range expression (e.g. "<=2", "3-8", ">=12")
    pub range: String,
    /// Score for values in range, 0-10
    pub score: f64,
}

fn bands(rows: &[(&str, f64)]) -> Vec<BandEntry> {
    rows.iter()
        .map(|(range, score)| BandEntry {
            range: range.to_string(),
            score: *score,
        })
        .collect()
}
