//! The eleven component scorers. Each maps one feature to a score in [0, 10].

use serde::Serialize;
use std::fmt;

use super::factors::{band_lookup, band_score, Band, RangeOp};
use super::features::{EntrantFeatures, FormFeatures, Trend, FORM_WINDOW};
use crate::race::ConnectionStats;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Recency weights for the form score, most recent first
const FORM_RECENCY: [f64; FORM_WINDOW] = [1.0, 0.7, 0.5, 0.3, 0.2];

pub fn clamp_score(score: f64) -> f64 {
    score.clamp(MIN_SCORE, MAX_SCORE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Rating,
    Form,
    Weight,
    Jockey,
    Trainer,
    Age,
    Draw,
    Odds,
    Momentum,
    Context,
    Value,
}

impl Factor {
    pub const ALL: [Factor; 11] = [
        Factor::Rating,
        Factor::Form,
        Factor::Weight,
        Factor::Jockey,
        Factor::Trainer,
        Factor::Age,
        Factor::Draw,
        Factor::Odds,
        Factor::Momentum,
        Factor::Context,
        Factor::Value,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Factor::Rating => "Rating",
            Factor::Form => "Form",
            Factor::Weight => "Weight",
            Factor::Jockey => "Jockey",
            Factor::Trainer => "Trainer",
            Factor::Age => "Age",
            Factor::Draw => "Draw",
            Factor::Odds => "Odds",
            Factor::Momentum => "Momentum",
            Factor::Context => "Context",
            Factor::Value => "Value",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One score per factor, each in [0, 10].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentScores {
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

impl ComponentScores {
    /// Every factor at the same score
    pub fn uniform(score: f64) -> Self {
        Self {
            rating: score,
            form: score,
            weight: score,
            jockey: score,
            trainer: score,
            age: score,
            draw: score,
            odds: score,
            momentum: score,
            context: score,
            value: score,
        }
    }

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

    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::ALL.iter().map(move |f| (*f, self.get(*f)))
    }

    /// First factor whose score is NaN or infinite
    pub fn first_non_finite(&self) -> Option<Factor> {
        self.iter().find(|(_, score)| !score.is_finite()).map(|(f, _)| f)
    }
}

/// Elite name fragments for jockeys or trainers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    fragments: Vec<String>,
}

impl Roster {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fragments: names
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Case-insensitive substring match against any fragment
    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();
        self.fragments.iter().any(|fragment| name.contains(fragment.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// How a connection (jockey or trainer) is scored.
///
/// Both connections share one scorer; only the numbers differ.
#[derive(Debug, Clone, Copy)]
pub struct ConnectionProfile {
    pub elite_base: f64,
    pub known_base: f64,
    /// Names longer than this count as a known professional
    pub known_min_len: usize,
    /// Known names must also contain a capital letter (jockeys are listed "R Moore")
    pub known_requires_capital: bool,
    pub win_rate_bonus: &'static [Band],
    pub experience_bonus: &'static [Band],
}

pub const JOCKEY_PROFILE: ConnectionProfile = ConnectionProfile {
    elite_base: 8.0,
    known_base: 6.0,
    known_min_len: 5,
    known_requires_capital: true,
    win_rate_bonus: &[
        Band::new(RangeOp::GreaterEqual(25.0), 2.0),
        Band::new(RangeOp::GreaterEqual(20.0), 1.5),
        Band::new(RangeOp::GreaterEqual(15.0), 1.0),
        Band::new(RangeOp::GreaterEqual(10.0), 0.5),
        Band::new(RangeOp::GreaterEqual(5.0), 0.0),
    ],
    experience_bonus: &[
        Band::new(RangeOp::GreaterEqual(500.0), 0.5),
        Band::new(RangeOp::GreaterEqual(200.0), 0.3),
        Band::new(RangeOp::GreaterEqual(50.0), 0.1),
    ],
};

pub const TRAINER_PROFILE: ConnectionProfile = ConnectionProfile {
    elite_base: 7.0,
    known_base: 6.0,
    known_min_len: 5,
    known_requires_capital: false,
    win_rate_bonus: &[
        Band::new(RangeOp::GreaterEqual(30.0), 2.0),
        Band::new(RangeOp::GreaterEqual(25.0), 1.5),
        Band::new(RangeOp::GreaterEqual(20.0), 1.0),
        Band::new(RangeOp::GreaterEqual(15.0), 0.5),
        Band::new(RangeOp::GreaterEqual(10.0), 0.0),
    ],
    experience_bonus: &[
        Band::new(RangeOp::GreaterEqual(1000.0), 0.5),
        Band::new(RangeOp::GreaterEqual(500.0), 0.3),
        Band::new(RangeOp::GreaterEqual(100.0), 0.1),
    ],
};

/// Strike rate below every win-rate band
const POOR_STRIKE_RATE_PENALTY: f64 = -1.0;

/// Market edge (engine probability minus implied probability, in points) to value score
const VALUE_BANDS: &[Band] = &[
    Band::new(RangeOp::GreaterThan(20.0), 9.0),
    Band::new(RangeOp::GreaterThan(10.0), 7.0),
    Band::new(RangeOp::GreaterThan(0.0), 6.0),
    Band::new(RangeOp::GreaterThan(-10.0), 5.0),
    Band::new(RangeOp::GreaterThan(-20.0), 4.0),
];
const OVERPRICED_VALUE_SCORE: f64 = 2.0;

/// Official rating below which a horse may be dropping into an easier race
const LOW_RATING: f64 = 70.0;

/// Linear in the official rating, clamped.
pub fn rating_score(rating: Option<f64>, divisor: f64) -> f64 {
    match rating {
        Some(r) if divisor > 0.0 => clamp_score(r / divisor),
        _ => NEUTRAL_SCORE,
    }
}

/// Position points over the last five runs, weighted towards the most recent.
pub fn form_score(form: &FormFeatures) -> f64 {
    if !form.is_rated() {
        return NEUTRAL_SCORE;
    }
    let score: f64 = form
        .recent
        .iter()
        .zip(FORM_RECENCY)
        .map(|(code, weight)| code.form_points() * weight)
        .sum();
    clamp_score(score)
}

pub fn weight_score(weight_lbs: Option<u32>, bands: &[Band]) -> f64 {
    clamp_score(band_score(bands, weight_lbs.map(f64::from), NEUTRAL_SCORE))
}

/// Neutral draws score 7: a missing stall is not a bad stall.
pub fn draw_score(draw: Option<u32>, bands: &[Band]) -> f64 {
    clamp_score(band_score(bands, draw.map(f64::from), 7.0))
}

pub fn age_score(age: Option<u32>, bands: &[Band]) -> f64 {
    clamp_score(band_score(bands, age.map(f64::from), NEUTRAL_SCORE))
}

/// Market view of the horse. Informational: shorter odds score higher.
pub fn odds_score(decimal_odds: Option<f64>, bands: &[Band]) -> f64 {
    clamp_score(band_score(bands, decimal_odds, NEUTRAL_SCORE))
}

/// Base from the roster or the name itself, plus stat bonuses when the card
/// carries real numbers.
pub fn connection_score(
    name: Option<&str>,
    stats: Option<&ConnectionStats>,
    roster: &Roster,
    profile: &ConnectionProfile,
) -> f64 {
    let Some(name) = name else {
        return NEUTRAL_SCORE;
    };

    let base = if roster.matches(name) {
        profile.elite_base
    } else if name.chars().count() > profile.known_min_len
        && (!profile.known_requires_capital || name.chars().any(char::is_uppercase))
    {
        profile.known_base
    } else {
        NEUTRAL_SCORE
    };

    match stats {
        Some(ConnectionStats {
            win_percentage: Some(win),
            sample_size,
        }) if win.is_finite() => {
            let win_bonus = band_lookup(profile.win_rate_bonus, *win)
                .unwrap_or(POOR_STRIKE_RATE_PENALTY);
            let experience = band_lookup(profile.experience_bonus, f64::from(*sample_size))
                .unwrap_or(0.0);
            clamp_score(base + win_bonus + experience)
        }
        _ => base,
    }
}

pub fn jockey_score(name: Option<&str>, stats: Option<&ConnectionStats>, roster: &Roster) -> f64 {
    connection_score(name, stats, roster, &JOCKEY_PROFILE)
}

pub fn trainer_score(name: Option<&str>, stats: Option<&ConnectionStats>, roster: &Roster) -> f64 {
    connection_score(name, stats, roster, &TRAINER_PROFILE)
}

/// Direction of recent form plus recent wins and placings.
pub fn momentum_score(form: &FormFeatures) -> f64 {
    if !form.is_rated() {
        return NEUTRAL_SCORE;
    }
    let trend = match form.trend {
        Trend::StrictlyImproving => 3.0,
        Trend::ImprovingLastStep => 2.0,
        Trend::Flat => 0.0,
        Trend::Worsening => -2.0,
    };
    let wins = match form.recent_wins {
        0 => 0.0,
        1 => 1.0,
        _ => 3.0,
    };
    let places = if form.recent_places >= 2 { 1.0 } else { 0.0 };
    clamp_score(NEUTRAL_SCORE + trend + wins + places)
}

/// Race-context opportunity: a low-rated horse with a usable weight, a
/// recent top-two finish and named connections.
pub fn context_score(features: &EntrantFeatures) -> f64 {
    let mut score = NEUTRAL_SCORE;
    if features.weight_lbs.is_some() && features.rating.is_some_and(|r| r < LOW_RATING) {
        score += 1.0;
    }
    if features.form.recent_top_two() {
        score += 2.0;
    }
    if features.jockey_known {
        score += 0.5;
    }
    if features.trainer_known {
        score += 0.5;
    }
    clamp_score(score)
}

/// Engine win probability (rating score as a percentage) against the
/// market's implied probability.
pub fn value_score(decimal_odds: Option<f64>, rating_score: f64) -> f64 {
    let Some(odds) = decimal_odds.filter(|o| *o > 0.0) else {
        return NEUTRAL_SCORE;
    };
    let implied = 100.0 / odds;
    let estimated = rating_score / MAX_SCORE * 100.0;
    clamp_score(band_lookup(VALUE_BANDS, estimated - implied).unwrap_or(OVERPRICED_VALUE_SCORE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::Entrant;
    use crate::scoring::engine::BandTables;

    fn default_tables() -> BandTables {
        BandTables::default()
    }

    fn jockey_roster() -> Roster {
        Roster::new(["frankie dettori", "dettori", "ryan moore", "moore"])
    }

    fn stats(win_percentage: f64, sample_size: u32) -> ConnectionStats {
        ConnectionStats {
            win_percentage: Some(win_percentage),
            sample_size,
        }
    }

    #[test]
    fn test_rating_score() {
        assert!((rating_score(Some(96.0), 12.0) - 8.0).abs() < 1e-9);
        assert_eq!(rating_score(Some(150.0), 12.0), 10.0);
        assert_eq!(rating_score(Some(0.0), 12.0), 0.0);
        assert_eq!(rating_score(None, 12.0), NEUTRAL_SCORE);
        assert_eq!(rating_score(Some(90.0), 0.0), NEUTRAL_SCORE);
    }

    #[test]
    fn test_form_score_weighted_by_recency() {
        // 10*1.0 + 8*0.7 + 6*0.5 = 18.6, clamped
        assert_eq!(form_score(&FormFeatures::parse("123")), 10.0);
        // 4*1.0 + 2*0.7 + 0 + 0 + 0 = 5.4
        assert!((form_score(&FormFeatures::parse("45678")) - 5.4).abs() < 1e-9);
        // most recent run counts most
        let improving = form_score(&FormFeatures::parse("5999"));
        let declining = form_score(&FormFeatures::parse("9995"));
        assert!(improving > declining);
    }

    #[test]
    fn test_form_score_short_history_is_neutral() {
        assert_eq!(form_score(&FormFeatures::parse("1")), NEUTRAL_SCORE);
        assert_eq!(form_score(&FormFeatures::empty()), NEUTRAL_SCORE);
    }

    #[test]
    fn test_form_score_no_finishes() {
        assert_eq!(form_score(&FormFeatures::parse("---0P")), 0.0);
    }

    #[test]
    fn test_weight_score_bands() {
        let bands = default_tables().weight;
        assert_eq!(weight_score(Some(118), &bands), 10.0);
        assert_eq!(weight_score(Some(124), &bands), 9.0);
        assert_eq!(weight_score(Some(128), &bands), 10.0);
        assert_eq!(weight_score(Some(138), &bands), 9.0);
        assert_eq!(weight_score(Some(150), &bands), 8.0);
        assert_eq!(weight_score(None, &bands), NEUTRAL_SCORE);
    }

    #[test]
    fn test_draw_score_favours_middle() {
        let bands = default_tables().draw;
        assert_eq!(draw_score(Some(5), &bands), 8.0);
        assert_eq!(draw_score(Some(1), &bands), 6.0);
        assert_eq!(draw_score(Some(10), &bands), 7.0);
        assert_eq!(draw_score(Some(14), &bands), 6.0);
        assert_eq!(draw_score(None, &bands), 7.0);
    }

    #[test]
    fn test_age_score_peak_ages() {
        let bands = default_tables().age;
        assert_eq!(age_score(Some(5), &bands), 10.0);
        assert_eq!(age_score(Some(3), &bands), 6.0);
        assert_eq!(age_score(Some(7), &bands), 6.0);
        assert_eq!(age_score(Some(9), &bands), NEUTRAL_SCORE);
        assert_eq!(age_score(None, &bands), NEUTRAL_SCORE);
    }

    #[test]
    fn test_odds_score_shorter_is_higher() {
        let bands = default_tables().odds;
        assert_eq!(odds_score(Some(2.0), &bands), 10.0);
        assert_eq!(odds_score(Some(3.0), &bands), 8.0);
        assert_eq!(odds_score(Some(5.0), &bands), 6.0);
        assert_eq!(odds_score(Some(9.0), &bands), 4.0);
        assert_eq!(odds_score(Some(17.0), &bands), 2.0);
        assert_eq!(odds_score(Some(51.0), &bands), 1.0);
        assert_eq!(odds_score(None, &bands), NEUTRAL_SCORE);
    }

    #[test]
    fn test_jockey_elite_roster_case_insensitive() {
        let roster = jockey_roster();
        assert_eq!(jockey_score(Some("Frankie DETTORI"), None, &roster), 8.0);
        assert_eq!(jockey_score(Some("R Moore"), None, &roster), 8.0);
    }

    #[test]
    fn test_jockey_name_heuristic() {
        let roster = jockey_roster();
        assert_eq!(jockey_score(Some("Billy Loughnane"), None, &roster), 6.0);
        assert_eq!(jockey_score(Some("billy loughnane"), None, &roster), NEUTRAL_SCORE);
        assert_eq!(jockey_score(Some("J Fox"), None, &roster), NEUTRAL_SCORE);
        assert_eq!(jockey_score(None, None, &roster), NEUTRAL_SCORE);
    }

    #[test]
    fn test_jockey_stats_raise_score() {
        let roster = jockey_roster();
        let without = jockey_score(Some("A Smith"), None, &roster);
        let with = jockey_score(Some("A Smith"), Some(&stats(25.0, 600)), &roster);
        assert!(with > without);
        assert_eq!(with, 8.5);
    }

    #[test]
    fn test_jockey_poor_strike_rate_penalised() {
        let roster = jockey_roster();
        let score = jockey_score(Some("A Smith"), Some(&stats(2.0, 20)), &roster);
        assert_eq!(score, 5.0);
    }

    #[test]
    fn test_jockey_stats_clamped() {
        let roster = jockey_roster();
        let score = jockey_score(Some("Ryan Moore"), Some(&stats(40.0, 2000)), &roster);
        assert_eq!(score, 10.0);
    }

    #[test]
    fn test_stats_without_win_rate_keep_base() {
        let roster = jockey_roster();
        let partial = ConnectionStats {
            win_percentage: None,
            sample_size: 900,
        };
        assert_eq!(jockey_score(Some("A Smith"), Some(&partial), &roster), 6.0);
    }

    #[test]
    fn test_trainer_score() {
        let roster = Roster::new(["john gosden", "gosden"]);
        assert_eq!(trainer_score(Some("J Gosden"), None, &roster), 7.0);
        assert_eq!(trainer_score(Some("mick appleby"), None, &roster), 6.0);
        assert_eq!(trainer_score(Some("Bo"), None, &roster), NEUTRAL_SCORE);
        // 6 + 1.0 (20%) + 0.3 (500 runs)
        let score = trainer_score(Some("Karl Burke"), Some(&stats(20.0, 500)), &roster);
        assert!((score - 7.3).abs() < 1e-9);
    }

    #[test]
    fn test_momentum_score() {
        // improving "123": +3 trend, +1 win, +1 placings
        assert_eq!(momentum_score(&FormFeatures::parse("123")), 10.0);
        // "11234": flat, 2 wins (+3), 3 placings (+1)
        assert_eq!(momentum_score(&FormFeatures::parse("11234")), 9.0);
        // "31242": flat, 1 win (+1), 3 placings (+1)
        assert_eq!(momentum_score(&FormFeatures::parse("31242")), 7.0);
        // "987": worsening -2
        assert_eq!(momentum_score(&FormFeatures::parse("987")), 3.0);
        assert_eq!(momentum_score(&FormFeatures::parse("1")), NEUTRAL_SCORE);
    }

    fn context_of(entrant: &Entrant) -> f64 {
        context_score(&EntrantFeatures::extract(entrant, 1))
    }

    #[test]
    fn test_context_score() {
        let bare = Entrant::new("Bare");
        assert_eq!(context_of(&bare), NEUTRAL_SCORE);

        let low_rated = Entrant {
            official_rating: Some("65".to_string()),
            weight: Some("9-2".to_string()),
            ..Entrant::new("Low Rated")
        };
        assert_eq!(context_of(&low_rated), 6.0);

        // no readable weight, no low-rating bonus
        let unweighted = Entrant {
            weight: Some("heavy".to_string()),
            ..low_rated.clone()
        };
        assert_eq!(context_of(&unweighted), NEUTRAL_SCORE);

        let well_rated = Entrant {
            official_rating: Some("80".to_string()),
            ..low_rated.clone()
        };
        assert_eq!(context_of(&well_rated), NEUTRAL_SCORE);

        let recent_second = Entrant {
            form: Some("3214".to_string()),
            ..Entrant::new("Recent Second")
        };
        assert_eq!(context_of(&recent_second), 7.0);
        let no_recent_top_two = Entrant {
            form: Some("3514".to_string()),
            ..Entrant::new("Plodder")
        };
        assert_eq!(context_of(&no_recent_top_two), NEUTRAL_SCORE);

        let jockey_only = Entrant {
            jockey: Some("A Smith".to_string()),
            ..Entrant::new("Jockey Only")
        };
        assert_eq!(context_of(&jockey_only), 5.5);

        let everything = Entrant {
            jockey: Some("A Smith".to_string()),
            trainer: Some("B Jones".to_string()),
            form: Some("1234".to_string()),
            ..low_rated
        };
        let score = context_of(&everything);
        assert_eq!(score, 9.0);
        assert!(score <= MAX_SCORE);
    }

    #[test]
    fn test_value_score() {
        // rating score 8 -> 80%, evens -> 50%: edge 30
        assert_eq!(value_score(Some(2.0), 8.0), 9.0);
        // 60% vs 50%: edge 10, not above 10
        assert_eq!(value_score(Some(2.0), 6.0), 6.0);
        // 40% vs 50%
        assert_eq!(value_score(Some(2.0), 4.0), 4.0);
        // 10% vs 66.7%
        assert_eq!(value_score(Some(1.5), 1.0), 2.0);
        assert_eq!(value_score(None, 8.0), NEUTRAL_SCORE);
    }

    #[test]
    fn test_roster_ignores_blank_fragments() {
        let roster = Roster::new(["", "  ", "Moore"]);
        assert_eq!(roster.len(), 1);
        assert!(roster.matches("ryan moore"));
        assert!(!Roster::default().matches("anyone"));
    }

    #[test]
    fn test_component_scores_iter_covers_all_factors() {
        let scores = ComponentScores::uniform(4.0);
        assert_eq!(scores.iter().count(), 11);
        assert!(scores.iter().all(|(_, s)| s == 4.0));
        assert_eq!(scores.first_non_finite(), None);

        let mut broken = scores;
        broken.value = f64::NAN;
        assert_eq!(broken.first_non_finite(), Some(Factor::Value));
    }
}
