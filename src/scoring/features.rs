//! Feature extraction: turn the raw text of an entrant into numbers.
//!
//! Nothing here fails. A field that does not parse comes back as `None` (the
//! neutral marker) and each scorer decides what neutral means for its factor.

use serde::Serialize;

use crate::race::{Entrant, HistoricalRun};

/// Form codes considered by the form score and consistency index
pub const FORM_WINDOW: usize = 5;
/// Form codes considered by momentum and trend
pub const RECENT_WINDOW: usize = 3;
/// Neutral value of the 0-100 form indices
pub const NEUTRAL_INDEX: f64 = 50.0;

/// Decimal odds from "evens", fractional "n/d" or decimal text.
pub fn parse_odds(s: &str) -> Option<f64> {
    let s = s.trim().to_ascii_lowercase();
    let decimal = match s.as_str() {
        "evens" | "evs" | "even" | "evn" => 2.0,
        _ => {
            if let Some((num, den)) = s.split_once('/') {
                let num: f64 = num.trim().parse().ok()?;
                let den: f64 = den.trim().parse().ok()?;
                if den <= 0.0 || num < 0.0 {
                    return None;
                }
                num / den + 1.0
            } else {
                s.parse().ok()?
            }
        }
    };
    (decimal.is_finite() && decimal >= 1.0).then_some(decimal)
}

/// Total pounds from "stones-pounds".
pub fn parse_weight(s: &str) -> Option<u32> {
    let (stones, pounds) = s.trim().split_once('-')?;
    let stones: u32 = stones.trim().parse().ok()?;
    let pounds: u32 = pounds.trim().parse().ok()?;
    if pounds >= 14 {
        return None;
    }
    stones.checked_mul(14)?.checked_add(pounds)
}

/// Leading digits of the text, so "4yo" and "4 years" both read as 4.
pub fn parse_age(s: &str) -> Option<u32> {
    leading_number(s)
}

pub fn parse_draw(s: &str) -> Option<u32> {
    leading_number(s.trim().trim_start_matches('('))
}

pub fn parse_rating(s: &str) -> Option<f64> {
    let rating: f64 = s.trim().parse().ok()?;
    (rating.is_finite() && rating >= 0.0).then_some(rating)
}

fn leading_number(s: &str) -> Option<u32> {
    let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// One character of a form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormCode {
    /// Finished 1st-9th
    Placed(u8),
    /// '0': finished 10th or worse
    Unplaced,
    /// '-', or a letter code (fell, pulled up, ...): did not finish
    NoFinish,
}

impl FormCode {
    pub fn from_char(c: char) -> Self {
        match c {
            '0' => FormCode::Unplaced,
            '1'..='9' => FormCode::Placed(c as u8 - b'0'),
            _ => FormCode::NoFinish,
        }
    }

    /// Finishing position for comparisons; `None` when the run was not completed
    pub fn position(self) -> Option<u8> {
        match self {
            FormCode::Placed(n) => Some(n),
            FormCode::Unplaced => Some(10),
            FormCode::NoFinish => None,
        }
    }

    pub fn is_win(self) -> bool {
        self == FormCode::Placed(1)
    }

    pub fn is_top(self, places: u8) -> bool {
        matches!(self, FormCode::Placed(n) if n <= places)
    }

    /// Points for the form score: 1st=10, 2nd=8, 3rd=6, 4th=4, 5th=2
    pub fn form_points(self) -> f64 {
        match self {
            FormCode::Placed(n @ 1..=5) => f64::from(12 - 2 * n),
            _ => 0.0,
        }
    }

    /// Points for the momentum index: 1st=10, 2nd=7, 3rd=5, 4th=3, anything else 1
    pub fn momentum_points(self) -> f64 {
        match self {
            FormCode::Placed(1) => 10.0,
            FormCode::Placed(2) => 7.0,
            FormCode::Placed(3) => 5.0,
            FormCode::Placed(4) => 3.0,
            _ => 1.0,
        }
    }
}

/// Direction of the three most recent finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    /// Each run better than the one before (e.g. "123")
    StrictlyImproving,
    /// Last run better than the previous one
    ImprovingLastStep,
    /// No clear direction, or not enough completed runs to tell
    Flat,
    /// Each run worse than the one before (e.g. "321")
    Worsening,
}

impl Trend {
    fn from_recent(codes: &[FormCode]) -> Self {
        let positions: Option<Vec<u8>> = codes
            .iter()
            .take(RECENT_WINDOW)
            .map(|c| c.position())
            .collect();
        match positions.as_deref() {
            Some(&[last, prev, before]) => {
                if last < prev && prev < before {
                    Trend::StrictlyImproving
                } else if last < prev {
                    Trend::ImprovingLastStep
                } else if last > prev && prev > before {
                    Trend::Worsening
                } else {
                    Trend::Flat
                }
            }
            _ => Trend::Flat,
        }
    }
}

/// Everything derived from a form string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormFeatures {
    /// Up to `FORM_WINDOW` most recent codes
    pub recent: Vec<FormCode>,
    /// Number of codes in the full string
    pub runs: usize,
    /// Wins among the last three runs
    pub recent_wins: usize,
    /// Top-3 finishes among the last three runs
    pub recent_places: usize,
    pub trend: Trend,
    /// 0-100, see `momentum_index`
    pub momentum_index: f64,
    /// 0-100, see `consistency_index`
    pub consistency_index: f64,
}

impl FormFeatures {
    pub fn parse(form: &str) -> Self {
        let codes: Vec<FormCode> = form
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(FormCode::from_char)
            .collect();
        let runs = codes.len();
        let recent: Vec<FormCode> = codes.into_iter().take(FORM_WINDOW).collect();
        let last_three = &recent[..recent.len().min(RECENT_WINDOW)];

        Self {
            recent_wins: last_three.iter().filter(|c| c.is_win()).count(),
            recent_places: last_three.iter().filter(|c| c.is_top(3)).count(),
            trend: Trend::from_recent(&recent),
            momentum_index: momentum_index(&recent, runs),
            consistency_index: consistency_index(&recent, runs),
            recent,
            runs,
        }
    }

    pub fn empty() -> Self {
        Self::parse("")
    }

    /// Enough history to score form at all
    pub fn is_rated(&self) -> bool {
        self.runs >= RECENT_WINDOW
    }

    /// Finished first or second in either of the last two runs
    pub fn recent_top_two(&self) -> bool {
        self.recent.iter().take(2).any(|c| c.is_top(2))
    }
}

/// Points over the last three runs scaled to 0-100, rounded.
fn momentum_index(recent: &[FormCode], runs: usize) -> f64 {
    if runs < RECENT_WINDOW {
        return NEUTRAL_INDEX;
    }
    let points: f64 = recent
        .iter()
        .take(RECENT_WINDOW)
        .map(|c| c.momentum_points())
        .sum();
    (points / 30.0 * 100.0).min(100.0).round()
}

/// Share of top-3 finishes over the form window, 0-100, unbanded so both
/// adjuster thresholds stay reachable.
fn consistency_index(recent: &[FormCode], runs: usize) -> f64 {
    if runs < RECENT_WINDOW || recent.is_empty() {
        return NEUTRAL_INDEX;
    }
    let placed = recent.iter().filter(|c| c.is_top(3)).count();
    (placed * 100) as f64 / recent.len() as f64
}

/// Trip length in furlongs from "1m 2f", "7f", "2m", "1m4f".
pub fn parse_furlongs(s: &str) -> Option<u32> {
    let compact: String = s.to_ascii_lowercase().chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    let (miles, rest) = match compact.split_once('m') {
        Some((m, rest)) => (m.parse::<u32>().ok()?, rest),
        None => (0, compact.as_str()),
    };
    let furlongs = match rest.strip_suffix('f') {
        Some(f) => f.parse::<u32>().ok()?,
        None if rest.is_empty() => 0,
        None => return None,
    };
    let total = miles.checked_mul(8)?.checked_add(furlongs)?;
    (total > 0).then_some(total)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TripCategory {
    Sprint,
    Middle,
    Staying,
}

impl TripCategory {
    fn from_furlongs(furlongs: u32) -> Self {
        match furlongs {
            0..=8 => TripCategory::Sprint,
            9..=12 => TripCategory::Middle,
            _ => TripCategory::Staying,
        }
    }
}

/// Best win rate (0-100) across sprint, middle and staying trips.
///
/// Needs at least three runs with a readable distance; otherwise neutral.
pub fn distance_preference(runs: &[HistoricalRun]) -> f64 {
    let mut tallies = [(TripCategory::Sprint, 0u32, 0u32), (TripCategory::Middle, 0, 0), (TripCategory::Staying, 0, 0)];
    let mut counted = 0;

    for run in runs {
        let Some(furlongs) = run.distance.as_deref().and_then(parse_furlongs) else {
            continue;
        };
        let category = TripCategory::from_furlongs(furlongs);
        if let Some(tally) = tallies.iter_mut().find(|t| t.0 == category) {
            tally.1 += 1;
            if run.position.trim() == "1" {
                tally.2 += 1;
            }
            counted += 1;
        }
    }

    if counted < RECENT_WINDOW {
        return NEUTRAL_INDEX;
    }
    tallies
        .iter()
        .filter(|(_, runs, _)| *runs > 0)
        .map(|(_, runs, wins)| f64::from(*wins) / f64::from(*runs) * 100.0)
        .fold(0.0, f64::max)
}

/// Numeric view of an entrant. `None` fields are the neutral marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrantFeatures {
    /// 1-based order in the reconciled field
    pub position: usize,
    pub decimal_odds: Option<f64>,
    pub weight_lbs: Option<u32>,
    pub age: Option<u32>,
    pub rating: Option<f64>,
    /// Declared draw, or the starting position when the card has none
    pub draw: u32,
    pub form: FormFeatures,
    pub jockey_known: bool,
    pub trainer_known: bool,
    pub distance_preference: f64,
    /// Missing among rating, jockey, weight, age, form
    pub missing_primary: usize,
    /// Missing among rating, form, weight, age
    pub missing_core: usize,
}

impl EntrantFeatures {
    pub fn extract(entrant: &Entrant, position: usize) -> Self {
        let known = Entrant::known;

        let rating = known(&entrant.official_rating).and_then(parse_rating);
        let weight_lbs = known(&entrant.weight).and_then(parse_weight);
        let age = known(&entrant.age).and_then(parse_age);
        let form_text = known(&entrant.form);
        let form = form_text.map(FormFeatures::parse).unwrap_or_else(FormFeatures::empty);
        let jockey_known = entrant.jockey_name().is_some();

        let missing_core = [
            rating.is_none(),
            form_text.is_none(),
            weight_lbs.is_none(),
            age.is_none(),
        ]
        .iter()
        .filter(|missing| **missing)
        .count();

        Self {
            position,
            decimal_odds: known(&entrant.odds).and_then(parse_odds),
            weight_lbs,
            age,
            rating,
            draw: known(&entrant.draw)
                .and_then(parse_draw)
                .unwrap_or(position as u32),
            form,
            jockey_known,
            trainer_known: entrant.trainer_name().is_some(),
            distance_preference: distance_preference(&entrant.historical_runs),
            missing_primary: missing_core + usize::from(!jockey_known),
            missing_core,
        }
    }
}

/// Sparse-record fallback for the primary factors.
///
/// When too many of the primary fields are missing the rating, form and
/// jockey scores would all sit on their neutral values; instead they take a
/// band that follows starting order, since cards list stronger runners first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissingDataPolicy {
    /// Missing primary fields that trigger the override
    pub threshold: usize,
}

impl Default for MissingDataPolicy {
    fn default() -> Self {
        Self { threshold: 3 }
    }
}

impl MissingDataPolicy {
    /// Override score for the primary factors, or `None` when the record is
    /// complete enough to be scored normally.
    pub fn neutral_band(&self, missing_count: usize, position: usize) -> Option<f64> {
        if missing_count < self.threshold {
            return None;
        }
        Some((10.0 - position as f64 * 0.5).max(5.0))
    }
}
