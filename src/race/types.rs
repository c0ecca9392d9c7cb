use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Text values that card sources use for "we don't know".
const UNKNOWN_MARKERS: &[&str] = &["n/a", "na", "unknown", "?"];

/// Authoritative record for a jockey or trainer, when the card source has one.
///
/// Both fields are read leniently: "25%" is a strike rate of 25, and an
/// unreadable sample size counts as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionStats {
    /// Strike rate, 0-100; `None` when missing or unreadable
    #[serde(default, deserialize_with = "lenient_number")]
    pub win_percentage: Option<f64>,
    /// Rides for a jockey, runners for a trainer
    #[serde(
        default,
        alias = "rides",
        alias = "runs",
        deserialize_with = "lenient_count"
    )]
    pub sample_size: u32,
}

/// One past run, most recent first in `Entrant::historical_runs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalRun {
    #[serde(default, deserialize_with = "lenient_required_text")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub venue: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub distance: Option<String>,
}

/// A race entrant exactly as the card source delivered it.
///
/// Every field apart from `name` is raw text and may be missing or garbage;
/// scoring degrades each field to a neutral value instead of rejecting the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    #[serde(default, deserialize_with = "lenient_required_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub jockey: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub trainer: Option<String>,
    /// "4/1", "evens" or decimal "5.00"
    #[serde(default, deserialize_with = "lenient_text")]
    pub odds: Option<String>,
    /// "stones-pounds", e.g. "9-2"
    #[serde(default, deserialize_with = "lenient_text")]
    pub weight: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub age: Option<String>,
    /// Finishing positions, most recent first
    #[serde(default, deserialize_with = "lenient_text")]
    pub form: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub official_rating: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub draw: Option<String>,
    #[serde(default, deserialize_with = "lenient_stats")]
    pub jockey_stats: Option<ConnectionStats>,
    #[serde(default, deserialize_with = "lenient_stats")]
    pub trainer_stats: Option<ConnectionStats>,
    #[serde(default, deserialize_with = "lenient_runs")]
    pub historical_runs: Vec<HistoricalRun>,
}

impl Entrant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Field value if present and not an "unknown" marker
    pub fn known(field: &Option<String>) -> Option<&str> {
        field.as_deref().map(str::trim).filter(|s| !is_unknown(s))
    }

    pub fn jockey_name(&self) -> Option<&str> {
        Self::known(&self.jockey)
    }

    pub fn trainer_name(&self) -> Option<&str> {
        Self::known(&self.trainer)
    }
}

/// A race card: optional metadata plus the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaceCard {
    #[serde(default)]
    pub title: Option<String>,
    /// Ground description ("good", "soft", ...)
    #[serde(default)]
    pub going: Option<String>,
    pub entrants: Vec<Entrant>,
}

/// Input files hold either a full card or just the list of entrants.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RaceInput {
    Card(RaceCard),
    Entrants(Vec<Entrant>),
}

impl From<RaceInput> for RaceCard {
    fn from(input: RaceInput) -> Self {
        match input {
            RaceInput::Card(card) => card,
            RaceInput::Entrants(entrants) => RaceCard {
                entrants,
                ..Default::default()
            },
        }
    }
}

/// True for blank text and the usual "unknown" placeholders
pub fn is_unknown(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || UNKNOWN_MARKERS.iter().any(|m| value.eq_ignore_ascii_case(m))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Int(i64),
    Float(f64),
    Other(IgnoredAny),
}

impl RawText {
    fn into_text(self) -> Option<String> {
        match self {
            RawText::Text(s) => Some(s),
            RawText::Int(n) => Some(n.to_string()),
            RawText::Float(f) => Some(f.to_string()),
            RawText::Other(_) => None,
        }
    }

    fn into_number(self) -> Option<f64> {
        let number = match self {
            RawText::Text(s) => s.trim().trim_end_matches('%').trim_end().parse::<f64>().ok()?,
            RawText::Int(n) => n as f64,
            RawText::Float(f) => f,
            RawText::Other(_) => return None,
        };
        number.is_finite().then_some(number)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    Other(IgnoredAny),
}

impl<T> Lenient<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Lenient::Value(value) => Some(value),
            Lenient::Other(_) => None,
        }
    }
}

// Card sources disagree on whether ratings and draws are strings or numbers.
// Anything else (booleans, objects, lists) reads as missing.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawText>::deserialize(deserializer)?.and_then(RawText::into_text))
}

fn lenient_required_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawText::deserialize(deserializer)?
        .into_text()
        .unwrap_or_default())
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawText>::deserialize(deserializer)?.and_then(RawText::into_number))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let count = lenient_number(deserializer)?.filter(|n| *n >= 0.0);
    Ok(count.map(|n| n.min(f64::from(u32::MAX)) as u32).unwrap_or(0))
}

/// A stats block that is not an object reads as no stats at all.
fn lenient_stats<'de, D>(deserializer: D) -> Result<Option<ConnectionStats>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Lenient<ConnectionStats>>::deserialize(deserializer)?.and_then(Lenient::into_option))
}

/// Runs that cannot be read are skipped; a non-list reads as no history.
fn lenient_runs<'de, D>(deserializer: D) -> Result<Vec<HistoricalRun>, D::Error>
where
    D: Deserializer<'de>,
{
    let runs = Option::<Lenient<Vec<Lenient<HistoricalRun>>>>::deserialize(deserializer)?
        .and_then(Lenient::into_option)
        .unwrap_or_default();
    Ok(runs.into_iter().filter_map(Lenient::into_option).collect())
}
