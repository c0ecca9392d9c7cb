//! Multi-factor comparative ranking of race entrants.
//!
//! Each entrant's raw card fields are turned into features, scored on eleven
//! factors, aggregated with a weight vector, then adjusted, ranked and
//! classified against the rest of its field.

pub mod config;
pub mod error;
pub mod output;
pub mod race;
pub mod ranking;
pub mod scoring;

pub use error::AnalysisError;
pub use race::{Entrant, RaceCard};
pub use ranking::{RaceAnalysis, RaceAnalyzer, RankedEntrant};
