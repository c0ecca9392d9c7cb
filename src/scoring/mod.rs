pub mod components;
pub mod config;
pub mod engine;
pub mod factors;
pub mod features;
pub mod validation;

pub use components::{ComponentScores, Factor, Roster};
pub use config::*;
pub use engine::{aggregate, BandTables, FactorContribution, ScoredEntrant, ScoringEngine};
pub use factors::{Band, RangeOp};
pub use features::{EntrantFeatures, FormFeatures, MissingDataPolicy, Trend};
pub use validation::validate_scoring;
