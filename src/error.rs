//! Engine errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The batch was empty, or every entrant was dropped
    #[error("No valid entrants to analyse")]
    NoValidEntrants,

    /// Arithmetic produced NaN or infinity for one entrant
    #[error("Non-finite {component} score for '{name}'")]
    NonFiniteScore { name: String, component: String },
}
