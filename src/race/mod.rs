pub mod types;

pub use types::{is_unknown, ConnectionStats, Entrant, HistoricalRun, RaceCard, RaceInput};

use std::collections::HashSet;
use tracing::warn;

/// Drop entrants without a usable name and keep only the first record for
/// each name. Card sources often list a runner twice (racecard + betting
/// block); the first occurrence carries the starting order.
pub fn reconcile(entrants: Vec<Entrant>) -> Vec<Entrant> {
    let total = entrants.len();
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(total);

    for mut entrant in entrants {
        let name = entrant.name.trim().to_string();
        if name.is_empty() {
            warn!("Dropping entrant with no name");
            continue;
        }
        if !seen.insert(name.clone()) {
            warn!("Duplicate entrant removed: {}", name);
            continue;
        }
        entrant.name = name;
        unique.push(entrant);
    }

    if unique.len() != total {
        tracing::debug!(
            "Reconciled {} entrants down to {} unique",
            total,
            unique.len()
        );
    }
    unique
}
