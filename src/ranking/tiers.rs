use serde::Serialize;
use std::fmt;

/// Performance band within one race, from the observed score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Tier {
    Elite,
    Good,
    Average,
    Weak,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Elite, Tier::Good, Tier::Average, Tier::Weak];

    pub fn label(self) -> &'static str {
        match self {
            Tier::Elite => "Elite",
            Tier::Good => "Good",
            Tier::Average => "Average",
            Tier::Weak => "Weak",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Quartile cut-offs of the adjusted-score range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierThresholds {
    pub elite: f64,
    pub good: f64,
    pub average: f64,
    degenerate: bool,
}

impl TierThresholds {
    pub fn from_range(min: f64, max: f64) -> Self {
        let range = max - min;
        Self {
            elite: max - 0.25 * range,
            good: max - 0.5 * range,
            average: max - 0.75 * range,
            degenerate: range <= 0.0,
        }
    }

    pub fn from_scores(scores: &[f64]) -> Self {
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
        if scores.is_empty() {
            return Self::from_range(0.0, 0.0);
        }
        Self::from_range(min, max)
    }

    pub fn classify(&self, score: f64) -> Tier {
        if self.degenerate || score >= self.elite {
            Tier::Elite
        } else if score >= self.good {
            Tier::Good
        } else if score >= self.average {
            Tier::Average
        } else {
            Tier::Weak
        }
    }
}

/// Share of the field at or below this rank, 0-100. `rank` is 1-based.
pub fn percentile(rank: usize, field_size: usize) -> f64 {
    if field_size == 0 {
        return 0.0;
    }
    (field_size + 1 - rank.clamp(1, field_size)) as f64 / field_size as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quartile_tiers() {
        let thresholds = TierThresholds::from_range(2.0, 10.0);
        assert_eq!(thresholds.classify(10.0), Tier::Elite);
        assert_eq!(thresholds.classify(8.0), Tier::Elite);
        assert_eq!(thresholds.classify(7.9), Tier::Good);
        assert_eq!(thresholds.classify(6.0), Tier::Good);
        assert_eq!(thresholds.classify(4.0), Tier::Average);
        assert_eq!(thresholds.classify(3.9), Tier::Weak);
        assert_eq!(thresholds.classify(2.0), Tier::Weak);
    }

    #[test]
    fn test_equal_scores_all_elite() {
        let thresholds = TierThresholds::from_scores(&[6.2, 6.2, 6.2]);
        assert_eq!(thresholds.classify(6.2), Tier::Elite);
    }

    #[test]
    fn test_single_score_elite() {
        let thresholds = TierThresholds::from_scores(&[3.0]);
        assert_eq!(thresholds.classify(3.0), Tier::Elite);
    }

    #[test]
    fn test_percentiles_for_ten_runners() {
        let percentiles: Vec<f64> = (1..=10).map(|rank| percentile(rank, 10)).collect();
        assert_eq!(percentiles[0], 100.0);
        assert_eq!(percentiles[9], 10.0);
        assert!(percentiles.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_percentile_edge_cases() {
        assert_eq!(percentile(1, 1), 100.0);
        assert_eq!(percentile(1, 0), 0.0);
        assert_eq!(percentile(3, 4), 50.0);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(Tier::Elite < Tier::Weak);
        assert_eq!(Tier::ALL.len(), 4);
        assert_eq!(Tier::Average.to_string(), "Average");
    }
}
