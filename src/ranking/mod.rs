pub mod adjust;
pub mod analysis;
pub mod config;
pub mod recommend;
pub mod summary;
pub mod tiers;

pub use adjust::{Adjustment, AdjustmentReason, ComparativeAdjuster, FieldStats};
pub use analysis::{RaceAnalysis, RaceAnalyzer, RankedEntrant};
pub use config::{validate_ranking, AdjustmentConfig, RankingConfig};
pub use recommend::{MarketCategory, MomentumBand, Recommendation, ScoreBand, Stance};
pub use summary::{Competitiveness, RaceSummary, Standout, TierDistribution};
pub use tiers::{percentile, Tier, TierThresholds};
