//! Qualitative verdicts: score band crossed with momentum band.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    Excellent,
    Strong,
    Solid,
    Average,
    Weak,
}

impl ScoreBand {
    /// Band of a raw 0-10 score
    pub fn from_score(raw_score: f64) -> Self {
        if raw_score >= 8.5 {
            ScoreBand::Excellent
        } else if raw_score >= 7.5 {
            ScoreBand::Strong
        } else if raw_score >= 6.5 {
            ScoreBand::Solid
        } else if raw_score >= 5.5 {
            ScoreBand::Average
        } else {
            ScoreBand::Weak
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent candidate",
            ScoreBand::Strong => "strong candidate",
            ScoreBand::Solid => "solid candidate",
            ScoreBand::Average => "average candidate",
            ScoreBand::Weak => "weak candidate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MomentumBand {
    Low,
    Moderate,
    Good,
    Excellent,
}

impl MomentumBand {
    /// Band of a 0-100 momentum index
    pub fn from_index(momentum_index: f64) -> Self {
        if momentum_index < 30.0 {
            MomentumBand::Low
        } else if momentum_index <= 60.0 {
            MomentumBand::Moderate
        } else if momentum_index <= 80.0 {
            MomentumBand::Good
        } else {
            MomentumBand::Excellent
        }
    }
}

/// Betting stance, most negative first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Stance {
    Avoid,
    CautiousBet,
    ModerateBet,
    GoodBet,
    ExcellentBet,
}

impl Stance {
    pub fn label(self) -> &'static str {
        match self {
            Stance::Avoid => "Avoid",
            Stance::CautiousBet => "Cautious bet",
            Stance::ModerateBet => "Moderate bet",
            Stance::GoodBet => "Good bet",
            Stance::ExcellentBet => "Excellent bet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub score_band: ScoreBand,
    pub momentum_band: MomentumBand,
    pub stance: Stance,
}

impl Recommendation {
    pub fn new(raw_score: f64, momentum_index: f64) -> Self {
        let score_band = ScoreBand::from_score(raw_score);
        let momentum_band = MomentumBand::from_index(momentum_index);
        let stance = match (score_band, momentum_band) {
            (ScoreBand::Weak, _) => Stance::Avoid,
            (ScoreBand::Excellent | ScoreBand::Strong, MomentumBand::Low) => Stance::CautiousBet,
            (_, MomentumBand::Low) => Stance::Avoid,
            (_, MomentumBand::Moderate) => Stance::ModerateBet,
            (_, MomentumBand::Good) => Stance::GoodBet,
            (_, MomentumBand::Excellent) => Stance::ExcellentBet,
        };
        Self {
            score_band,
            momentum_band,
            stance,
        }
    }

    /// e.g. "Good bet - strong candidate", "Avoid - solid candidate (low momentum)"
    pub fn verdict(&self) -> String {
        let suffix = match (self.score_band, self.momentum_band) {
            (ScoreBand::Weak, _) => "",
            (_, MomentumBand::Low) => " (low momentum)",
            (_, MomentumBand::Excellent) => " (excellent momentum)",
            _ => "",
        };
        format!("{} - {}{}", self.stance.label(), self.score_band.label(), suffix)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.verdict())
    }
}

/// Where the engine's view sits against the market's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketCategory {
    StrongFavourite,
    /// Top score at a long price
    DarkHorse,
    Favourite,
    /// High score at a longer price than a favourite
    ValueBet,
    Competitive,
    PotentialOutsider,
    Avoid,
}

impl MarketCategory {
    /// Unparseable odds count as a long price.
    pub fn classify(raw_score: f64, decimal_odds: Option<f64>, favourite_max_odds: f64) -> Self {
        let short = decimal_odds.is_some_and(|odds| odds <= favourite_max_odds);
        if raw_score >= 8.5 {
            if short {
                MarketCategory::StrongFavourite
            } else {
                MarketCategory::DarkHorse
            }
        } else if raw_score >= 7.5 {
            if short {
                MarketCategory::Favourite
            } else {
                MarketCategory::ValueBet
            }
        } else if raw_score >= 6.5 {
            MarketCategory::Competitive
        } else if raw_score >= 5.5 {
            MarketCategory::PotentialOutsider
        } else {
            MarketCategory::Avoid
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarketCategory::StrongFavourite => "Strong favourite",
            MarketCategory::DarkHorse => "Dark horse",
            MarketCategory::Favourite => "Favourite",
            MarketCategory::ValueBet => "Value bet",
            MarketCategory::Competitive => "Competitive",
            MarketCategory::PotentialOutsider => "Potential outsider",
            MarketCategory::Avoid => "Avoid",
        }
    }
}

impl fmt::Display for MarketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(8.5), ScoreBand::Excellent);
        assert_eq!(ScoreBand::from_score(8.49), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(6.5), ScoreBand::Solid);
        assert_eq!(ScoreBand::from_score(5.5), ScoreBand::Average);
        assert_eq!(ScoreBand::from_score(5.49), ScoreBand::Weak);
    }

    #[test]
    fn test_momentum_bands() {
        assert_eq!(MomentumBand::from_index(29.0), MomentumBand::Low);
        assert_eq!(MomentumBand::from_index(30.0), MomentumBand::Moderate);
        assert_eq!(MomentumBand::from_index(60.0), MomentumBand::Moderate);
        assert_eq!(MomentumBand::from_index(61.0), MomentumBand::Good);
        assert_eq!(MomentumBand::from_index(80.0), MomentumBand::Good);
        assert_eq!(MomentumBand::from_index(81.0), MomentumBand::Excellent);
    }

    #[test]
    fn test_low_momentum_split_by_score() {
        assert_eq!(Recommendation::new(9.0, 10.0).stance, Stance::CautiousBet);
        assert_eq!(Recommendation::new(7.8, 10.0).stance, Stance::CautiousBet);
        assert_eq!(Recommendation::new(7.0, 10.0).stance, Stance::Avoid);
        assert_eq!(Recommendation::new(6.0, 10.0).stance, Stance::Avoid);
    }

    #[test]
    fn test_stance_follows_momentum() {
        assert_eq!(Recommendation::new(7.0, 50.0).stance, Stance::ModerateBet);
        assert_eq!(Recommendation::new(7.0, 70.0).stance, Stance::GoodBet);
        assert_eq!(Recommendation::new(7.0, 90.0).stance, Stance::ExcellentBet);
    }

    #[test]
    fn test_weak_score_always_avoid() {
        for momentum in [0.0, 50.0, 70.0, 100.0] {
            assert_eq!(Recommendation::new(4.0, momentum).stance, Stance::Avoid);
        }
    }

    #[test]
    fn test_verdict_text() {
        assert_eq!(
            Recommendation::new(9.0, 10.0).verdict(),
            "Cautious bet - excellent candidate (low momentum)"
        );
        assert_eq!(Recommendation::new(7.0, 70.0).verdict(), "Good bet - solid candidate");
        assert_eq!(
            Recommendation::new(7.8, 100.0).to_string(),
            "Excellent bet - strong candidate (excellent momentum)"
        );
        assert_eq!(Recommendation::new(3.0, 100.0).verdict(), "Avoid - weak candidate");
    }

    #[test]
    fn test_market_categories() {
        assert_eq!(MarketCategory::classify(9.0, Some(3.0), 4.0), MarketCategory::StrongFavourite);
        assert_eq!(MarketCategory::classify(9.0, Some(9.0), 4.0), MarketCategory::DarkHorse);
        assert_eq!(MarketCategory::classify(8.0, Some(4.0), 4.0), MarketCategory::Favourite);
        assert_eq!(MarketCategory::classify(8.0, Some(6.0), 4.0), MarketCategory::ValueBet);
        assert_eq!(MarketCategory::classify(8.0, None, 4.0), MarketCategory::ValueBet);
        assert_eq!(MarketCategory::classify(7.0, Some(2.0), 4.0), MarketCategory::Competitive);
        assert_eq!(MarketCategory::classify(6.0, Some(2.0), 4.0), MarketCategory::PotentialOutsider);
        assert_eq!(MarketCategory::classify(2.0, Some(2.0), 4.0), MarketCategory::Avoid);
    }
}
