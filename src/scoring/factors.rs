use anyhow::{bail, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeOp {
    LessThan(f64),
    LessEqual(f64),
    GreaterThan(f64),
    GreaterEqual(f64),
    Equal(f64),
    Between(f64, f64), // Inclusive range: N-M
}

impl RangeOp {
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(val) = s.strip_prefix(">=") {
            Ok(RangeOp::GreaterEqual(parse_bound(val)?))
        } else if let Some(val) = s.strip_prefix("<=") {
            Ok(RangeOp::LessEqual(parse_bound(val)?))
        } else if let Some(val) = s.strip_prefix('>') {
            Ok(RangeOp::GreaterThan(parse_bound(val)?))
        } else if let Some(val) = s.strip_prefix('<') {
            Ok(RangeOp::LessThan(parse_bound(val)?))
        } else if s.contains('-') && !s.starts_with('-') {
            // Range format: "3-8"
            let parts: Vec<&str> = s.split('-').collect();
            if parts.len() == 2 {
                let low = parse_bound(parts[0])?;
                let high = parse_bound(parts[1])?;
                if low > high {
                    bail!("Range start is above its end: {}", s)
                }
                Ok(RangeOp::Between(low, high))
            } else {
                bail!("Invalid range format: {}", s)
            }
        } else {
            Ok(RangeOp::Equal(parse_bound(s)?))
        }
    }

    pub fn matches(&self, value: f64) -> bool {
        match *self {
            RangeOp::LessThan(n) => value < n,
            RangeOp::LessEqual(n) => value <= n,
            RangeOp::GreaterThan(n) => value > n,
            RangeOp::GreaterEqual(n) => value >= n,
            RangeOp::Equal(n) => value == n,
            RangeOp::Between(low, high) => value >= low && value <= high,
        }
    }
}

impl fmt::Display for RangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeOp::LessThan(n) => write!(f, "<{}", n),
            RangeOp::LessEqual(n) => write!(f, "<={}", n),
            RangeOp::GreaterThan(n) => write!(f, ">{}", n),
            RangeOp::GreaterEqual(n) => write!(f, ">={}", n),
            RangeOp::Equal(n) => write!(f, "{}", n),
            RangeOp::Between(low, high) => write!(f, "{}-{}", low, high),
        }
    }
}

fn parse_bound(s: &str) -> Result<f64> {
    let value: f64 = s.trim().parse()?;
    if !value.is_finite() {
        bail!("Range bound must be finite: {}", s.trim())
    }
    Ok(value)
}

/// One row of an ordered threshold table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub range: RangeOp,
    pub score: f64,
}

impl Band {
    pub const fn new(range: RangeOp, score: f64) -> Self {
        Self { range, score }
    }

    pub fn parse(range: &str, score: f64) -> Result<Self> {
        Ok(Self::new(RangeOp::parse(range)?, score))
    }
}

/// Score of the first band whose range contains `value`.
///
/// Every banded factor goes through here: tables are ordered, so overlapping
/// ranges like `<=120` then `<=126` read as successive brackets.
pub fn band_lookup(bands: &[Band], value: f64) -> Option<f64> {
    bands
        .iter()
        .find(|band| band.range.matches(value))
        .map(|band| band.score)
}

/// `band_lookup` with a neutral fallback for unparsed input or no match
pub fn band_score(bands: &[Band], value: Option<f64>, neutral: f64) -> f64 {
    value
        .filter(|v| v.is_finite())
        .and_then(|v| band_lookup(bands, v))
        .unwrap_or(neutral)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range_less_than() {
        let range = RangeOp::parse("<100").unwrap();
        assert!(range.matches(50.0));
        assert!(!range.matches(100.0));
        assert!(!range.matches(150.0));
    }

    #[test]
    fn test_parse_range_less_equal() {
        let range = RangeOp::parse("<=2").unwrap();
        assert!(range.matches(2.0));
        assert!(range.matches(1.5));
        assert!(!range.matches(2.01));
    }

    #[test]
    fn test_parse_range_greater_than() {
        let range = RangeOp::parse(">20").unwrap();
        assert!(!range.matches(20.0));
        assert!(range.matches(20.5));
    }

    #[test]
    fn test_parse_range_greater_equal() {
        let range = RangeOp::parse(">=12").unwrap();
        assert!(!range.matches(11.0));
        assert!(range.matches(12.0));
    }

    #[test]
    fn test_parse_range_equal() {
        let range = RangeOp::parse("3").unwrap();
        assert!(range.matches(3.0));
        assert!(!range.matches(4.0));
    }

    #[test]
    fn test_parse_range_between() {
        let range = RangeOp::parse("3-8").unwrap();
        assert!(!range.matches(2.0));
        assert!(range.matches(3.0));
        assert!(range.matches(5.5));
        assert!(range.matches(8.0));
        assert!(!range.matches(9.0));
    }

    #[test]
    fn test_parse_range_negative_equal() {
        let range = RangeOp::parse("-5").unwrap();
        assert!(range.matches(-5.0));
    }

    #[test]
    fn test_parse_range_rejects_garbage() {
        assert!(RangeOp::parse("abc").is_err());
        assert!(RangeOp::parse("1-2-3").is_err());
        assert!(RangeOp::parse("8-3").is_err());
        assert!(RangeOp::parse(">=inf").is_err());
    }

    #[test]
    fn test_range_display_roundtrips() {
        for s in ["<100", "<=2", ">20", ">=12", "3", "3-8"] {
            let range = RangeOp::parse(s).unwrap();
            assert_eq!(range.to_string(), s);
        }
    }

    #[test]
    fn test_band_lookup_first_match_wins() {
        let bands = [
            Band::new(RangeOp::LessEqual(120.0), 10.0),
            Band::new(RangeOp::LessEqual(126.0), 9.0),
        ];
        assert_eq!(band_lookup(&bands, 110.0), Some(10.0));
        assert_eq!(band_lookup(&bands, 124.0), Some(9.0));
        assert_eq!(band_lookup(&bands, 130.0), None);
    }

    #[test]
    fn test_band_score_neutral_fallback() {
        let bands = [Band::new(RangeOp::Between(3.0, 8.0), 8.0)];
        assert_eq!(band_score(&bands, Some(5.0), 7.0), 8.0);
        assert_eq!(band_score(&bands, Some(12.0), 7.0), 7.0);
        assert_eq!(band_score(&bands, None, 7.0), 7.0);
        assert_eq!(band_score(&bands, Some(f64::NAN), 7.0), 7.0);
    }
}
