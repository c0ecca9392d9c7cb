use super::components::{Factor, MAX_SCORE, MIN_SCORE};
use super::config::{BandEntry, ScoringConfig};
use super::factors::RangeOp;

/// Tolerance on the weight total
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref weights) = config.weights {
        for factor in Factor::ALL {
            let weight = weights.get(factor);
            if !weight.is_finite() || weight < 0.0 {
                errors.push(format!(
                    "scoring.weights.{}: must be a non-negative number, got {}",
                    factor.label().to_lowercase(),
                    weight
                ));
            }
        }
        let sum = weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            errors.push(format!("scoring.weights: must sum to 1.0, got {:.4}", sum));
        }
    }

    if let Some(divisor) = config.rating_divisor {
        if !divisor.is_finite() || divisor <= 0.0 {
            errors.push("scoring.rating_divisor: must be positive".to_string());
        }
    }

    if config.missing_data_threshold == Some(0) {
        errors.push("scoring.missing_data_threshold: must be at least 1".to_string());
    }

    if let Some(ref rosters) = config.rosters {
        for (name, roster) in [("jockeys", &rosters.jockeys), ("trainers", &rosters.trainers)] {
            for (i, fragment) in roster.iter().flatten().enumerate() {
                if fragment.trim().is_empty() {
                    errors.push(format!("scoring.rosters.{}[{}]: must not be blank", name, i));
                }
            }
        }
    }

    if let Some(ref bands) = config.bands {
        let tables = [
            ("odds", &bands.odds),
            ("weight", &bands.weight),
            ("draw", &bands.draw),
            ("age", &bands.age),
        ];
        for (name, table) in tables {
            if let Some(rows) = table {
                validate_bands(name, rows, &mut errors);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_bands(name: &str, rows: &[BandEntry], errors: &mut Vec<String>) {
    if rows.is_empty() {
        errors.push(format!("scoring.bands.{}: must have at least one row", name));
    }
    for (i, row) in rows.iter().enumerate() {
        if let Err(e) = RangeOp::parse(&row.range) {
            errors.push(format!(
                "scoring.bands.{}[{}].range: invalid '{}' - {}",
                name, i, row.range, e
            ));
        }
        if !(MIN_SCORE..=MAX_SCORE).contains(&row.score) {
            errors.push(format!(
                "scoring.bands.{}[{}].score: must be between 0 and 10, got {}",
                name, i, row.score
            ));
        }
    }
}
