use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::ranking::{RaceAnalysis, RaceSummary, RankedEntrant, Tier};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a 0-100 total score with one decimal.
/// If fallback is true, appends asterisk to mark the sparse-record positional score
pub fn format_score(score: f64, fallback: bool) -> String {
    if fallback {
        format!("{:.1}*", score)
    } else {
        format!("{:.1}", score)
    }
}

/// Signed adjustment delta, blank when zero
fn format_delta(delta: f64) -> String {
    if delta.abs() < 1e-9 {
        String::new()
    } else {
        format!("{:+.2}", delta)
    }
}

fn paint_tier(tier: Tier, text: &str, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match tier {
        Tier::Elite => text.green().bold().to_string(),
        Tier::Good => text.cyan().to_string(),
        Tier::Average => text.yellow().to_string(),
        Tier::Weak => text.red().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the ranked field as a table: Rank, Score, Delta, Tier, Name, Verdict
/// Rank column: 3 chars (fits "99."), right-aligned
/// Score column is right-aligned, 6 chars wide (fits "100.0*")
pub fn format_ranked_table(entrants: &[RankedEntrant], use_colors: bool) -> String {
    if entrants.is_empty() {
        return "No entrants ranked.".to_string();
    }

    let term_width = get_terminal_width();
    let name_width = entrants
        .iter()
        .map(|e| e.name().chars().count())
        .max()
        .unwrap_or(0);

    let rank_width = 3;
    let score_width = 6;
    let delta_width = 6;
    let tier_width = 7;
    let separator = "  ";

    entrants
        .iter()
        .map(|ranked| {
            let rank_str = format!("{:>2}.", ranked.rank);
            let score_padded = format!(
                "{:>width$}",
                format_score(ranked.total_score, ranked.missing_data_override),
                width = score_width
            );
            let delta_padded = format!(
                "{:>width$}",
                format_delta(ranked.adjustment.delta),
                width = delta_width
            );
            let tier_padded = format!("{:<width$}", ranked.tier.label(), width = tier_width);
            let verdict = ranked.recommendation.verdict();

            let fixed_width = rank_width + 1 + score_width + delta_width + tier_width
                + separator.len() * 4
                + verdict.chars().count();
            let column = match term_width {
                Some(width) if width > fixed_width + 10 => (width - fixed_width).min(name_width),
                // Very narrow terminal, show truncated
                Some(_) => name_width.min(20),
                // No terminal (pipe), don't truncate
                None => name_width,
            };
            let name_padded = format!(
                "{:<width$}",
                truncate_name(ranked.name(), column),
                width = column
            );

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    rank_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    delta_padded.dimmed(),
                    separator,
                    paint_tier(ranked.tier, &tier_padded, use_colors),
                    separator,
                    name_padded,
                    separator,
                    verdict
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}{}{}",
                    rank_str,
                    score_padded,
                    separator,
                    delta_padded,
                    separator,
                    tier_padded,
                    separator,
                    name_padded,
                    separator,
                    verdict
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the ranked field as tab-separated values for scripting
/// Columns: rank, total_score, adjusted_score, tier, name, category, stance (no headers, no colors)
pub fn format_tsv(entrants: &[RankedEntrant]) -> String {
    if entrants.is_empty() {
        return String::new();
    }

    entrants
        .iter()
        .map(|ranked| {
            format!(
                "{}\t{:.1}\t{:.3}\t{}\t{}\t{}\t{}",
                ranked.rank,
                ranked.total_score,
                ranked.adjusted_score,
                ranked.tier,
                ranked.name(),
                ranked.category,
                ranked.recommendation.stance.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The whole analysis as pretty-printed JSON
pub fn format_json(analysis: &RaceAnalysis) -> Result<String> {
    serde_json::to_string_pretty(analysis).context("Failed to serialize analysis")
}

/// Format a single entrant with its score breakdown (for --detail)
pub fn format_entrant_detail(ranked: &RankedEntrant, use_colors: bool) -> String {
    let entrant = &ranked.entrant;
    let field = |value: &Option<String>| value.as_deref().unwrap_or("-").to_string();

    let header = format!("{}. {}", ranked.rank, ranked.name());
    let mut lines = vec![paint_tier(ranked.tier, &header, use_colors)];

    lines.push(format!(
        "  Jockey: {}  Trainer: {}",
        field(&entrant.jockey),
        field(&entrant.trainer)
    ));
    lines.push(format!(
        "  Odds: {}  Weight: {}  Age: {}  OR: {}  Draw: {}  Form: {}",
        field(&entrant.odds),
        field(&entrant.weight),
        field(&entrant.age),
        field(&entrant.official_rating),
        ranked.features.draw,
        field(&entrant.form)
    ));
    lines.push(format!(
        "  Score: {} (raw {:.2}, adjusted {:.2}, {:.0}th percentile)",
        format_score(ranked.total_score, ranked.missing_data_override),
        ranked.raw_score,
        ranked.adjusted_score,
        ranked.percentile
    ));
    lines.push(format!(
        "  Momentum: {:.0}  Consistency: {:.0}  Distance preference: {:.0}",
        ranked.features.form.momentum_index,
        ranked.features.form.consistency_index,
        ranked.features.distance_preference
    ));

    for contribution in &ranked.breakdown {
        lines.push(format!(
            "    {:<9} {:>5.2} x {:.2} = {:.3}",
            contribution.factor.label(),
            contribution.score,
            contribution.weight,
            contribution.contribution
        ));
    }

    for (reason, delta) in &ranked.adjustment.reasons {
        lines.push(format!("    {:<18} {:+.2}", reason.label(), delta));
    }
    if ranked.missing_data_override {
        lines.push("    * sparse record: rating, form and jockey scored by position".to_string());
    }

    lines.push(format!(
        "  {} | {}",
        ranked.recommendation.verdict(),
        ranked.category
    ));
    lines.join("\n")
}

fn name_list(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

/// Race-level summary block
pub fn format_summary(analysis: &RaceAnalysis, use_colors: bool) -> String {
    let summary: &RaceSummary = &analysis.summary;
    let mut lines = Vec::new();

    if let Some(ref title) = analysis.title {
        let heading = match analysis.going {
            Some(ref going) => format!("{} ({})", title, going),
            None => title.clone(),
        };
        lines.push(if use_colors {
            heading.bold().to_string()
        } else {
            heading
        });
    }

    lines.push(format!(
        "{} runners | {} (spread {:.2}) | mean {:.2}, max {:.2}, min {:.2}",
        summary.field_size,
        summary.competitiveness,
        summary.spread,
        summary.mean_score,
        summary.max_score,
        summary.min_score
    ));
    lines.push(format!(
        "Tiers: {}",
        Tier::ALL
            .iter()
            .map(|t| format!("{} {}", t, summary.tiers.count(*t)))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    lines.push(format!("Favourites: {}", name_list(&summary.favourites)));
    lines.push(format!("Outsiders: {}", name_list(&summary.outsiders)));

    let standouts = [
        ("Best jockey", &summary.best_jockey),
        ("Best form", &summary.best_form),
        ("Highest momentum", &summary.highest_momentum),
    ];
    for (label, standout) in standouts {
        if let Some(s) = standout {
            lines.push(format!("{}: {} ({:.1})", label, s.name, s.value));
        }
    }

    if !analysis.dropped.is_empty() {
        lines.push(format!("Not scored: {}", analysis.dropped.join(", ")));
    }

    let strategy = format!("Strategy: {}", summary.strategy);
    lines.push(if use_colors {
        strategy.bold().to_string()
    } else {
        strategy
    });
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::race::Entrant;
    use crate::ranking::RaceAnalyzer;

    fn runner(name: &str, form: &str, rating: &str) -> Entrant {
        Entrant {
            name: name.to_string(),
            jockey: Some("A Smith".to_string()),
            trainer: Some("B Jones".to_string()),
            odds: Some("5/1".to_string()),
            weight: Some("9-0".to_string()),
            age: Some("5".to_string()),
            form: Some(form.to_string()),
            official_rating: Some(rating.to_string()),
            ..Default::default()
        }
    }

    fn sample_analysis() -> RaceAnalysis {
        RaceAnalyzer::with_defaults()
            .analyze(vec![
                runner("Earl Of Rochester", "11234", "95"),
                runner("Hypnotysed", "31242", "82"),
                Entrant::new("Mystery"),
            ])
            .unwrap()
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(74.6, false), "74.6");
        assert_eq!(format_score(100.0, false), "100.0");
        assert_eq!(format_score(0.0, false), "0.0");
    }

    #[test]
    fn test_format_score_with_fallback() {
        assert_eq!(format_score(62.3, true), "62.3*");
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(0.0), "");
        assert_eq!(format_delta(0.35), "+0.35");
        assert_eq!(format_delta(-0.1), "-0.10");
    }

    // truncate_name tests
    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("Hypnotysed", 20), "Hypnotysed");
    }

    #[test]
    fn test_truncate_name_exact() {
        assert_eq!(truncate_name("Exact", 5), "Exact");
    }

    #[test]
    fn test_truncate_name_long() {
        assert_eq!(truncate_name("Earl Of Rochester", 10), "Earl Of...");
    }

    #[test]
    fn test_truncate_name_unicode() {
        assert_eq!(truncate_name("Écurie Dorée", 12), "Écurie Dorée");
        assert_eq!(truncate_name("Écurie Dorée Royale", 10), "Écurie ...");
    }

    #[test]
    fn test_truncate_name_very_narrow() {
        assert_eq!(truncate_name("Hypnotysed", 3), "Hyp");
    }

    #[test]
    fn test_format_ranked_table_empty() {
        assert_eq!(format_ranked_table(&[], false), "No entrants ranked.");
    }

    #[test]
    fn test_format_ranked_table_rows() {
        let analysis = sample_analysis();
        let result = format_ranked_table(&analysis.entrants, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(" 1."));
        assert!(lines[1].starts_with(" 2."));
        assert!(lines[2].starts_with(" 3."));
        assert!(result.contains("Earl Of Rochester"));
        assert!(result.contains("Elite"));
        // Sparse record is flagged
        let mystery = lines.iter().find(|l| l.contains("Mystery")).unwrap();
        assert!(mystery.contains('*'));
    }

    #[test]
    fn test_format_tsv() {
        let analysis = sample_analysis();
        let result = format_tsv(&analysis.entrants);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].split('\t').count(), 7);
        assert!(lines[0].starts_with("1\t"));
        assert!(lines[2].starts_with("3\t"));
    }

    #[test]
    fn test_format_tsv_empty() {
        assert_eq!(format_tsv(&[]), "");
    }

    #[test]
    fn test_format_json_roundtrips_as_value() {
        let analysis = sample_analysis();
        let json = format_json(&analysis).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["entrants"].as_array().unwrap().len(), 3);
        assert_eq!(value["entrants"][0]["rank"], 1);
        assert!(value["summary"]["strategy"].is_string());
        assert_eq!(value["entrants"][0]["components"].as_object().unwrap().len(), 11);
    }

    #[test]
    fn test_format_entrant_detail() {
        let analysis = sample_analysis();
        let result = format_entrant_detail(&analysis.entrants[0], false);
        assert!(result.starts_with("1. "));
        assert!(result.contains("Jockey: A Smith"));
        assert!(result.contains("Form: 11234") || result.contains("Form: 31242"));
        assert!(result.contains("Rating"));
        assert!(result.contains("Momentum"));
    }

    #[test]
    fn test_format_summary() {
        let mut analysis = sample_analysis();
        analysis.title = Some("Southwell 15:37".to_string());
        analysis.going = Some("Standard".to_string());
        let result = format_summary(&analysis, false);
        assert!(result.starts_with("Southwell 15:37 (Standard)"));
        assert!(result.contains("3 runners"));
        assert!(result.contains("Tiers: Elite"));
        assert!(result.contains("Strategy: Main pick:"));
    }
}
