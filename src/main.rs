use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use race_ranker::race::{RaceCard, RaceInput};
use race_ranker::RaceAnalyzer;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_INPUT: i32 = 5;
const EXIT_ANALYSIS: i32 = 6;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum OutputFormat {
    /// Ranked table with summary
    #[default]
    Table,
    /// Tab-separated values, no headers
    Tsv,
    /// Full analysis as JSON
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank the entrants of a race card
    Analyze {
        /// Race card file (JSON, or YAML with a .yaml/.yml extension)
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Show the per-factor breakdown of every entrant
        #[arg(short, long)]
        detail: bool,
    },
    /// Print the effective configuration as YAML
    Config,
}

#[derive(Parser, Debug)]
#[command(name = "race-ranker")]
#[command(about = "Multi-factor comparative ranking of race entrants", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/race-ranker/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set up logging: {}", e);
    }
}

/// Read a race card, choosing the parser by file extension
fn read_card(path: &Path) -> Result<RaceCard> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read race card at {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let input: RaceInput = if is_yaml {
        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse race card: invalid YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse race card: invalid JSON in {}", path.display()))?
    };
    Ok(input.into())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();

    // Load config
    let config = match race_ranker::config::load_config(cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate config at startup
    if let Err(errors) = race_ranker::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    match cli.command {
        Commands::Config => match serde_saphyr::to_string(&config.effective()) {
            Ok(yaml) => print!("{}", yaml),
            Err(e) => {
                eprintln!("Failed to render config: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        },
        Commands::Analyze {
            file,
            format,
            detail,
        } => {
            let analyzer =
                match RaceAnalyzer::new(&config.effective_scoring(), &config.effective_ranking()) {
                    Ok(a) => a,
                    Err(e) => {
                        eprintln!("Config error: {:#}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                };

            let card = match read_card(&file) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };
            debug!("Read {} entrants from {}", card.entrants.len(), file.display());

            let analysis = match analyzer.analyze_card(card) {
                Ok(a) => a,
                Err(e) => {
                    eprintln!("Analysis error: {}", e);
                    std::process::exit(EXIT_ANALYSIS);
                }
            };

            let use_colors = race_ranker::output::should_use_colors();
            match format {
                OutputFormat::Table => {
                    println!(
                        "{}",
                        race_ranker::output::format_summary(&analysis, use_colors)
                    );
                    println!();
                    println!(
                        "{}",
                        race_ranker::output::format_ranked_table(&analysis.entrants, use_colors)
                    );
                    if detail {
                        for ranked in &analysis.entrants {
                            println!();
                            println!(
                                "{}",
                                race_ranker::output::format_entrant_detail(ranked, use_colors)
                            );
                        }
                    }
                }
                OutputFormat::Tsv => {
                    println!("{}", race_ranker::output::format_tsv(&analysis.entrants));
                }
                OutputFormat::Json => match race_ranker::output::format_json(&analysis) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Output error: {:#}", e);
                        std::process::exit(EXIT_ANALYSIS);
                    }
                },
            }

            debug!(
                "Analysed {} entrants in {:?}",
                analysis.entrants.len(),
                start_time.elapsed()
            );
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
