mod schema;

pub use schema::{validate_config, Config};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Get the config directory path (~/.config/race-ranker/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("race-ranker"))
}

/// Get the default config file path (~/.config/race-ranker/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/race-ranker/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing default config file is not an error: the built-in defaults apply.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = match path {
        Some(p) => p,
        None => match get_config_path() {
            Ok(p) => p,
            Err(e) => {
                debug!("No default config location ({}), using defaults", e);
                return Ok(Config::default());
            }
        },
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        debug!("No config at {}, using defaults", config_path.display());
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    debug!("Loaded config from {}", config_path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("race-ranker-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let path = temp_path("does-not-exist.yaml");
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_config_from_file() {
        let path = temp_path("config.yaml");
        fs::write(&path, "ranking:\n  favourite_max_odds: 6.0\n").unwrap();
        let config = load_config(Some(path.clone())).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config.ranking.unwrap().favourite_max_odds, Some(6.0));
        assert!(config.scoring.is_none());
    }

    #[test]
    fn test_invalid_yaml_reports_path() {
        let path = temp_path("broken.yaml");
        fs::write(&path, "scoring: [unclosed").unwrap();
        let err = load_config(Some(path.clone())).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(err.to_string().contains("invalid YAML"));
    }

    #[test]
    fn test_config_path_under_home() {
        if let Ok(path) = get_config_path() {
            assert!(path.ends_with(".config/race-ranker/config.yaml"));
        }
    }
}
