mod init;
mod schema;

pub use init::run_init_wizard;
pub use schema::{Config, DEFAULT_MAX_CONCURRENT_REQUESTS, DEFAULT_REQUEST_TIMEOUT};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::scoring::{validate_scoring, ScoringConfig};
use crate::season::{current_season, FIRST_SEASON};

/// Config directory (~/.config/gridpoints/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("gridpoints"))
}

/// Default config file path (~/.config/gridpoints/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Load configuration from a YAML file.
///
/// With `path` unset the default location is used, and a missing file there
/// just means "all defaults". An explicitly given path must exist.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path()?, false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        tracing::debug!(path = %config_path.display(), "No config file, using defaults");
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    parse_config(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))
}

pub fn parse_config(content: &str) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_saphyr::from_str(content)?;
    Ok(config)
}

/// Check the loaded values, collecting every problem.
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(season) = config.season {
        let latest = current_season();
        if !(FIRST_SEASON..=latest).contains(&season) {
            errors.push(format!(
                "season: {} is outside {}..={}",
                season, FIRST_SEASON, latest
            ));
        }
    }

    if let Err(e) = config.request_timeout() {
        errors.push(format!(
            "request_timeout: '{}' is not a duration ({})",
            config.request_timeout, e
        ));
    }

    match (config.request_timeout(), config.load_timeout()) {
        (_, Err(e)) => errors.push(format!(
            "load_timeout: '{}' is not a duration ({})",
            config.load_timeout, e
        )),
        (Ok(request), Ok(load)) if load < request => errors.push(format!(
            "load_timeout: '{}' is shorter than request_timeout '{}'",
            config.load_timeout, config.request_timeout
        )),
        _ => {}
    }

    if config.max_concurrent_requests == 0 {
        errors.push("max_concurrent_requests: must be at least 1".to_string());
    }

    if !config.api_base_url.starts_with("http://") && !config.api_base_url.starts_with("https://") {
        errors.push(format!(
            "api_base_url: '{}' must start with http:// or https://",
            config.api_base_url
        ));
    }

    if let Some(scoring) = &config.scoring {
        if let Err(scoring_errors) = validate_scoring(scoring) {
            errors.extend(scoring_errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Write the whole config atomically.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    ensure_parent_dir(path)?;

    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Persist `scoring` into the config at `path`, keeping the other settings.
/// Returns the path written.
pub fn save_scoring(path: Option<PathBuf>, scoring: &ScoringConfig) -> Result<PathBuf> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    let mut config = if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;
        parse_config(&content)?
    } else {
        Config::default()
    };

    config.scoring = if scoring.is_customized() {
        Some(scoring.clone())
    } else {
        None
    };
    save_config(&config_path, &config)?;
    tracing::info!(path = %config_path.display(), "Saved scoring scheme");
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Session;
    use std::env;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("gridpoints_test_{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let path = temp_path("does_not_exist.yaml");
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_parse_empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
        assert_eq!(parse_config("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = parse_config(
            "season: 1900\nrequest_timeout: soon\nmax_concurrent_requests: 0\napi_base_url: ftp://x\nscoring:\n  race: { 0: 3 }\n",
        )
        .unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5, "{:?}", errors);
        assert!(errors[0].starts_with("season"));
        assert!(errors.iter().any(|e| e.starts_with("scoring.race")));
    }

    #[test]
    fn test_load_timeout_must_cover_a_request() {
        let config = parse_config("request_timeout: 30s\nload_timeout: 10s\n").unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1, "{:?}", errors);
        assert!(errors[0].starts_with("load_timeout"));

        let config = parse_config("load_timeout: later\n").unwrap();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_default_ok() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_save_scoring_keeps_other_settings() {
        let path = temp_path("save_scoring.yaml");
        let _ = fs::remove_file(&path);
        let base = Config {
            season: Some(2012),
            request_timeout: "45s".to_string(),
            ..Config::default()
        };
        save_config(&path, &base).unwrap();

        let mut scoring = ScoringConfig::official();
        scoring.set_points(1, Session::Race, 50).unwrap();
        scoring.set_pole_bonus(3);
        save_scoring(Some(path.clone()), &scoring).unwrap();

        let loaded = load_config(Some(path.clone())).unwrap();
        assert_eq!(loaded.season, Some(2012));
        assert_eq!(loaded.request_timeout, "45s");
        let saved = loaded.scoring.unwrap();
        assert_eq!(saved.points_for(1, Session::Race), 50);
        assert_eq!(saved.pole_bonus(), 3);

        // Saving the official scheme clears the override.
        save_scoring(Some(path.clone()), &ScoringConfig::official()).unwrap();
        assert!(load_config(Some(path.clone())).unwrap().scoring.is_none());

        let _ = fs::remove_file(&path);
    }
}
