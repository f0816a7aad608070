use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ergast::DEFAULT_BASE_URL;
use crate::fetch::{LoadOptions, PAGE_SIZE};
use crate::scoring::ScoringConfig;
use crate::standings::ProgressionPolicy;

pub const DEFAULT_REQUEST_TIMEOUT: &str = "20s";
pub const DEFAULT_LOAD_TIMEOUT: &str = "3m";
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 8;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Season opened at startup; the current year when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Human-readable duration, e.g. "20s" or "1m"
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
    /// Budget for a whole season load in the TUI (every page and round)
    #[serde(default = "default_load_timeout")]
    pub load_timeout: String,
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    #[serde(default)]
    pub progression: ProgressionPolicy,
    /// Custom scheme; the official one is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> String {
    DEFAULT_REQUEST_TIMEOUT.to_string()
}

fn default_load_timeout() -> String {
    DEFAULT_LOAD_TIMEOUT.to_string()
}

fn default_max_concurrent_requests() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            season: None,
            api_base_url: default_api_base_url(),
            request_timeout: default_request_timeout(),
            load_timeout: default_load_timeout(),
            max_concurrent_requests: default_max_concurrent_requests(),
            progression: ProgressionPolicy::default(),
            scoring: None,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(&self.request_timeout)
    }

    pub fn load_timeout(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(&self.load_timeout)
    }

    /// Scheme to start editing from.
    pub fn scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            page_size: PAGE_SIZE,
            max_concurrent: self.max_concurrent_requests.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(20));
        assert_eq!(config.load_timeout().unwrap(), Duration::from_secs(180));
        assert_eq!(config.scoring(), ScoringConfig::official());
        assert_eq!(config.load_options().max_concurrent, 8);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
season: 2021
api_base_url: "http://localhost:8000/ergast/f1"
request_timeout: "1m"
load_timeout: "10m"
max_concurrent_requests: 2
progression: zero_padded
scoring:
  race: { 1: 10, 2: 6, 3: 4 }
  pole_bonus: 1
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.season, Some(2021));
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(60));
        assert_eq!(config.load_timeout().unwrap(), Duration::from_secs(600));
        assert!(config.load_timeout().unwrap() > config.request_timeout().unwrap());
        assert_eq!(config.progression, ProgressionPolicy::ZeroPadded);
        let scoring = config.scoring();
        assert_eq!(scoring.pole_bonus(), 1);
        assert_eq!(scoring.points_for(2, crate::scoring::Session::Race), 6);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Config, _> = serde_saphyr::from_str("queries: []");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_concurrency_clamped() {
        let config = Config {
            max_concurrent_requests: 0,
            ..Config::default()
        };
        assert_eq!(config.load_options().max_concurrent, 1);
    }
}
