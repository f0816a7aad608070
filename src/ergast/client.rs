use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::types::Envelope;
use crate::fetch::{FetchError, ResultsSource};
use crate::season::{QualifyingResult, RacePage, SprintResult};

/// Public Ergast-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";

/// URL layout of the API
#[derive(Debug, Clone)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn results_url(&self, season: u32, offset: usize, limit: usize) -> String {
        format!(
            "{}/{}/results.json?limit={}&offset={}",
            self.base_url, season, limit, offset
        )
    }

    pub fn qualifying_url(&self, season: u32, round: u32) -> String {
        format!("{}/{}/{}/qualifying.json", self.base_url, season, round)
    }

    pub fn sprint_url(&self, season: u32, round: u32) -> String {
        format!("{}/{}/{}/sprint.json", self.base_url, season, round)
    }
}

/// HTTP implementation of [`ResultsSource`].
#[derive(Clone)]
pub struct ErgastClient {
    http: Client,
    endpoints: Endpoints,
}

impl ErgastClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gridpoints/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            endpoints: Endpoints::new(base_url),
        })
    }

    async fn get_envelope(&self, url: String) -> Result<Envelope, FetchError> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            url,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ResultsSource for ErgastClient {
    async fn race_page(
        &self,
        season: u32,
        offset: usize,
        limit: usize,
    ) -> Result<RacePage, FetchError> {
        let url = self.endpoints.results_url(season, offset, limit);
        self.get_envelope(url.clone())
            .await?
            .into_page()
            .map_err(|message| FetchError::Decode { url, message })
    }

    async fn qualifying(
        &self,
        season: u32,
        round: u32,
    ) -> Result<Vec<QualifyingResult>, FetchError> {
        let url = self.endpoints.qualifying_url(season, round);
        Ok(self.get_envelope(url).await?.into_qualifying())
    }

    async fn sprint(&self, season: u32, round: u32) -> Result<Vec<SprintResult>, FetchError> {
        let url = self.endpoints.sprint_url(season, round);
        Ok(self.get_envelope(url).await?.into_sprint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let endpoints = Endpoints::new(DEFAULT_BASE_URL);
        assert_eq!(
            endpoints.results_url(2024, 200, 100),
            "https://api.jolpi.ca/ergast/f1/2024/results.json?limit=100&offset=200"
        );
        assert_eq!(
            endpoints.qualifying_url(2024, 7),
            "https://api.jolpi.ca/ergast/f1/2024/7/qualifying.json"
        );
        assert_eq!(
            endpoints.sprint_url(2023, 12),
            "https://api.jolpi.ca/ergast/f1/2023/12/sprint.json"
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let endpoints = Endpoints::new("http://localhost:8000/f1/");
        assert_eq!(
            endpoints.sprint_url(2021, 1),
            "http://localhost:8000/f1/2021/1/sprint.json"
        );
    }
}
