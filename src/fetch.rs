use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

use crate::season::{QualifyingResult, RacePage, ResultsRepository, Round, SprintResult};

/// Rows requested per results page.
pub const PAGE_SIZE: usize = 100;

/// Upper bound on pages per season, in case a server ignores the offset.
const MAX_PAGES: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SeasonLoadError {
    #[error("failed to load {season} results (offset {offset}): {source}")]
    Page {
        season: u32,
        offset: usize,
        #[source]
        source: FetchError,
    },
    #[error("server returned the same {season} results page again at offset {offset}")]
    RepeatedPage { season: u32, offset: usize },
    #[error("{season} results did not end after {pages} pages")]
    TooManyPages { season: u32, pages: usize },
}

/// Where season data comes from. The aggregation core never does network IO
/// itself; it is handed whatever a source returns.
#[async_trait]
pub trait ResultsSource: Send + Sync {
    /// One page of race results, `limit` rows starting at `offset`.
    async fn race_page(
        &self,
        season: u32,
        offset: usize,
        limit: usize,
    ) -> Result<RacePage, FetchError>;

    async fn qualifying(&self, season: u32, round: u32)
        -> Result<Vec<QualifyingResult>, FetchError>;

    async fn sprint(&self, season: u32, round: u32) -> Result<Vec<SprintResult>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub page_size: usize,
    pub max_concurrent: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            max_concurrent: 8,
        }
    }
}

/// Fetch and assemble a full season.
///
/// Result pages are requested one after another (each offset depends on the
/// previous page being non-empty) and any page failure aborts the load. A
/// server that keeps answering with the same page, or never sends the empty
/// terminating page, is also an error rather than a season of duplicates.
/// Qualifying and sprint data are then fetched per round with bounded
/// concurrency; a failure there only empties that sub-session.
pub async fn load_season<S>(
    source: &S,
    season: u32,
    options: &LoadOptions,
) -> Result<Vec<Round>, SeasonLoadError>
where
    S: ResultsSource + ?Sized,
{
    let page_size = options.page_size.max(1);
    let mut repo = ResultsRepository::new();
    let mut offset = 0;
    let mut previous: Option<RacePage> = None;
    let mut finished = false;

    for _ in 0..MAX_PAGES {
        let page = source
            .race_page(season, offset, page_size)
            .await
            .map_err(|source| SeasonLoadError::Page {
                season,
                offset,
                source,
            })?;

        if page.is_empty() {
            finished = true;
            break;
        }
        if previous.as_ref() == Some(&page) {
            return Err(SeasonLoadError::RepeatedPage { season, offset });
        }
        debug!(season, offset, races = page.races.len(), "Fetched results page");
        repo.merge_page(page.clone());
        previous = Some(page);
        offset += page_size;
    }

    if !finished {
        return Err(SeasonLoadError::TooManyPages {
            season,
            pages: MAX_PAGES,
        });
    }

    let round_numbers = repo.round_numbers();
    info!(season, rounds = round_numbers.len(), "Merged season results");

    let max_concurrent = options.max_concurrent.max(1);
    let mut pending = round_numbers.into_iter();
    let mut futures = FuturesUnordered::new();

    // Fill initial batch
    for round in pending.by_ref().take(max_concurrent) {
        futures.push(fetch_sub_sessions(source, season, round));
    }

    // Process results and feed new tasks
    while let Some((round, qualifying, sprint)) = futures.next().await {
        repo.attach_qualifying(round, qualifying);
        repo.attach_sprint(round, sprint);

        if let Some(next) = pending.next() {
            futures.push(fetch_sub_sessions(source, season, next));
        }
    }

    Ok(repo.into_ordered_rounds())
}

/// Qualifying and sprint rows for one round; failures degrade to empty lists.
async fn fetch_sub_sessions<S>(
    source: &S,
    season: u32,
    round: u32,
) -> (u32, Vec<QualifyingResult>, Vec<SprintResult>)
where
    S: ResultsSource + ?Sized,
{
    let (qualifying, sprint) =
        tokio::join!(source.qualifying(season, round), source.sprint(season, round));

    let qualifying = qualifying.unwrap_or_else(|e| {
        warn!(season, round, error = %e, "Qualifying unavailable, no pole bonus for this round");
        Vec::new()
    });
    let sprint = sprint.unwrap_or_else(|e| {
        warn!(season, round, error = %e, "Sprint results unavailable, treating as no sprint");
        Vec::new()
    });

    (round, qualifying, sprint)
}
