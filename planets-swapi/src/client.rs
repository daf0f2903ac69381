//! SWAPI client implementation.
//!
//! Follows the `next` links of the paginated `/planets/` listing until the
//! source runs out of pages. Ingestion is all-or-nothing: any failing page
//! discards everything fetched so far.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use planets_core::constants::{
    DEFAULT_MAX_PAGES, DEFAULT_SOURCE_TIMEOUT_SECONDS, SWAPI_BASE_URL, SWAPI_PLANETS_ROOT,
};
use planets_core::error::{PlanetsError, Result};
use planets_core::traits::PlanetSource;
use planets_core::types::{AppearanceIndex, ExternalRecord, PageEnvelope};

/// SWAPI client configuration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SwapiConfig {
    /// Base address every path is resolved against (e.g. "https://swapi.dev/api")
    pub base_url: String,
    /// Path of the first page
    pub root_path: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Upper bound on pages followed in one pass
    pub max_pages: usize,
}

impl Default for SwapiConfig {
    fn default() -> Self {
        Self {
            base_url: SWAPI_BASE_URL.into(),
            root_path: SWAPI_PLANETS_ROOT.into(),
            timeout_seconds: DEFAULT_SOURCE_TIMEOUT_SECONDS,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl SwapiConfig {
    /// Creates config pointing at another base address (mirrors, test servers).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Overrides the page bound.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// Client for the paginated SWAPI planets listing.
pub struct SwapiClient {
    config: SwapiConfig,
    base: Url,
    http_client: reqwest::Client,
}

impl SwapiClient {
    /// Creates a client for the public SWAPI.
    pub fn new() -> Result<Self> {
        Self::with_config(SwapiConfig::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: SwapiConfig) -> Result<Self> {
        let base = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| PlanetsError::ConfigError(format!("invalid source base url: {e}")))?;

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| PlanetsError::ConfigError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            base,
            http_client,
        })
    }

    /// Fetches one page. `cursor` is a path relative to the base address.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, cursor: &str) -> Result<PageEnvelope<ExternalRecord>> {
        let url = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            with_leading_slash(cursor)
        );

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| PlanetsError::SourceUnavailable(format!("GET {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(PlanetsError::SourceUnavailable(format!(
                "GET {url} returned HTTP {}",
                response.status()
            )));
        }

        let page: SwapiPage = response
            .json()
            .await
            .map_err(|e| PlanetsError::SourceUnavailable(format!("malformed page at {url}: {e}")))?;

        let items: Vec<ExternalRecord> = page
            .results
            .unwrap_or_default()
            .into_iter()
            .map(SwapiPlanet::into_record)
            .collect();

        let next_cursor = match page.next.as_deref().map(str::trim) {
            Some(next) if !next.is_empty() => Some(self.normalize_cursor(next)?),
            _ => None,
        };

        debug!(cursor, items = items.len(), next = ?next_cursor, count = ?page.count, "Fetched page");
        Ok(PageEnvelope { items, next_cursor })
    }

    /// Fetches every planet and indexes film appearance counts by name.
    pub async fn index_planet_appearances(&self) -> Result<AppearanceIndex> {
        let records = self.fetch_all().await?;
        Ok(AppearanceIndex::from_records(&records))
    }

    /// Turns a source-supplied cursor into a path this client can reissue.
    ///
    /// The source may echo absolute links; those must live under the configured
    /// base address (scheme aside) or they are rejected.
    pub(crate) fn normalize_cursor(&self, raw: &str) -> Result<String> {
        let base = self.config.base_url.trim_end_matches('/');
        if let Some(rest) = raw.strip_prefix(base) {
            if rest.is_empty() || rest.starts_with('/') || rest.starts_with('?') {
                return Ok(with_leading_slash(rest));
            }
        }

        match Url::parse(raw) {
            Ok(url) => {
                // A scheme switch (http <-> https) changes the default port too.
                let same_host = url.host_str() == self.base.host_str();
                let same_port = url.scheme() != self.base.scheme()
                    || url.port_or_known_default() == self.base.port_or_known_default();
                if !(same_host && same_port) {
                    return Err(PlanetsError::SourceUnavailable(format!(
                        "cursor '{raw}' points outside the source"
                    )));
                }

                let base_path = self.base.path().trim_end_matches('/');
                let path = url.path();
                let relative = match path.strip_prefix(base_path) {
                    Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
                    _ => {
                        return Err(PlanetsError::SourceUnavailable(format!(
                            "cursor '{raw}' points outside the source"
                        )))
                    }
                };

                let mut cursor = with_leading_slash(relative);
                if let Some(query) = url.query() {
                    cursor.push('?');
                    cursor.push_str(query);
                }
                Ok(cursor)
            }
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(with_leading_slash(raw)),
            Err(e) => Err(PlanetsError::SourceUnavailable(format!(
                "unparseable cursor '{raw}': {e}"
            ))),
        }
    }
}

#[async_trait]
impl PlanetSource for SwapiClient {
    #[instrument(skip(self), fields(base_url = %self.config.base_url))]
    async fn fetch_all(&self) -> Result<Vec<ExternalRecord>> {
        let mut records = Vec::new();
        let mut visited = HashSet::new();
        let mut pages = 0usize;
        let mut cursor = Some(with_leading_slash(&self.config.root_path));

        while let Some(path) = cursor.take() {
            if !visited.insert(path.clone()) {
                warn!(cursor = %path, "Source repeated a cursor, ending traversal");
                break;
            }
            if pages >= self.config.max_pages {
                return Err(PlanetsError::SourceUnavailable(format!(
                    "more than {} pages, refusing to continue",
                    self.config.max_pages
                )));
            }

            let page = self.fetch_page(&path).await?;
            pages += 1;

            if page.items.is_empty() {
                break;
            }
            records.extend(page.items);
            cursor = page.next_cursor;
        }

        info!(pages, records = records.len(), "Fetched planets from source");
        Ok(records)
    }
}

fn with_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

#[derive(Debug, Deserialize)]
struct SwapiPage {
    count: Option<u64>,
    next: Option<String>,
    results: Option<Vec<SwapiPlanet>>,
}

#[derive(Debug, Deserialize)]
struct SwapiPlanet {
    name: String,
    films: Option<Vec<String>>,
}

impl SwapiPlanet {
    fn into_record(self) -> ExternalRecord {
        let films = self.films.map_or(0, |f| f.len());
        ExternalRecord::new(self.name, u32::try_from(films).unwrap_or(u32::MAX))
    }
}
