//! HTTP catalog source for TMDB-style popular listings.
//!
//! Requests `GET {base_url}{endpoint}?page=N` and decodes
//! `{ page, total_pages, results: [{ id, name, poster_path }] }`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::CatalogConfig;

use super::cursor::PageCursor;
use super::error::FetchError;
use super::source::CatalogSource;
use super::types::{FetchResult, Item};

/// Catalog source backed by a JSON HTTP API.
pub struct HttpCatalog {
    client: Client,
    config: CatalogConfig,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    page: u32,
    total_pages: u32,
    #[serde(default)]
    results: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    id: RawId,
    #[serde(alias = "title")]
    name: String,
    #[serde(default)]
    poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

impl HttpCatalog {
    /// Create a new HttpCatalog from config.
    pub fn new(config: CatalogConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .build()
            .map_err(|e| FetchError::Other(format!("failed to build HTTP client: {e}")))?;
        let api_key = config.resolved_api_key();

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Build the request URL for a page token.
    fn page_url(&self, page: u32) -> Result<Url, FetchError> {
        let raw = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.endpoint.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| FetchError::Other(format!("invalid catalog url '{raw}': {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("page", &page.to_string());
            if let Some(key) = &self.api_key {
                query.append_pair("api_key", key);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_page(&self, cursor: PageCursor) -> Result<FetchResult, FetchError> {
        let Some(page) = cursor.token() else {
            return Ok(FetchResult::exhausted());
        };
        let url = self.page_url(page)?;

        tracing::debug!(
            base_url = %self.config.base_url,
            endpoint = %self.config.endpoint,
            page,
            "Requesting catalog page"
        );

        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            tracing::warn!(status = %status, page, "Catalog API error");
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        tracing::debug!(
            page,
            bytes = body.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Catalog page received"
        );
        decode_page(&body, &self.config.image_base_url)
    }
}

/// Decode a listing page.
///
/// Results without a poster are skipped since every item needs an image.
pub(crate) fn decode_page(body: &[u8], image_base_url: &str) -> Result<FetchResult, FetchError> {
    let response: PageResponse = serde_json::from_slice(body)?;
    if response.page == 0 {
        return Err(FetchError::Decoding(
            "page numbers start at 1, got 0".to_string(),
        ));
    }

    let mut items = Vec::with_capacity(response.results.len());
    for raw in response.results {
        let Some(poster_path) = raw.poster_path else {
            tracing::trace!(title = %raw.name, "Skipping catalog entry without poster");
            continue;
        };
        let image_url = image_url(image_base_url, &poster_path)?;
        items.push(Item::new(raw.id.into_string(), raw.name, image_url));
    }

    let next_cursor = if response.page < response.total_pages {
        PageCursor::Page(response.page + 1)
    } else {
        PageCursor::NoMore
    };

    Ok(FetchResult::new(items, next_cursor))
}

fn image_url(base: &str, path: &str) -> Result<Url, FetchError> {
    let raw = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&raw).map_err(|e| FetchError::Decoding(format!("invalid image url '{raw}': {e}")))
}
