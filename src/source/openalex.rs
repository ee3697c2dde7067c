//! `OpenAlex` works source - keyword search over recent open-access papers.
//!
//! Calls `GET {base}/works` with an open-access and publication-date filter,
//! newest first. `OpenAlex` returns abstracts as `abstract_inverted_index`,
//! which [`Work`] keeps for the decoder.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::work::Work;

use super::http_client::{HttpSettings, build_source_http_client};
use super::{FetchRequest, SourceError, WorkSource};

/// Default `OpenAlex` API base URL.
pub const DEFAULT_OPENALEX_BASE_URL: &str = "https://api.openalex.org";

const SOURCE_NAME: &str = "openalex";

/// One page of a `/works` listing.
#[derive(Debug, Deserialize)]
struct WorksPage {
    #[serde(default)]
    results: Vec<Value>,
}

/// Searches `OpenAlex` for recent open-access works.
///
/// When `mailto` is set it is sent as a query parameter, which routes the
/// requests through the `OpenAlex` polite pool.
pub struct OpenAlexSource {
    client: Client,
    base_url: String,
    mailto: Option<String>,
}

impl OpenAlexSource {
    /// Creates a source against the public `OpenAlex` API.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if HTTP client construction fails.
    pub fn new(settings: HttpSettings) -> Result<Self, SourceError> {
        Self::with_base_url(DEFAULT_OPENALEX_BASE_URL, settings)
    }

    /// Creates a source against a custom base URL (mirrors, wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the URL is invalid or HTTP client
    /// construction fails.
    #[tracing::instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn with_base_url(
        base_url: impl AsRef<str>,
        settings: HttpSettings,
    ) -> Result<Self, SourceError> {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| SourceError::InvalidUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        let client = build_source_http_client(SOURCE_NAME, settings)?;
        Ok(Self {
            client,
            base_url,
            mailto: None,
        })
    }

    /// Sets the polite-pool contact address. Blank values are ignored.
    #[must_use]
    pub fn with_mailto(mut self, mailto: Option<String>) -> Self {
        self.mailto = mailto.filter(|m| !m.trim().is_empty());
        self
    }

    /// Builds the `/works` query URL for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidUrl`] if the base URL cannot be joined.
    pub fn works_url(&self, request: &FetchRequest) -> Result<Url, SourceError> {
        let raw = format!("{}/works", self.base_url);
        let mut url = Url::parse(&raw).map_err(|e| SourceError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        let mut filter = format!(
            "open_access.is_oa:true,from_publication_date:{}",
            request.from_date.format("%Y-%m-%d")
        );
        if let Some(id) = &request.topic.id {
            filter.push_str(",concepts.id:");
            filter.push_str(id);
        }

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("filter", &filter)
                .append_pair("search", &request.topic.name)
                .append_pair("sort", "publication_date:desc")
                .append_pair("per-page", &request.per_page.to_string());
            if let Some(mailto) = &self.mailto {
                query.append_pair("mailto", mailto);
            }
        }
        Ok(url)
    }
}

impl std::fmt::Debug for OpenAlexSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAlexSource")
            .field("base_url", &self.base_url)
            .field("mailto", &self.mailto)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WorkSource for OpenAlexSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    #[tracing::instrument(skip(self, request), fields(source = SOURCE_NAME, topic = %request.topic.name))]
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Work>, SourceError> {
        let url = self.works_url(request)?;
        debug!(api_url = %url, "Calling OpenAlex API");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(error = %e, "OpenAlex API request failed");
            SourceError::request(SOURCE_NAME, &e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "OpenAlex API error");
            return Err(SourceError::http_status(SOURCE_NAME, status.as_u16()));
        }

        let page = response.json::<WorksPage>().await.map_err(|e| {
            warn!(error = %e, "Failed to parse OpenAlex response JSON");
            SourceError::decode(SOURCE_NAME, &e.to_string())
        })?;

        let works = works_from_records(page.results, &request.topic.name);
        debug!(works = works.len(), "OpenAlex works fetched");
        Ok(works)
    }
}

/// Converts raw records into works, dropping records that cannot form one.
fn works_from_records(records: Vec<Value>, topic: &str) -> Vec<Work> {
    records
        .into_iter()
        .filter_map(|record| match Work::from_record(record, topic) {
            Ok(work) => Some(work),
            Err(error) => {
                warn!(error = %error, "Skipping unusable OpenAlex record");
                None
            }
        })
        .collect()
}
