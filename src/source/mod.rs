//! Catalog sources that supply candidate works.
//!
//! - [`WorkSource`] - Async trait every catalog implements
//! - [`FetchRequest`] - Topic, lookback window and page size for one fetch
//! - [`OpenAlexSource`] - `OpenAlex` `/works` search
//!
//! Fetch failures are fatal for the run; sources do not retry.

mod error;
mod http_client;
mod openalex;

pub use error::SourceError;
pub use http_client::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_READ_TIMEOUT_SECS, HttpSettings,
    build_source_http_client,
};
pub use openalex::{DEFAULT_OPENALEX_BASE_URL, OpenAlexSource};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::topics::Topic;
use crate::work::Work;

/// Parameters of a single catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Topic to search for.
    pub topic: Topic,
    /// Earliest publication date to include.
    pub from_date: NaiveDate,
    /// Maximum number of works to return.
    pub per_page: u8,
}

/// A catalog that can be searched for recent open-access works.
#[async_trait]
pub trait WorkSource: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Fetches works for `request.topic`, newest first.
    ///
    /// Every returned [`Work`] has `topic` set to the request's topic name.
    /// Records that cannot form a work are dropped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failures, non-success statuses
    /// and undecodable responses.
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Work>, SourceError>;
}
