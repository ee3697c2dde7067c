//! Error types for catalog fetch operations.
//!
//! Messages follow the What/Why/Fix layout used across the crate. Every
//! variant is fatal for the run: the pipeline does not retry fetches.

use thiserror::Error;

/// Errors that can occur while fetching works from a catalog.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The HTTP client could not be constructed
    #[error("cannot build HTTP client for {source_name}: {reason}")]
    ClientBuild {
        /// Catalog the client was for
        source_name: String,
        /// Underlying construction failure
        reason: String,
    },

    /// The configured base URL is not a valid URL
    #[error("invalid catalog URL '{url}': {reason}\n  Suggestion: Check `api_base_url` in the config file")]
    InvalidUrl {
        /// The offending URL
        url: String,
        /// Why parsing failed
        reason: String,
    },

    /// The request never produced a response
    #[error("request to {source_name} failed: {reason}\n  Suggestion: {suggestion}")]
    Request {
        /// Catalog that was called
        source_name: String,
        /// Transport-level failure
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// The catalog answered with a non-success status
    #[error("{source_name} returned HTTP {status}: {reason}\n  Suggestion: {suggestion}")]
    HttpStatus {
        /// Catalog that was called
        source_name: String,
        /// HTTP status code
        status: u16,
        /// Human-readable reason
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },

    /// The response body did not have the expected shape
    #[error("unexpected {source_name} response: {reason}")]
    Decode {
        /// Catalog that was called
        source_name: String,
        /// Decoding failure
        reason: String,
    },
}

impl SourceError {
    /// Creates a `Request` error for a transport failure.
    #[must_use]
    pub fn request(source_name: &str, reason: &str) -> Self {
        Self::Request {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
            suggestion: "Check your network connection and try again".to_string(),
        }
    }

    /// Creates an `HttpStatus` error with a status-specific reason.
    #[must_use]
    pub fn http_status(source_name: &str, status: u16) -> Self {
        let (reason, suggestion) = match status {
            400 => (
                "request rejected",
                "Check the topic id and filters in the configuration",
            ),
            403 => ("access denied", "Set `mailto` to use the polite pool"),
            429 => (
                "rate limit exceeded",
                "Wait a few seconds before running again",
            ),
            s if s >= 500 => ("catalog unavailable", "Try again later"),
            _ => ("unexpected status", "Check the catalog status page"),
        };
        Self::HttpStatus {
            source_name: source_name.to_string(),
            status,
            reason: reason.to_string(),
            suggestion: suggestion.to_string(),
        }
    }

    /// Creates a `Decode` error.
    #[must_use]
    pub fn decode(source_name: &str, reason: &str) -> Self {
        Self::Decode {
            source_name: source_name.to_string(),
            reason: reason.to_string(),
        }
    }
}
