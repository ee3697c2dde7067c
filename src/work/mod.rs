//! Candidate works discovered in the catalog.
//!
//! A [`Work`] is built fresh from one raw catalog record per fetch and is
//! never persisted itself; only the post written downstream survives a run.

mod abstract_index;

pub use abstract_index::{InvertedIndex, decode_abstract};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Errors produced when turning a raw catalog record into a [`Work`].
#[derive(Debug, Error)]
pub enum WorkError {
    /// The record carries neither a DOI nor a source identifier
    #[error(
        "work record has no identifier: {preview}\n  Suggestion: Records need a `doi` or an `id` field to be tracked as published"
    )]
    MissingIdentifier {
        /// Shortened title or record text for display
        preview: String,
    },

    /// The record does not have the expected shape
    #[error("malformed work record: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Fields read from an `OpenAlex`-shaped work record.
#[derive(Debug, Deserialize)]
struct WorkRecord {
    id: Option<String>,
    doi: Option<String>,
    title: Option<String>,
    display_name: Option<String>,
    publication_date: Option<String>,
    abstract_inverted_index: Option<InvertedIndex>,
}

/// A discovered candidate paper.
#[derive(Debug, Clone, PartialEq)]
pub struct Work {
    /// Stable external key: the DOI when present, else the source URI.
    pub identifier: String,
    /// DOI as given by the source (bare or `https://doi.org/...`).
    pub doi: Option<String>,
    /// Source-assigned URI (e.g. `https://openalex.org/W...`).
    pub source_id: Option<String>,
    /// Display title; empty when the source had none.
    pub title: String,
    /// Word-position index of the abstract, `None` when the source had none.
    pub abstract_index: Option<InvertedIndex>,
    /// ISO publication date.
    pub publication_date: Option<String>,
    /// Topic label the work was retrieved under, assigned by the caller.
    pub topic: String,
    /// Full raw record, handed downstream untouched.
    pub record: Value,
}

impl Work {
    /// Builds a work from a raw catalog record retrieved under `topic`.
    ///
    /// Blank `doi`/`id` strings count as absent. The DOI wins over the
    /// source id for [`Work::identifier`].
    ///
    /// # Errors
    ///
    /// Returns [`WorkError::MissingIdentifier`] when neither a DOI nor an id
    /// is present, or [`WorkError::Malformed`] when fields have the wrong type.
    pub fn from_record(record: Value, topic: &str) -> Result<Self, WorkError> {
        let parsed: WorkRecord = serde_json::from_value(record.clone())?;

        let doi = non_blank(parsed.doi);
        let source_id = non_blank(parsed.id);
        let title = non_blank(parsed.title)
            .or_else(|| non_blank(parsed.display_name))
            .unwrap_or_default();

        let Some(identifier) = doi.clone().or_else(|| source_id.clone()) else {
            return Err(WorkError::MissingIdentifier {
                preview: title.chars().take(60).collect(),
            });
        };

        Ok(Self {
            identifier,
            doi,
            source_id,
            title,
            abstract_index: parsed.abstract_inverted_index,
            publication_date: non_blank(parsed.publication_date),
            topic: topic.to_string(),
            record,
        })
    }

    /// Decoded abstract text, `None` when the source supplied no abstract.
    #[must_use]
    pub fn abstract_text(&self) -> Option<String> {
        decode_abstract(self.abstract_index.as_ref())
    }

    /// Link readers should follow to reach the paper.
    ///
    /// A bare DOI is expanded to `https://doi.org/{doi}`, a DOI that is
    /// already a URL is used as is, otherwise the source URI is returned.
    #[must_use]
    pub fn landing_url(&self) -> String {
        match &self.doi {
            Some(doi) if doi.starts_with("http://") || doi.starts_with("https://") => doi.clone(),
            Some(doi) => format!("https://doi.org/{doi}"),
            None => self.identifier.clone(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
