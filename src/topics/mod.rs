//! Topic configuration and calendar-driven rotation.
//!
//! The ordered topic list is plain configuration handed in by the caller.
//! [`select_topic`] picks the topic of the week from it; [`rotation_order`]
//! yields the fallback sequence used when a topic has nothing new.

mod rotation;

pub use rotation::{RotationError, RotationOrder, rotation_index, rotation_order, select_topic};

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Topic rotation used when no configuration overrides it.
pub const DEFAULT_TOPIC_NAMES: [&str; 5] = [
    "Artificial Intelligence",
    "Machine Learning",
    "NLP",
    "Education",
    "Ethics",
];

/// A subject the digest rotates through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Label used for keyword search and in the post.
    pub name: String,
    /// Optional catalog category key (an `OpenAlex` concept id).
    pub id: Option<String>,
}

impl Topic {
    /// Creates a keyword-only topic.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }

    /// Creates a topic bound to a catalog category.
    #[must_use]
    pub fn with_id(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: Some(id.into()),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} ({id})", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// The built-in topic rotation.
#[must_use]
pub fn default_topics() -> Vec<Topic> {
    DEFAULT_TOPIC_NAMES
        .iter()
        .map(|name| Topic::new(*name))
        .collect()
}

/// Parses one topic line: `name` or `name | category-id`.
///
/// Returns `None` for blank lines, comments and lines with an empty name.
#[must_use]
pub fn parse_topic_line(line: &str) -> Option<Topic> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (name, id) = match line.split_once('|') {
        Some((name, id)) => (name.trim(), Some(id.trim()).filter(|id| !id.is_empty())),
        None => (line, None),
    };
    if name.is_empty() {
        return None;
    }
    Some(Topic {
        name: name.to_string(),
        id: id.map(String::from),
    })
}

/// Loads a topic rotation from a file (one topic per line).
///
/// Blank lines and lines starting with `#` are skipped. A line may carry a
/// category id after a `|` separator.
///
/// # Errors
/// Returns error if the file cannot be read.
#[instrument]
pub fn load_topics(path: &Path) -> Result<Vec<Topic>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read topics file '{}'", path.display()))?;

    Ok(content.lines().filter_map(parse_topic_line).collect())
}
