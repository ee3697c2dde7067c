//! Duplicate detection against previously published posts.
//!
//! The ledger is the corpus of posts already emitted downstream. A work
//! counts as published when any post mentions its identifier or its title
//! verbatim. The check is read-only; new posts are written by the publisher.
//!
//! [`PublicationLedger`] is the seam used by the selector so an indexed store
//! can replace the directory scan later.

use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

/// File extension of published posts.
pub const DEFAULT_ARTIFACT_EXTENSION: &str = "qmd";

/// Lookup capability answering "was this work already published?".
pub trait PublicationLedger {
    /// Returns `true` when a published artifact contains `identifier` or
    /// `title` as a literal substring. Empty or missing needles never match.
    fn is_published(&self, identifier: Option<&str>, title: Option<&str>) -> bool;
}

/// Which needle produced a match, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchedBy {
    Identifier,
    Title,
}

impl MatchedBy {
    fn as_str(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Title => "title",
        }
    }
}

fn find_mention(text: &str, identifier: Option<&str>, title: Option<&str>) -> Option<MatchedBy> {
    if let Some(identifier) = identifier.filter(|s| !s.is_empty())
        && text.contains(identifier)
    {
        return Some(MatchedBy::Identifier);
    }
    if let Some(title) = title.filter(|s| !s.is_empty())
        && text.contains(title)
    {
        return Some(MatchedBy::Title);
    }
    None
}

// ==================== DirectoryLedger ====================

/// Ledger backed by a flat directory of post files.
///
/// Only files directly inside `corpus_root` with the configured extension
/// are scanned; subdirectories are ignored.
#[derive(Debug, Clone)]
pub struct DirectoryLedger {
    corpus_root: PathBuf,
    extension: String,
}

impl DirectoryLedger {
    /// Creates a ledger scanning `*.qmd` posts in `corpus_root`.
    #[must_use]
    pub fn new(corpus_root: impl Into<PathBuf>) -> Self {
        Self {
            corpus_root: corpus_root.into(),
            extension: DEFAULT_ARTIFACT_EXTENSION.to_string(),
        }
    }

    /// Overrides the artifact extension (a leading `.` is ignored).
    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Directory scanned for posts.
    #[must_use]
    pub fn corpus_root(&self) -> &Path {
        &self.corpus_root
    }

    /// Artifact extension without the leading dot.
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    fn is_artifact(&self, path: &Path) -> bool {
        path.is_file() && path.extension() == Some(OsStr::new(&self.extension))
    }
}

impl PublicationLedger for DirectoryLedger {
    #[instrument(skip(self), fields(corpus_root = %self.corpus_root.display()))]
    fn is_published(&self, identifier: Option<&str>, title: Option<&str>) -> bool {
        let entries = match fs::read_dir(&self.corpus_root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("Corpus directory missing, nothing published yet");
                return false;
            }
            Err(err) => {
                warn!(error = %err, "Cannot list corpus directory, treating as empty");
                return false;
            }
        };

        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(err) => {
                    warn!(error = %err, "Skipping unreadable corpus entry");
                    continue;
                }
            };
            if !self.is_artifact(&path) {
                continue;
            }

            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    warn!(artifact = %path.display(), error = %err, "Skipping unreadable artifact");
                    continue;
                }
            };

            if let Some(matched_by) = find_mention(&text, identifier, title) {
                info!(
                    artifact = %path.display(),
                    matched_by = matched_by.as_str(),
                    "Paper already published"
                );
                return true;
            }
        }

        false
    }
}

// ==================== MemoryLedger ====================

/// Ledger over in-memory artifact texts.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    artifacts: Vec<(String, String)>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a published artifact under `name`.
    pub fn push(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.artifacts.push((name.into(), text.into()));
    }

    /// Number of artifacts held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether the ledger holds no artifacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl PublicationLedger for MemoryLedger {
    fn is_published(&self, identifier: Option<&str>, title: Option<&str>) -> bool {
        self.artifacts.iter().any(|(name, text)| {
            find_mention(text, identifier, title).is_some_and(|matched_by| {
                info!(
                    artifact = %name,
                    matched_by = matched_by.as_str(),
                    "Paper already published"
                );
                true
            })
        })
    }
}

impl<L: PublicationLedger + ?Sized> PublicationLedger for &L {
    fn is_published(&self, identifier: Option<&str>, title: Option<&str>) -> bool {
        (**self).is_published(identifier, title)
    }
}
