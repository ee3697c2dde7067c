//! Selection record handed to the downstream summarizer.
//!
//! The record is plain pretty-printed JSON holding the topic, the decoded
//! abstract and the untouched catalog record, so the summarizer needs no
//! catalog knowledge of its own. Writing it is the last step of a pick run;
//! the post itself is produced downstream.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::selector::Candidate;

/// Default handoff file name.
pub const DEFAULT_HANDOFF_FILE: &str = "paper_to_summarize.json";

/// Errors produced while reading or writing the handoff file.
#[derive(Debug, Error)]
pub enum HandoffError {
    /// I/O error on the handoff file.
    #[error("I/O error on handoff file: {0}")]
    Io(#[from] std::io::Error),
    /// JSON (de)serialization error.
    #[error("handoff JSON error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The work chosen for this run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Topic the work was found under.
    pub topic: String,
    /// Stable identifier (DOI or source URI).
    pub identifier: String,
    /// Display title.
    pub title: String,
    /// Link for readers.
    pub landing_url: String,
    /// ISO publication date, when known.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub publication_date: Option<String>,
    /// Abstract decoded from the inverted index.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Date of the run that made the selection.
    pub selected_on: NaiveDate,
    /// Raw catalog record.
    pub paper: Value,
}

impl Selection {
    /// Builds the record for `candidate`, chosen on `selected_on`.
    #[must_use]
    pub fn from_candidate(candidate: &Candidate<'_>, selected_on: NaiveDate) -> Self {
        let work = candidate.work;
        Self {
            topic: work.topic.clone(),
            identifier: work.identifier.clone(),
            title: work.title.clone(),
            landing_url: work.landing_url(),
            publication_date: work.publication_date.clone(),
            abstract_text: candidate.abstract_text.clone(),
            selected_on,
            paper: work.record.clone(),
        }
    }
}

/// Writes `selection` to `path`, replacing any previous handoff file.
///
/// Parent directories are created as needed. The JSON is written to a
/// sibling `.tmp` file and renamed over `path`, so a failed write leaves the
/// previous handoff in place.
///
/// # Errors
///
/// Returns [`HandoffError`] on I/O or serialization failure.
#[instrument(skip_all, fields(path = %path.display(), identifier = %selection.identifier))]
pub fn write_handoff(path: &Path, selection: &Selection) -> Result<(), HandoffError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_sibling(path);
    let file = File::create(&temp_path)?;
    let write_result = {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, selection)
            .map_err(HandoffError::from)
            .and_then(|()| writer.flush().map_err(HandoffError::from))
    };
    if let Err(err) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }
    if let Err(err) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(err.into());
    }

    debug!("Handoff file written");
    Ok(())
}

/// `handoff.json` becomes `handoff.json.tmp` in the same directory.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Reads a handoff file written by [`write_handoff`].
///
/// # Errors
///
/// Returns [`HandoffError`] when the file is missing or not a selection.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_handoff(path: &Path) -> Result<Selection, HandoffError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::work::Work;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_selection() -> Selection {
        let work = Work::from_record(
            json!({
                "id": "https://openalex.org/W1",
                "doi": "https://doi.org/10.1/x",
                "title": "Hello Paper",
                "publication_date": "2024-03-01",
                "abstract_inverted_index": {"hello": [0], "world": [1]}
            }),
            "Artificial Intelligence",
        )
        .unwrap();
        let candidate = Candidate {
            work: &work,
            abstract_text: "hello world".to_string(),
        };
        Selection::from_candidate(&candidate, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap())
    }

    #[test]
    fn test_selection_from_candidate_fields() {
        let selection = sample_selection();
        assert_eq!(selection.topic, "Artificial Intelligence");
        assert_eq!(selection.identifier, "https://doi.org/10.1/x");
        assert_eq!(selection.landing_url, "https://doi.org/10.1/x");
        assert_eq!(selection.publication_date.as_deref(), Some("2024-03-01"));
        assert_eq!(selection.abstract_text, "hello world");
        assert_eq!(selection.paper["id"], "https://openalex.org/W1");
    }

    #[test]
    fn test_write_then_read_handoff() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("paper_to_summarize.json");
        let selection = sample_selection();

        write_handoff(&path, &selection).unwrap();
        assert_eq!(read_handoff(&path).unwrap(), selection);
    }

    #[test]
    fn test_handoff_json_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("handoff.json");
        write_handoff(&path, &sample_selection()).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["topic"], "Artificial Intelligence");
        assert_eq!(raw["abstract"], "hello world");
        assert_eq!(raw["selected_on"], "2024-03-04");
        assert_eq!(raw["paper"]["title"], "Hello Paper");
    }

    #[test]
    fn test_write_handoff_replaces_previous_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("handoff.json");
        fs::write(&path, "stale content that is not json").unwrap();

        let selection = sample_selection();
        write_handoff(&path, &selection).unwrap();
        assert_eq!(read_handoff(&path).unwrap(), selection);
    }

    #[test]
    fn test_failed_write_keeps_previous_handoff() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("handoff.json");
        fs::write(&path, "{\"previous\": true}").unwrap();
        // A directory squatting on the temp name makes the write fail.
        fs::create_dir(dir.path().join("handoff.json.tmp")).unwrap();

        let result = write_handoff(&path, &sample_selection());
        assert!(matches!(result, Err(HandoffError::Io(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"previous\": true}");
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("handoff.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), "x").unwrap();

        assert!(write_handoff(&path, &sample_selection()).is_err());
        assert!(path.join("keep.txt").exists());
        assert!(!dir.path().join("handoff.json.tmp").exists());
    }

    #[test]
    fn test_successful_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("handoff.json");
        write_handoff(&path, &sample_selection()).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("handoff.json")]);
    }

    #[test]
    fn test_read_handoff_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let result = read_handoff(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(HandoffError::Io(_))));
    }

    #[test]
    fn test_read_handoff_invalid_json_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"topic\": 1}").unwrap();
        assert!(matches!(
            read_handoff(&path),
            Err(HandoffError::Serialize(_))
        ));
    }
}
