//! Paper Digest Core Library
//!
//! Picks one recent open-access paper per run for the weekly digest: a topic
//! is chosen from a calendar-driven rotation, candidate works are fetched for
//! it, works without an abstract or already mentioned in a published post are
//! filtered out, and one of the remaining works is chosen at random.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`work`] - Work records and abstract inverted-index decoding
//! - [`ledger`] - Duplicate detection against previously published posts
//! - [`topics`] - Topic configuration and weekly rotation
//! - [`selector`] - Eligibility filtering and randomized candidate choice
//! - [`source`] - Catalog fetch collaborators (`OpenAlex`)
//! - [`pipeline`] - Walks the rotation until a candidate is found
//! - [`handoff`] - Selection record handed to the downstream summarizer

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod handoff;
pub mod ledger;
pub mod pipeline;
pub mod selector;
pub mod source;
pub mod topics;
mod user_agent;
pub mod work;

// Re-export commonly used types
pub use handoff::{HandoffError, Selection, read_handoff, write_handoff};
pub use ledger::{DEFAULT_ARTIFACT_EXTENSION, DirectoryLedger, MemoryLedger, PublicationLedger};
pub use pipeline::{DEFAULT_LOOKBACK_DAYS, DEFAULT_PER_PAGE, RotationSettings, run_rotation};
pub use selector::{Candidate, eligible, select};
pub use source::{FetchRequest, HttpSettings, OpenAlexSource, SourceError, WorkSource};
pub use topics::{RotationError, Topic, default_topics, rotation_order, select_topic};
pub use work::{InvertedIndex, Work, WorkError, decode_abstract};
