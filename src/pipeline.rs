//! Rotation pipeline: walk the topics of the week until one yields a paper.
//!
//! Topics are tried in [`rotation_order`], starting with the topic of the
//! week. Each topic gets one fetch; the first topic with an eligible work
//! wins. Running out of topics is a normal outcome (`Ok(None)`), while a
//! fetch failure aborts the run.

use chrono::{Days, NaiveDate};
use rand::Rng;
use tracing::{info, instrument, warn};

use crate::handoff::Selection;
use crate::ledger::PublicationLedger;
use crate::selector::select;
use crate::source::{FetchRequest, SourceError, WorkSource};
use crate::topics::{Topic, rotation_order};

/// Default lookback window for publication dates.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 180;
/// Default number of works fetched per topic.
pub const DEFAULT_PER_PAGE: u8 = 10;

/// Fetch parameters shared by every topic in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationSettings {
    /// Only works published within this many days before `today` are fetched.
    pub lookback_days: u32,
    /// Works fetched per topic.
    pub per_page: u8,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl RotationSettings {
    /// Earliest publication date included for a run on `today`.
    #[must_use]
    pub fn from_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.lookback_days)))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Runs the topic rotation for `today` and returns the chosen work.
///
/// # Errors
///
/// Returns the first [`SourceError`] raised by `source`; later topics are
/// not tried.
#[instrument(skip_all, fields(source = source.name(), %today, topics = topics.len()))]
pub async fn run_rotation<S, L, R>(
    source: &S,
    ledger: &L,
    topics: &[Topic],
    today: NaiveDate,
    settings: &RotationSettings,
    rng: &mut R,
) -> Result<Option<Selection>, SourceError>
where
    S: WorkSource + ?Sized,
    L: PublicationLedger + ?Sized,
    R: Rng + ?Sized,
{
    let from_date = settings.from_date(today);

    for topic in rotation_order(today, topics) {
        info!(topic = %topic.name, "Trying topic");
        let request = FetchRequest {
            topic: topic.clone(),
            from_date,
            per_page: settings.per_page,
        };
        let works = source.fetch(&request).await?;

        if let Some(candidate) = select(&works, ledger, rng) {
            let selection = Selection::from_candidate(&candidate, today);
            info!(
                topic = %topic.name,
                identifier = %selection.identifier,
                title = %selection.title,
                "Found paper"
            );
            return Ok(Some(selection));
        }
        warn!(topic = %topic.name, fetched = works.len(), "No eligible paper, trying next topic");
    }

    warn!("No new eligible papers found for any topic");
    Ok(None)
}
