//! Eligibility filtering and randomized choice among fetched works.
//!
//! A work is eligible when its abstract decodes to non-blank text and the
//! ledger has no post mentioning its identifier or title. The choice among
//! eligible works is uniform so the newest paper is not always the one
//! picked; the random source is passed in by the caller.

use rand::Rng;
use tracing::{debug, instrument};

use crate::ledger::PublicationLedger;
use crate::work::Work;

/// An eligible work together with its decoded abstract.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    /// The selected work.
    pub work: &'a Work,
    /// Abstract text decoded from the work's inverted index.
    pub abstract_text: String,
}

/// Returns every eligible work, in input order.
#[instrument(skip_all, fields(works = works.len()))]
pub fn eligible<'a, L>(works: &'a [Work], ledger: &L) -> Vec<Candidate<'a>>
where
    L: PublicationLedger + ?Sized,
{
    let mut candidates = Vec::new();
    for work in works {
        let Some(abstract_text) = work.abstract_text().filter(|t| !t.trim().is_empty()) else {
            debug!(identifier = %work.identifier, "Skipping work without abstract");
            continue;
        };

        let title = Some(work.title.as_str()).filter(|t| !t.is_empty());
        if ledger.is_published(Some(&work.identifier), title) {
            debug!(identifier = %work.identifier, "Skipping already published work");
            continue;
        }

        candidates.push(Candidate {
            work,
            abstract_text,
        });
    }
    debug!(eligible = candidates.len(), "Filtered candidate works");
    candidates
}

/// Picks one eligible work uniformly at random.
///
/// Returns `None` when nothing is eligible, the signal to try the next topic.
pub fn select<'a, L, R>(works: &'a [Work], ledger: &L, rng: &mut R) -> Option<Candidate<'a>>
where
    L: PublicationLedger + ?Sized,
    R: Rng + ?Sized,
{
    let mut candidates = eligible(works, ledger);
    if candidates.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..candidates.len());
    Some(candidates.swap_remove(index))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    fn work_with_abstract(doi: &str, title: &str) -> Work {
        Work::from_record(
            json!({
                "doi": doi,
                "title": title,
                "abstract_inverted_index": {"hello": [0], "world": [1]}
            }),
            "A",
        )
        .unwrap()
    }

    fn work_without_abstract(doi: &str) -> Work {
        Work::from_record(
            json!({"doi": doi, "title": "Silent", "abstract_inverted_index": null}),
            "A",
        )
        .unwrap()
    }

    #[test]
    fn test_select_empty_input_returns_none() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(select(&[], &MemoryLedger::new(), &mut rng).is_none());
    }

    #[test]
    fn test_select_returns_only_eligible_work() {
        let works = vec![
            work_with_abstract("10.1/x", "Hello Paper"),
            work_without_abstract("10.2/y"),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let picked = select(&works, &MemoryLedger::new(), &mut rng).unwrap();
        assert_eq!(picked.work.identifier, "10.1/x");
        assert_eq!(picked.abstract_text, "hello world");
    }

    #[test]
    fn test_select_none_when_all_excluded() {
        let works = vec![
            work_with_abstract("10.1/x", "Hello Paper"),
            work_without_abstract("10.2/y"),
        ];
        let mut ledger = MemoryLedger::new();
        ledger.push(
            "2024-03-04-ai-summary.qmd",
            "[Hello](https://doi.org/10.1/x)",
        );
        let mut rng = StdRng::seed_from_u64(7);
        assert!(select(&works, &ledger, &mut rng).is_none());
    }

    #[test]
    fn test_blank_abstract_is_ineligible() {
        let blank = Work::from_record(
            json!({"doi": "10.3/z", "abstract_inverted_index": {}}),
            "A",
        )
        .unwrap();
        let spaces = Work::from_record(
            json!({"doi": "10.4/w", "abstract_inverted_index": {"  ": [0]}}),
            "A",
        )
        .unwrap();
        assert!(eligible(&[blank, spaces], &MemoryLedger::new()).is_empty());
    }

    #[test]
    fn test_title_mention_excludes_work() {
        let works = vec![work_with_abstract("10.1/x", "Known Title")];
        let mut ledger = MemoryLedger::new();
        ledger.push("post.qmd", "title: \"AI Paper of the Week: Known Title\"");
        assert!(eligible(&works, &ledger).is_empty());
    }

    #[test]
    fn test_eligible_preserves_input_order() {
        let works = vec![
            work_with_abstract("10.1/a", "First"),
            work_without_abstract("10.1/b"),
            work_with_abstract("10.1/c", "Third"),
        ];
        let ids: Vec<&str> = eligible(&works, &MemoryLedger::new())
            .iter()
            .map(|c| c.work.identifier.as_str())
            .collect();
        assert_eq!(ids, ["10.1/a", "10.1/c"]);
    }

    #[test]
    fn test_select_is_reproducible_with_same_seed() {
        let works: Vec<Work> = (0..8)
            .map(|i| work_with_abstract(&format!("10.1/{i}"), &format!("Paper {i}")))
            .collect();
        let ledger = MemoryLedger::new();

        let first = select(&works, &ledger, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = select(&works, &ledger, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first.work.identifier, second.work.identifier);
    }

    #[test]
    fn test_select_reaches_more_than_first_candidate() {
        let works: Vec<Work> = (0..4)
            .map(|i| work_with_abstract(&format!("10.1/{i}"), &format!("Paper {i}")))
            .collect();
        let ledger = MemoryLedger::new();
        let mut rng = StdRng::seed_from_u64(1);

        let mut picked = std::collections::HashSet::new();
        for _ in 0..64 {
            let candidate = select(&works, &ledger, &mut rng).unwrap();
            picked.insert(candidate.work.identifier.clone());
        }
        assert!(
            picked.len() > 1,
            "selection should not always pick the first work"
        );
    }

    #[test]
    fn test_select_never_returns_published_work() {
        let works: Vec<Work> = (0..6)
            .map(|i| work_with_abstract(&format!("10.1/{i}"), &format!("Paper {i}")))
            .collect();
        let mut ledger = MemoryLedger::new();
        ledger.push("a.qmd", "10.1/0 and 10.1/2");
        ledger.push("b.qmd", "Paper 4");
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..32 {
            let picked = select(&works, &ledger, &mut rng).unwrap();
            assert!(
                ["10.1/1", "10.1/3", "10.1/5"].contains(&picked.work.identifier.as_str()),
                "picked published work {}",
                picked.work.identifier
            );
        }
    }
}
