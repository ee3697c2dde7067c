//! Weekly topic rotation keyed on the ISO week number.
//!
//! `index = iso_week(today) mod len(topics)`. Years have 52 or 53 ISO weeks,
//! so unless the list length divides the week count some topics come up one
//! more time per year than others. The rotation is still total: every topic
//! is reached within `len(topics)` consecutive weeks.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use super::Topic;

/// Errors from topic rotation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotationError {
    /// The rotation has nothing to rotate through
    #[error("topic rotation is empty\n  Suggestion: Configure at least one topic")]
    NoTopics,
}

/// Position of the active topic for `today` in a rotation of `len` topics.
///
/// Returns `None` when `len` is zero.
#[must_use]
pub fn rotation_index(today: NaiveDate, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let week = today.iso_week().week() as usize;
    Some(week % len)
}

/// Picks the topic of the week.
///
/// Pure: the same ISO week and topic list always give the same topic.
///
/// # Errors
///
/// Returns [`RotationError::NoTopics`] when `topics` is empty.
pub fn select_topic(today: NaiveDate, topics: &[Topic]) -> Result<&Topic, RotationError> {
    let index = rotation_index(today, topics.len()).ok_or(RotationError::NoTopics)?;
    Ok(&topics[index])
}

/// Iterates all topics once, starting at the topic of the week and
/// wrapping around the end of the list.
#[must_use]
pub fn rotation_order(today: NaiveDate, topics: &[Topic]) -> RotationOrder<'_> {
    RotationOrder {
        topics,
        start: rotation_index(today, topics.len()).unwrap_or(0),
        offset: 0,
    }
}

/// Iterator returned by [`rotation_order`].
#[derive(Debug, Clone)]
pub struct RotationOrder<'a> {
    topics: &'a [Topic],
    start: usize,
    offset: usize,
}

impl<'a> Iterator for RotationOrder<'a> {
    type Item = &'a Topic;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.topics.len() {
            return None;
        }
        let index = (self.start + self.offset) % self.topics.len();
        self.offset += 1;
        Some(&self.topics[index])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.topics.len() - self.offset;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RotationOrder<'_> {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn topics(names: &[&str]) -> Vec<Topic> {
        names.iter().map(|n| Topic::new(*n)).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_ten_of_two_topics_selects_first() {
        // 2024-03-04 is the Monday of ISO week 10.
        let today = date(2024, 3, 4);
        assert_eq!(today.iso_week().week(), 10);
        let list = topics(&["A", "B"]);
        assert_eq!(select_topic(today, &list).unwrap().name, "A");
    }

    #[test]
    fn test_select_topic_is_stable_within_week() {
        let list = topics(&["A", "B", "C"]);
        let monday = date(2024, 3, 4);
        let sunday = date(2024, 3, 10);
        assert_eq!(
            select_topic(monday, &list).unwrap(),
            select_topic(sunday, &list).unwrap()
        );
        assert_eq!(
            select_topic(monday, &list).unwrap(),
            select_topic(monday, &list).unwrap()
        );
    }

    #[test]
    fn test_select_topic_advances_next_week() {
        let list = topics(&["A", "B", "C"]);
        // Week 10 -> 10 % 3 = 1, week 11 -> 2.
        assert_eq!(select_topic(date(2024, 3, 4), &list).unwrap().name, "B");
        assert_eq!(select_topic(date(2024, 3, 11), &list).unwrap().name, "C");
    }

    #[test]
    fn test_select_topic_uses_iso_week_across_year_boundary() {
        // 2021-01-01 belongs to ISO week 53 of 2020.
        let today = date(2021, 1, 1);
        assert_eq!(today.iso_week().week(), 53);
        let list = topics(&["A", "B"]);
        assert_eq!(select_topic(today, &list).unwrap().name, "B");
    }

    #[test]
    fn test_select_topic_empty_list_errors() {
        assert_eq!(
            select_topic(date(2024, 3, 4), &[]),
            Err(RotationError::NoTopics)
        );
    }

    #[test]
    fn test_rotation_order_visits_every_topic_once() {
        let list = topics(&["A", "B", "C", "D", "E"]);
        // Week 10 -> start at index 0.
        let order: Vec<&str> = rotation_order(date(2024, 3, 4), &list)
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(order, ["A", "B", "C", "D", "E"]);

        // Week 12 -> start at index 2, wrap around.
        let order: Vec<&str> = rotation_order(date(2024, 3, 18), &list)
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(order, ["C", "D", "E", "A", "B"]);
    }

    #[test]
    fn test_rotation_order_starts_at_selected_topic() {
        let list = topics(&["A", "B", "C"]);
        let today = date(2024, 7, 15);
        let first = rotation_order(today, &list).next().unwrap();
        assert_eq!(first, select_topic(today, &list).unwrap());
    }

    #[test]
    fn test_rotation_order_empty_list_yields_nothing() {
        let mut order = rotation_order(date(2024, 3, 4), &[]);
        assert_eq!(order.len(), 0);
        assert!(order.next().is_none());
    }

    #[test]
    fn test_rotation_reaches_every_topic_within_a_cycle() {
        let list = topics(&["A", "B", "C", "D"]);
        let mut seen = std::collections::HashSet::new();
        let mut day = date(2024, 1, 1);
        for _ in 0..list.len() {
            seen.insert(select_topic(day, &list).unwrap().name.clone());
            day = day.checked_add_days(chrono::Days::new(7)).unwrap();
        }
        assert_eq!(seen.len(), list.len());
    }
}
