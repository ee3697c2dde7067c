//! Reconstruction of abstract text from a word-position inverted index.
//!
//! Catalogs such as `OpenAlex` do not ship abstracts verbatim. Instead each
//! distinct word maps to the zero-based positions where it occurs, e.g.
//! `{"hello": [0], "world": [1]}` for "hello world".

use indexmap::IndexMap;

/// Word -> positions mapping, in the order the source listed the words.
pub type InvertedIndex = IndexMap<String, Vec<usize>>;

/// Rebuilds the abstract text from its inverted index.
///
/// Tokens are ordered by position ascending and joined with single spaces.
/// When two tokens claim the same position the sort is stable, so the token
/// listed first in the index wins the earlier slot.
///
/// Returns `None` when no index is present ("no abstract available"). An
/// empty index decodes to an empty string; callers decide whether that is
/// usable.
///
/// # Examples
///
/// ```
/// use paper_digest_core::work::{InvertedIndex, decode_abstract};
///
/// let mut index = InvertedIndex::new();
/// index.insert("world".to_string(), vec![1]);
/// index.insert("hello".to_string(), vec![0]);
/// assert_eq!(decode_abstract(Some(&index)).as_deref(), Some("hello world"));
/// assert_eq!(decode_abstract(None), None);
/// ```
#[must_use]
pub fn decode_abstract(index: Option<&InvertedIndex>) -> Option<String> {
    let index = index?;

    let mut slots: Vec<(usize, &str)> = index
        .iter()
        .flat_map(|(token, positions)| {
            positions
                .iter()
                .map(move |&position| (position, token.as_str()))
        })
        .collect();
    slots.sort_by_key(|&(position, _)| position);

    let mut text = String::new();
    for (_, token) in slots {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(token);
    }
    Some(text)
}
