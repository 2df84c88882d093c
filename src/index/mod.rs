//! Inverted index module
//!
//! The index maps each term to the pages it occurs on and how often:
//! - [`IndexBuilder`] owns the index while a crawl is running and is the only writer
//! - [`QueryEngine`] reads a finished index and ranks pages for multi-term queries
//!
//! Once a crawl ends the index is immutable; any number of queries may read it.

mod builder;
mod query;

pub use builder::IndexBuilder;
pub use query::{QueryEngine, SearchHit};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One page's occurrence count for a term
///
/// Serialized as a two-element array `["<page url>", <frequency>]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, u32)", into = "(String, u32)")]
pub struct Posting {
    /// Normalized URL of the page
    pub page: String,

    /// Number of occurrences on that page (always >= 1)
    pub frequency: u32,
}

impl Posting {
    pub fn new(page: impl Into<String>, frequency: u32) -> Self {
        Self {
            page: page.into(),
            frequency,
        }
    }
}

impl From<(String, u32)> for Posting {
    fn from((page, frequency): (String, u32)) -> Self {
        Self { page, frequency }
    }
}

impl From<Posting> for (String, u32) {
    fn from(posting: Posting) -> Self {
        (posting.page, posting.frequency)
    }
}

/// Term → postings list, postings in the order pages were recorded
///
/// Terms are kept sorted so that serializing the same index twice yields the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    terms: BTreeMap<String, Vec<Posting>>,
}

impl InvertedIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the postings for `term`, if the term was ever recorded
    pub fn get(&self, term: &str) -> Option<&[Posting]> {
        self.terms.get(term).map(Vec::as_slice)
    }

    /// Returns true if `term` has postings
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Returns the number of distinct terms
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if no term has been recorded
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterates over `(term, postings)` in term order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Posting])> {
        self.terms
            .iter()
            .map(|(term, postings)| (term.as_str(), postings.as_slice()))
    }

    /// Appends a posting to `term`'s list, creating the list if absent
    pub(crate) fn push(&mut self, term: &str, posting: Posting) {
        match self.terms.get_mut(term) {
            Some(postings) => postings.push(posting),
            None => {
                self.terms.insert(term.to_string(), vec![posting]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_serializes_as_pair() {
        let posting = Posting::new("http://example.com/a", 3);
        let json = serde_json::to_string(&posting).unwrap();
        assert_eq!(json, r#"["http://example.com/a",3]"#);
    }

    #[test]
    fn test_index_serializes_as_term_map() {
        let mut index = InvertedIndex::new();
        index.push("b", Posting::new("P1", 1));
        index.push("a", Posting::new("P1", 2));
        index.push("a", Posting::new("P2", 1));

        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(json, r#"{"a":[["P1",2],["P2",1]],"b":[["P1",1]]}"#);
    }

    #[test]
    fn test_index_deserializes_from_term_map() {
        let json = r#"{"cat":[["X",3],["Y",1]],"dog":[["Y",2]]}"#;
        let index: InvertedIndex = serde_json::from_str(json).unwrap();

        assert_eq!(index.term_count(), 2);
        assert_eq!(
            index.get("cat").unwrap(),
            &[Posting::new("X", 3), Posting::new("Y", 1)]
        );
        assert!(index.get("bird").is_none());
    }

    #[test]
    fn test_empty_index() {
        let index = InvertedIndex::new();
        assert!(index.is_empty());
        assert!(!index.contains("anything"));
        assert_eq!(index.iter().count(), 0);
    }
}
