//! Ranked retrieval over a finished index

use crate::index::{InvertedIndex, Posting};
use std::collections::HashMap;

/// A ranked search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Page URL
    pub page: String,

    /// Sum of the page's frequencies over the query terms
    pub score: u64,
}

/// Read-only query access to a finished index
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    index: &'a InvertedIndex,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self { index }
    }

    /// Ranks pages by the summed frequency of the query terms
    ///
    /// Terms missing from the index contribute nothing. A term given twice counts
    /// twice. Pages with equal scores keep the order in which they were first
    /// reached while walking the query terms' postings.
    ///
    /// Returns an empty list when no query term is in the index.
    pub fn search<S: AsRef<str>>(&self, terms: &[S]) -> Vec<SearchHit> {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut hits: Vec<SearchHit> = Vec::new();

        let postings = terms
            .iter()
            .filter_map(|term| self.index.get(term.as_ref()))
            .flatten();

        for posting in postings {
            match positions.get(posting.page.as_str()) {
                Some(&position) => hits[position].score += u64::from(posting.frequency),
                None => {
                    positions.insert(posting.page.as_str(), hits.len());
                    hits.push(SearchHit {
                        page: posting.page.clone(),
                        score: u64::from(posting.frequency),
                    });
                }
            }
        }

        // Stable sort keeps discovery order among equal scores
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits
    }

    /// Returns the stored postings for a single term, unchanged
    pub fn lookup(&self, term: &str) -> Option<&'a [Posting]> {
        self.index.get(term)
    }
}
