//! Index construction during a crawl

use crate::index::{InvertedIndex, Posting};
use std::collections::{HashMap, HashSet};

/// Accumulates per-page term frequencies into an [`InvertedIndex`]
///
/// Each page is recorded at most once; a repeated URL is ignored so that a
/// `(term, page)` pair never appears twice in a postings list.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    index: InvertedIndex,
    recorded: HashSet<String>,
}

impl IndexBuilder {
    /// Creates a builder over an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the occurrences of each distinct term and appends one posting per term
    ///
    /// Terms are posted in order of first occurrence on the page.
    ///
    /// # Returns
    ///
    /// `false` if the page had already been recorded (nothing changes)
    pub fn record_page<I, T>(&mut self, url: &str, terms: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        if !self.recorded.insert(url.to_string()) {
            tracing::warn!("Page {} already indexed, ignoring repeat", url);
            return false;
        }

        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut counts: Vec<(String, u32)> = Vec::new();

        for term in terms {
            let term = term.as_ref();
            match positions.get(term) {
                Some(&position) => counts[position].1 += 1,
                None => {
                    positions.insert(term.to_string(), counts.len());
                    counts.push((term.to_string(), 1));
                }
            }
        }

        for (term, frequency) in counts {
            self.index.push(&term, Posting::new(url, frequency));
        }

        true
    }

    /// Returns the index built so far
    pub fn snapshot(&self) -> &InvertedIndex {
        &self.index
    }

    /// Consumes the builder, handing over the index
    pub fn into_index(self) -> InvertedIndex {
        self.index
    }

    /// Returns the number of pages recorded
    pub fn page_count(&self) -> usize {
        self.recorded.len()
    }
}
