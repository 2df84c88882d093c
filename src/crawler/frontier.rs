//! Crawl frontier
//!
//! A FIFO queue of discovered URLs plus the set of every URL it has ever accepted.
//! URLs come out in discovery order, so a fixed link structure always yields the same
//! crawl order. Callers normalize URLs before handing them over.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// Breadth-first queue of URLs still to fetch
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be fetched, oldest first
    queue: VecDeque<Url>,

    /// Every URL ever enqueued or marked visited
    seen: HashSet<String>,

    /// URLs whose content has been indexed
    visited: HashSet<String>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `url` unless it has been queued or visited before
    ///
    /// # Returns
    ///
    /// `true` if the URL was added, `false` if it was already known
    pub fn enqueue(&mut self, url: Url) -> bool {
        if !self.seen.insert(url.as_str().to_string()) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    /// Removes and returns the oldest queued URL
    pub fn dequeue(&mut self) -> Option<Url> {
        self.queue.pop_front()
    }

    /// Records `url` as permanently visited; it will never be queued again
    pub fn mark_visited(&mut self, url: &Url) {
        self.seen.insert(url.as_str().to_string());
        self.visited.insert(url.as_str().to_string());
    }

    /// Whether `url` has been queued (now or earlier) or visited
    pub fn is_known(&self, url: &Url) -> bool {
        self.seen.contains(url.as_str())
    }

    /// Returns the number of URLs waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of visited URLs
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
