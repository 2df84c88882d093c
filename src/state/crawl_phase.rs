//! Crawl lifecycle phases
//!
//! A crawl moves strictly forward: `Idle -> Seeding -> Draining -> Persisted`.
//! A finished crawl cannot be resumed; a new crawl starts again from `Idle`.

use std::fmt;

/// Represents the current phase of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Nothing fetched yet
    Idle,

    /// Reading robots.txt and sitemaps, filling the frontier
    Seeding,

    /// Fetching and indexing pages until the frontier is empty or the crawl is stopped
    Draining,

    /// The index has been written out
    Persisted,
}

impl CrawlPhase {
    /// Returns the phase that must follow this one, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Seeding),
            Self::Seeding => Some(Self::Draining),
            Self::Draining => Some(Self::Persisted),
            Self::Persisted => None,
        }
    }

    /// Returns true if moving from this phase to `to` is allowed
    pub fn can_transition_to(&self, to: Self) -> bool {
        self.next() == Some(to)
    }

    /// Returns true if this is the terminal phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Persisted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Seeding => "seeding",
            Self::Draining => "draining",
            Self::Persisted => "persisted",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
