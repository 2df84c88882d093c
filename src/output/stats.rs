//! Crawl statistics
//!
//! Counters kept by the crawl loop and the report printed when a build finishes.

use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// When seeding began
    pub started_at: DateTime<Utc>,

    /// When the index was persisted
    pub finished_at: Option<DateTime<Utc>>,

    /// URLs seeded from sitemaps
    pub sitemap_seeds: u64,

    /// Pages fetched and recorded in the index
    pub pages_indexed: u64,

    /// URLs skipped because robots.txt disallows them
    pub disallowed: u64,

    /// Fetches that hit the request timeout
    pub timeouts: u64,

    /// Fetches that failed for any other reason
    pub network_failures: u64,

    /// Redirects whose target was already queued or visited
    pub duplicate_redirects: u64,

    /// Distinct terms in the finished index
    pub distinct_terms: u64,

    /// Whether the crawl was stopped before the frontier emptied
    pub stopped_early: bool,
}

impl CrawlStatistics {
    /// Starts a fresh set of counters timestamped now
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            sitemap_seeds: 0,
            pages_indexed: 0,
            disallowed: 0,
            timeouts: 0,
            network_failures: 0,
            duplicate_redirects: 0,
            distinct_terms: 0,
            stopped_early: false,
        }
    }

    /// Total per-URL failures
    pub fn failures(&self) -> u64 {
        self.timeouts + self.network_failures
    }

    /// Wall-clock duration, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Renders statistics as a plain-text report
pub fn render_statistics(stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n\n");
    out.push_str(&format!("Pages indexed: {}\n", stats.pages_indexed));
    out.push_str(&format!("Distinct terms: {}\n", stats.distinct_terms));
    out.push_str(&format!("Sitemap seeds: {}\n", stats.sitemap_seeds));
    out.push_str(&format!("Disallowed by robots.txt: {}\n", stats.disallowed));
    out.push_str(&format!(
        "Failed fetches: {} ({} timeouts)\n",
        stats.failures(),
        stats.timeouts
    ));
    out.push_str(&format!(
        "Redirects to known pages: {}\n",
        stats.duplicate_redirects
    ));

    if let Some(seconds) = stats.duration_seconds() {
        out.push_str(&format!("Duration: {}s\n", seconds));
    }

    if stats.stopped_early {
        out.push_str("Crawl was stopped before the frontier emptied.\n");
    }

    out
}
