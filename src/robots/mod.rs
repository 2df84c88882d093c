//! Robots.txt handling module
//!
//! This module turns a site's robots.txt into a [`PolitenessPolicy`]: per-URL
//! permission, the delay between requests, and the advertised sitemaps. Failing to
//! obtain robots.txt or a sitemap never stops a crawl; callers log the
//! [`PolitenessError`] and continue with a permissive policy or without sitemap seeds.

mod parser;
mod sitemap;

pub use parser::ParsedRobots;
pub use sitemap::{parse_sitemap, sitemap_entries};

use crate::crawler::FetchResult;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Non-fatal problems while resolving the politeness policy
#[derive(Debug, Error)]
pub enum PolitenessError {
    #[error("robots.txt unavailable at {url}: {reason}")]
    PolicyUnavailable { url: String, reason: String },

    #[error("sitemap unavailable at {url}: {reason}")]
    SitemapUnavailable { url: String, reason: String },
}

/// Crawl rules derived from robots.txt for one user agent
#[derive(Debug, Clone)]
pub struct PolitenessPolicy {
    robots: ParsedRobots,
    user_agent: String,
    crawl_delay: Duration,
    sitemaps: Vec<Url>,
    available: bool,
}

impl PolitenessPolicy {
    /// Builds a policy from parsed robots.txt rules
    ///
    /// # Arguments
    ///
    /// * `robots` - The parsed robots.txt
    /// * `user_agent` - Product token matched against `User-agent` groups
    /// * `default_delay` - Delay used when no `Crawl-delay` applies
    pub fn new(robots: ParsedRobots, user_agent: &str, default_delay: Duration) -> Self {
        let crawl_delay = robots
            .crawl_delay(user_agent)
            .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
            .unwrap_or(default_delay);

        let sitemaps = robots
            .sitemaps()
            .iter()
            .filter_map(|location| match Url::parse(location) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::debug!("Ignoring malformed sitemap location {}: {}", location, e);
                    None
                }
            })
            .collect();

        Self {
            robots,
            user_agent: user_agent.to_string(),
            crawl_delay,
            sitemaps,
            available: true,
        }
    }

    /// The policy used when robots.txt could not be retrieved: allow everything,
    /// use the default delay, advertise no sitemaps
    pub fn unavailable(user_agent: &str, default_delay: Duration) -> Self {
        Self {
            available: false,
            ..Self::new(ParsedRobots::allow_all(), user_agent, default_delay)
        }
    }

    /// Interprets the response to a robots.txt request
    ///
    /// | Response | Policy |
    /// |----------|--------|
    /// | 2xx | rules from the body |
    /// | 401, 403 | disallow everything |
    /// | other 4xx | no robots.txt, allow everything |
    /// | 5xx, timeout, network failure | `PolicyUnavailable` |
    pub fn from_fetch(
        robots_url: &Url,
        result: FetchResult,
        user_agent: &str,
        default_delay: Duration,
    ) -> Result<Self, PolitenessError> {
        let robots = match result {
            FetchResult::Success { body, .. } => ParsedRobots::from_content(&body),
            FetchResult::NetworkFailure {
                status: Some(401 | 403),
                ..
            } => {
                tracing::warn!("{} refused access, treating site as disallowed", robots_url);
                ParsedRobots::disallow_all()
            }
            FetchResult::NetworkFailure {
                status: Some(status),
                ..
            } if (400..500).contains(&status) => {
                tracing::info!("No robots.txt at {} (HTTP {})", robots_url, status);
                ParsedRobots::allow_all()
            }
            FetchResult::NetworkFailure { error, .. } => {
                return Err(PolitenessError::PolicyUnavailable {
                    url: robots_url.to_string(),
                    reason: error,
                })
            }
            FetchResult::Timeout => {
                return Err(PolitenessError::PolicyUnavailable {
                    url: robots_url.to_string(),
                    reason: "request timed out".to_string(),
                })
            }
            FetchResult::Disallowed => ParsedRobots::allow_all(),
        };

        Ok(Self::new(robots, user_agent, default_delay))
    }

    /// Whether the rules permit fetching `url` for this crawler's user agent
    pub fn can_fetch(&self, url: &Url) -> bool {
        self.robots.is_allowed(url.as_str(), &self.user_agent)
    }

    /// Minimum time between two consecutive requests
    pub fn crawl_delay(&self) -> Duration {
        self.crawl_delay
    }

    /// Sitemap URLs advertised by robots.txt
    pub fn sitemap_locations(&self) -> &[Url] {
        &self.sitemaps
    }

    /// False when this is the fallback policy for an unreachable robots.txt
    pub fn is_available(&self) -> bool {
        self.available
    }
}

/// Location of robots.txt for the site rooted at `root`
pub fn robots_url(root: &Url) -> Url {
    let mut url = root.clone();
    url.set_path("/robots.txt");
    url.set_query(None);
    url.set_fragment(None);
    url
}
