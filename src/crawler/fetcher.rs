//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - The [`PageSource`] capability that the crawl loop depends on
//! - [`HttpSource`], the `reqwest` implementation of it
//! - [`Fetcher`], which adds robots.txt permission checks and request pacing

use crate::config::Config;
use crate::crawler::pacer::Pacer;
use crate::robots::PolitenessPolicy;
use crate::url::normalize;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects (normalized when returned by [`Fetcher`])
        final_url: Url,
        /// Page body content
        body: String,
    },

    /// robots.txt forbids fetching this URL; no request was sent
    Disallowed,

    /// The request did not complete within the configured timeout
    Timeout,

    /// Connection failure, redirect limit, or a non-success HTTP status
    NetworkFailure {
        /// Error description
        error: String,
        /// HTTP status, when a response was received
        status: Option<u16>,
    },
}

impl FetchResult {
    /// Returns true for the per-URL failure variants
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Timeout | Self::NetworkFailure { .. })
    }
}

/// Anything that can answer a GET for a URL
///
/// The crawl loop only talks to this trait, so tests can substitute an in-memory site.
/// Implementations never return [`FetchResult::Disallowed`]; that is decided by [`Fetcher`].
pub trait PageSource {
    /// Issues one GET and follows redirects, reporting the URL the content came from
    fn get(&self, url: &Url) -> impl Future<Output = FetchResult> + Send;
}

/// [`PageSource`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Builds the HTTP client from the crawler configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

impl PageSource for HttpSource {
    async fn get(&self, url: &Url) -> FetchResult {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return classify_error(e),
        };

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return FetchResult::NetworkFailure {
                error: format!("HTTP {}", status.as_u16()),
                status: Some(status.as_u16()),
            };
        }

        match response.text().await {
            Ok(body) => FetchResult::Success { final_url, body },
            Err(e) => classify_error(e),
        }
    }
}

/// Maps a `reqwest` error onto the fetch failure variants
fn classify_error(e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        FetchResult::Timeout
    } else if e.is_redirect() {
        FetchResult::NetworkFailure {
            error: "Too many redirects".to_string(),
            status: None,
        }
    } else if e.is_connect() {
        FetchResult::NetworkFailure {
            error: "Connection refused".to_string(),
            status: None,
        }
    } else {
        FetchResult::NetworkFailure {
            error: e.to_string(),
            status: e.status().map(|s| s.as_u16()),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client follows up to `max-redirects` hops itself; the final URL is read back
/// from the response.
///
/// # Example
///
/// ```no_run
/// use lexi_crawl::config::Config;
/// use lexi_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.crawler.timeout_secs))
        .redirect(Policy::limited(config.crawler.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues requests one at a time, honoring robots.txt and the crawl delay
pub struct Fetcher<S> {
    source: S,
    pacer: Pacer,
}

impl<S: PageSource> Fetcher<S> {
    /// Creates a fetcher over `source`
    pub fn new(source: S) -> Self {
        Self {
            source,
            pacer: Pacer::new(),
        }
    }

    /// Fetches a crawl target
    ///
    /// Disallowed URLs return [`FetchResult::Disallowed`] without a request or a wait.
    /// Otherwise waits until `policy.crawl_delay()` has elapsed since the previous
    /// request, issues the GET, and normalizes the final URL.
    pub async fn fetch(&mut self, url: &Url, policy: &PolitenessPolicy) -> FetchResult {
        if !policy.can_fetch(url) {
            return FetchResult::Disallowed;
        }

        self.paced_get(url, policy.crawl_delay()).await
    }

    /// Fetches a supporting resource (robots.txt, sitemap) without a permission check
    pub async fn fetch_resource(&mut self, url: &Url, delay: Duration) -> FetchResult {
        self.paced_get(url, delay).await
    }

    async fn paced_get(&mut self, url: &Url, delay: Duration) -> FetchResult {
        self.pacer.wait(delay).await;
        self.pacer.record_request();

        match self.source.get(url).await {
            FetchResult::Success { final_url, body } => FetchResult::Success {
                final_url: normalize(final_url),
                body,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robots::ParsedRobots;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    /// Answers every request with the same redirecting page and counts requests
    #[derive(Clone, Default)]
    struct CountingSource {
        requests: Arc<AtomicUsize>,
    }

    impl PageSource for CountingSource {
        async fn get(&self, _url: &Url) -> FetchResult {
            self.requests.fetch_add(1, Ordering::SeqCst);
            FetchResult::Success {
                final_url: Url::parse("http://example.com/landing?session=42#top").unwrap(),
                body: "<p>hi</p>".to_string(),
            }
        }
    }

    fn policy(robots: &str, delay: Duration) -> PolitenessPolicy {
        PolitenessPolicy::new(ParsedRobots::from_content(robots), "TestBot", delay)
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&Config::default()).is_ok());
    }

    #[tokio::test]
    async fn test_disallowed_sends_no_request() {
        let source = CountingSource::default();
        let mut fetcher = Fetcher::new(source.clone());
        let policy = policy("User-agent: *\nDisallow: /private", Duration::ZERO);

        let url = Url::parse("http://example.com/private/page").unwrap();
        let result = fetcher.fetch(&url, &policy).await;

        assert!(matches!(result, FetchResult::Disallowed));
        assert!(!result.is_failure());
        assert_eq!(source.requests.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_final_url_is_normalized() {
        let mut fetcher = Fetcher::new(CountingSource::default());
        let policy = policy("", Duration::ZERO);

        let url = Url::parse("http://example.com/start").unwrap();
        match fetcher.fetch(&url, &policy).await {
            FetchResult::Success { final_url, .. } => {
                assert_eq!(final_url.as_str(), "http://example.com/landing");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_consecutive_fetches_are_paced() {
        let mut fetcher = Fetcher::new(CountingSource::default());
        let delay = Duration::from_millis(150);
        let policy = policy("", delay);
        let url = Url::parse("http://example.com/").unwrap();

        let start = Instant::now();
        fetcher.fetch(&url, &policy).await;
        fetcher.fetch(&url, &policy).await;

        assert!(start.elapsed() >= delay);
    }

    #[tokio::test]
    async fn test_disallowed_does_not_wait() {
        let mut fetcher = Fetcher::new(CountingSource::default());
        let policy = policy("User-agent: *\nDisallow: /no", Duration::from_secs(30));

        let allowed = Url::parse("http://example.com/yes").unwrap();
        let denied = Url::parse("http://example.com/no").unwrap();

        fetcher.fetch(&allowed, &policy).await;
        let start = Instant::now();
        fetcher.fetch(&denied, &policy).await;

        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
