//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one crawl of one site through its lifecycle:
//! - Seeding: resolve the politeness policy and fill the frontier from the root
//!   URL and any advertised sitemaps
//! - Draining: fetch, parse and index pages in discovery order until the
//!   frontier is empty, a page cap is hit, or the crawl is stopped
//! - Persisted: hand the finished index to an [`IndexStore`]

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, HttpSource, PageSource};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::parse_page;
use crate::crawler::FetchResult;
use crate::index::{IndexBuilder, InvertedIndex};
use crate::output::CrawlStatistics;
use crate::robots::{robots_url, sitemap_entries, PolitenessPolicy};
use crate::state::{CrawlPhase, StopHandle};
use crate::storage::{IndexStore, JsonIndexStore};
use crate::url::{normalize_url, SiteScope};
use crate::LexiError;
use chrono::Utc;
use std::time::Duration;
use url::Url;

/// What a finished crawl hands back
#[derive(Debug)]
pub struct CrawlOutcome {
    /// The index as it was persisted
    pub index: InvertedIndex,

    /// Counters collected while crawling
    pub stats: CrawlStatistics,
}

/// Main crawler coordinator structure
pub struct Coordinator<S> {
    config: Config,
    root: Url,
    scope: SiteScope,
    fetcher: Fetcher<S>,
    policy: PolitenessPolicy,
    frontier: Frontier,
    builder: IndexBuilder,
    phase: CrawlPhase,
    stats: CrawlStatistics,
    stop: StopHandle,
}

impl<S: PageSource> Coordinator<S> {
    /// Creates a coordinator in the `Idle` phase
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `source` - Where pages are fetched from
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to seed
    /// * `Err(LexiError)` - The configured root URL is not a crawlable http(s) URL
    pub fn new(config: Config, source: S) -> Result<Self, LexiError> {
        let root = normalize_url(&config.site.root_url)?;
        let scope = SiteScope::new(&root);
        let policy = PolitenessPolicy::unavailable(
            &config.user_agent.crawler_name,
            default_delay(&config),
        );

        Ok(Self {
            config,
            root,
            scope,
            fetcher: Fetcher::new(source),
            policy,
            frontier: Frontier::new(),
            builder: IndexBuilder::new(),
            phase: CrawlPhase::Idle,
            stats: CrawlStatistics::start(),
            stop: StopHandle::new(),
        })
    }

    /// Returns a handle that stops the crawl between pages
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn policy(&self) -> &PolitenessPolicy {
        &self.policy
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// The index recorded so far
    pub fn index(&self) -> &InvertedIndex {
        self.builder.snapshot()
    }

    pub fn statistics(&self) -> &CrawlStatistics {
        &self.stats
    }

    fn advance(&mut self, to: CrawlPhase) -> Result<(), LexiError> {
        if !self.phase.can_transition_to(to) {
            return Err(LexiError::InvalidTransition {
                from: self.phase,
                to,
            });
        }

        tracing::debug!("Crawl phase {} -> {}", self.phase, to);
        self.phase = to;
        Ok(())
    }

    /// Resolves the politeness policy and seeds the frontier
    ///
    /// The root URL is queued first, followed by every permitted in-scope
    /// `<loc>` entry of every advertised sitemap. An unreachable robots.txt or
    /// sitemap is logged and the crawl carries on.
    pub async fn seed(&mut self) -> Result<(), LexiError> {
        self.advance(CrawlPhase::Seeding)?;

        let user_agent = self.config.user_agent.crawler_name.clone();
        let default_delay = default_delay(&self.config);

        let location = robots_url(&self.root);
        tracing::info!("Fetching {}", location);
        let result = self.fetcher.fetch_resource(&location, default_delay).await;

        self.policy = match PolitenessPolicy::from_fetch(&location, result, &user_agent, default_delay)
        {
            Ok(policy) => policy,
            Err(e) => {
                tracing::warn!("{}; crawling without restrictions", e);
                PolitenessPolicy::unavailable(&user_agent, default_delay)
            }
        };

        tracing::info!(
            "Crawl delay for {} is {:?}",
            self.root.host_str().unwrap_or_default(),
            self.policy.crawl_delay()
        );

        let root = self.root.clone();
        self.frontier.enqueue(root);

        let sitemaps = self.policy.sitemap_locations().to_vec();
        if sitemaps.is_empty() {
            tracing::info!("No sitemap advertised, seeding from the root URL only");
        }

        for sitemap in sitemaps {
            let result = self
                .fetcher
                .fetch_resource(&sitemap, self.policy.crawl_delay())
                .await;

            let entries = match sitemap_entries(&sitemap, result) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("{}", e);
                    continue;
                }
            };

            let mut seeded = 0u64;
            for entry in entries {
                let url = match normalize_url(&entry) {
                    Ok(url) => url,
                    Err(e) => {
                        tracing::debug!("Skipping sitemap entry {}: {}", entry, e);
                        continue;
                    }
                };

                if !self.scope.contains(&url) || !self.policy.can_fetch(&url) {
                    continue;
                }

                if self.frontier.enqueue(url) {
                    seeded += 1;
                }
            }

            tracing::info!("Seeded {} URLs from {}", seeded, sitemap);
            self.stats.sitemap_seeds += seeded;
        }

        Ok(())
    }

    /// Fetches and indexes pages until the frontier is exhausted
    ///
    /// Stops early when the [`StopHandle`] fires or `max-pages` pages have been
    /// indexed. Whatever was recorded up to that point stays valid.
    pub async fn drain(&mut self) -> Result<(), LexiError> {
        self.advance(CrawlPhase::Draining)?;

        let progress_interval = self.config.crawler.progress_interval.max(1) as u64;
        let max_pages = self.config.crawler.max_pages.map(|max| max as u64);

        while let Some(url) = self.frontier.dequeue() {
            if self.stop.is_stopped() {
                tracing::info!("Crawl stopped with {} URLs still queued", self.frontier.len() + 1);
                self.stats.stopped_early = true;
                break;
            }

            if max_pages.is_some_and(|max| self.stats.pages_indexed >= max) {
                tracing::info!("Reached the limit of {} pages", self.stats.pages_indexed);
                self.stats.stopped_early = true;
                break;
            }

            tracing::debug!("Processing URL: {}", url);

            match self.fetcher.fetch(&url, &self.policy).await {
                FetchResult::Success { final_url, body } => {
                    if self.process_page(&url, final_url, &body) {
                        self.stats.pages_indexed += 1;

                        if self.stats.pages_indexed % progress_interval == 0 {
                            tracing::info!(
                                "Progress: {} pages indexed, {} in frontier",
                                self.stats.pages_indexed,
                                self.frontier.len()
                            );
                        }
                    }
                }
                FetchResult::Disallowed => {
                    tracing::debug!("URL {} disallowed by robots.txt", url);
                    self.stats.disallowed += 1;
                }
                FetchResult::Timeout => {
                    tracing::warn!("Connection timeout for {}", url);
                    self.stats.timeouts += 1;
                }
                FetchResult::NetworkFailure { error, .. } => {
                    tracing::warn!("Failed to fetch {}: {}", url, error);
                    self.stats.network_failures += 1;
                }
            }
        }

        tracing::info!(
            "Crawl finished: {} pages indexed, {} URLs visited, {} terms",
            self.stats.pages_indexed,
            self.frontier.visited_count(),
            self.builder.snapshot().term_count()
        );

        Ok(())
    }

    /// Records one fetched page and queues its links
    ///
    /// # Returns
    ///
    /// `false` if the page was a redirect onto a URL that is already queued or
    /// visited, in which case nothing is recorded
    fn process_page(&mut self, requested: &Url, final_url: Url, body: &str) -> bool {
        if final_url != *requested {
            if self.frontier.is_known(&final_url) {
                tracing::debug!("{} redirected to known page {}, skipping", requested, final_url);
                self.stats.duplicate_redirects += 1;
                self.frontier.mark_visited(requested);
                return false;
            }
            tracing::debug!("{} redirected to {}", requested, final_url);
            self.frontier.mark_visited(requested);
        }

        self.frontier.mark_visited(&final_url);

        let page = parse_page(body, &final_url);

        for link in page.links {
            if self.scope.contains(&link) {
                self.frontier.enqueue(link);
            }
        }

        self.builder.record_page(final_url.as_str(), &page.terms)
    }

    /// Writes the index to `store` and finishes the crawl
    pub fn persist<T: IndexStore>(&mut self, store: &T) -> Result<(), LexiError> {
        self.stats.distinct_terms = self.builder.snapshot().term_count() as u64;
        store.save(self.builder.snapshot())?;
        self.advance(CrawlPhase::Persisted)?;
        self.stats.finished_at = Some(Utc::now());
        Ok(())
    }

    /// Runs seeding, draining and persistence into `store`
    pub async fn run_with_store<T: IndexStore>(mut self, store: &T) -> Result<CrawlOutcome, LexiError> {
        self.seed().await?;
        self.drain().await?;
        self.persist(store)?;

        Ok(CrawlOutcome {
            index: self.builder.into_index(),
            stats: self.stats,
        })
    }

    /// Runs the whole crawl, saving the index to the configured `index-path`
    pub async fn run(self) -> Result<CrawlOutcome, LexiError> {
        let store = JsonIndexStore::new(&self.config.output.index_path);
        self.run_with_store(&store).await
    }
}

fn default_delay(config: &Config) -> Duration {
    Duration::from_millis(config.crawler.default_crawl_delay_ms)
}

/// Crawls the configured site over HTTP and saves the index
///
/// # Example
///
/// ```no_run
/// use lexi_crawl::config::Config;
/// use lexi_crawl::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let outcome = crawl(Config::default(), None).await?;
/// println!("{} terms", outcome.index.term_count());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, stop: Option<StopHandle>) -> Result<CrawlOutcome, LexiError> {
    let source = HttpSource::new(&config)?;
    let mut coordinator = Coordinator::new(config, source)?;
    if let Some(stop) = stop {
        coordinator.stop = stop;
    }
    coordinator.run().await
}
