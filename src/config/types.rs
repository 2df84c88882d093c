use serde::Deserialize;

/// Site crawled when no configuration file is supplied
pub const DEFAULT_ROOT_URL: &str = "http://example.python-scraping.com/";

/// Main configuration structure for Lexi-Crawl
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// The single site this crawler indexes
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Root URL; robots.txt is resolved relative to it and it seeds the frontier
    pub root_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root_url: DEFAULT_ROOT_URL.to_string(),
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Delay between requests when robots.txt has no Crawl-delay (milliseconds)
    pub default_crawl_delay_ms: u64,

    /// Maximum redirect hops followed for a single fetch
    pub max_redirects: usize,

    /// Log a progress line every N indexed pages
    pub progress_interval: usize,

    /// Optional cap on the number of indexed pages
    pub max_pages: Option<usize>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            default_crawl_delay_ms: 0,
            max_redirects: 10,
            progress_interval: 20,
            max_pages: None,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler; also the token matched against robots.txt groups
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "LexiCrawl".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Full `User-Agent` header value, e.g. `LexiCrawl/0.1.0 (+https://example.com/bot)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the JSON index file
    pub index_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            index_path: "index.json".to_string(),
        }
    }
}
