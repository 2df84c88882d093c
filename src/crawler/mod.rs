//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The FIFO frontier of discovered URLs
//! - Paced HTTP fetching that honors robots.txt
//! - HTML parsing into links and terms
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod pacer;
mod parser;

pub use coordinator::{crawl, Coordinator, CrawlOutcome};
pub use fetcher::{build_http_client, FetchResult, Fetcher, HttpSource, PageSource};
pub use frontier::Frontier;
pub use pacer::Pacer;
pub use parser::{clean_term, extract_links, extract_terms, parse_page, stripped_strings, ParsedPage};
