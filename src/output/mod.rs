//! Output module for crawl reports and query results
//!
//! This module handles:
//! - Recording crawl statistics and rendering the end-of-build report
//! - Rendering postings and ranked search results for the command shell

mod display;
pub mod stats;

pub use display::{render_postings, render_results};
pub use stats::{render_statistics, CrawlStatistics};
