//! Configuration module for Lexi-Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing keys fall back to the defaults in [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use lexi_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("lexi.toml")).unwrap();
//! println!("Crawling {}", config.site.root_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
