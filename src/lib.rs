//! Lexi-Crawl: a polite single-site crawler and word index
//!
//! This crate crawls one website under its robots.txt rules, builds a word-level
//! inverted index of the pages it fetched, persists the index as JSON and answers
//! ranked multi-word queries against it.

pub mod config;
pub mod crawler;
pub mod index;
pub mod output;
pub mod robots;
pub mod shell;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Lexi-Crawl operations
#[derive(Debug, Error)]
pub enum LexiError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid crawl phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Lexi-Crawl operations
pub type Result<T> = std::result::Result<T, LexiError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use index::{InvertedIndex, Posting, SearchHit};
pub use state::CrawlPhase;
pub use url::normalize_url;
