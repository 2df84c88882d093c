//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: where a crawl is in its lifecycle (idle, seeding, draining, persisted)
//! - `StopHandle`: shared flag for stopping a running crawl between pages
//! - `InterruptRouter`: sends Ctrl-C to the running crawl, or ends the session

mod crawl_phase;
mod stop;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use stop::{InterruptRouter, StopHandle};
