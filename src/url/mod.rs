//! URL handling module for Lexi-Crawl
//!
//! Every URL that crosses a boundary (seed, sitemap entry, discovered link,
//! redirect target) goes through [`normalize_url`] or [`normalize`] before it is
//! compared, queued or recorded. The frontier's dedup relies on that.

mod normalize;
mod scope;

pub use normalize::{normalize, normalize_url};
pub use scope::SiteScope;
