//! Single-site crawl scope

use url::{Origin, Url};

/// The set of URLs that belong to the crawled site
///
/// A URL is in scope when its scheme, host and port match the site root.
#[derive(Debug, Clone)]
pub struct SiteScope {
    origin: Origin,
}

impl SiteScope {
    /// Creates a scope rooted at `root`
    pub fn new(root: &Url) -> Self {
        Self {
            origin: root.origin(),
        }
    }

    /// Returns true if `url` is on the same site as the root
    pub fn contains(&self, url: &Url) -> bool {
        url.origin() == self.origin
    }
}
