//! Sitemap parsing
//!
//! Sitemaps are read leniently with the HTML parser: every `<loc>` element's text is
//! a candidate seed, whatever the surrounding `<urlset>`/`<sitemapindex>` markup.

use crate::crawler::FetchResult;
use crate::robots::PolitenessError;
use scraper::{Html, Selector};
use url::Url;

/// Extracts the text of every `<loc>` element, trimmed, in document order
pub fn parse_sitemap(body: &str) -> Vec<String> {
    let document = Html::parse_document(body);
    let Ok(selector) = Selector::parse("loc") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|loc| !loc.is_empty())
        .collect()
}

/// Interprets the response to a sitemap request
///
/// # Returns
///
/// * `Ok(Vec<String>)` - The `<loc>` entries, not yet normalized or filtered
/// * `Err(PolitenessError::SitemapUnavailable)` - The sitemap could not be retrieved
pub fn sitemap_entries(location: &Url, result: FetchResult) -> Result<Vec<String>, PolitenessError> {
    let reason = match result {
        FetchResult::Success { body, .. } => return Ok(parse_sitemap(&body)),
        FetchResult::Timeout => "request timed out".to_string(),
        FetchResult::NetworkFailure { error, .. } => error,
        FetchResult::Disallowed => "disallowed by robots.txt".to_string(),
    };

    Err(PolitenessError::SitemapUnavailable {
        url: location.to_string(),
        reason,
    })
}
