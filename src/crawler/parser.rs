//! HTML parser for extracting links and index terms
//!
//! This module handles parsing fetched pages to extract:
//! - Links to follow (from `<a href>` tags), resolved and normalized
//! - Terms: whitespace-separated tokens of the visible text, edge-trimmed

use crate::url::normalize;
use scraper::{Html, Selector};
use url::Url;

/// Characters stripped from the end of a token
const TRAILING_PUNCTUATION: &[char] = &[':', ',', ')'];

/// Characters stripped from the start of a token
const LEADING_PUNCTUATION: &[char] = &['('];

/// Elements whose text is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// All links found on the page (absolute, normalized, possibly repeated)
    pub links: Vec<Url>,

    /// Every term occurrence on the page, in document order
    pub terms: Vec<String>,
}

/// Parses HTML content and extracts links and terms in one pass over the document
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The URL the content was served from, for resolving relative links
///
/// # Example
///
/// ```
/// use lexi_crawl::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/view/1?page=2">Afghanistan (AF),</a></body></html>"#;
/// let base_url = Url::parse("http://example.com/index").unwrap();
/// let parsed = parse_page(html, &base_url);
/// assert_eq!(parsed.links[0].as_str(), "http://example.com/view/1");
/// assert_eq!(parsed.terms, vec!["Afghanistan", "AF"]);
/// ```
pub fn parse_page(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        links: links_in(&document, base_url),
        terms: terms_in(&document).map(str::to_string).collect(),
    }
}

/// Extracts all followable links from raw HTML
pub fn extract_links(base_url: &Url, html: &str) -> Vec<Url> {
    links_in(&Html::parse_document(html), base_url)
}

/// Extracts all terms from raw HTML
pub fn extract_terms(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    terms_in(&document).map(str::to_string).collect()
}

fn links_in(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to a normalized absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links (same page anchors)
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }

    Some(normalize(absolute_url))
}

/// Lazily yields the non-empty, whitespace-stripped text nodes of the document
///
/// Text inside `<script>`, `<style>` and `<template>` is skipped.
pub fn stripped_strings(document: &Html) -> impl Iterator<Item = &str> + '_ {
    document.tree.root().descendants().filter_map(|node| {
        let text = node.value().as_text()?;

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.iter().any(|name| *name == element.name()))
        });
        if hidden {
            return None;
        }

        let stripped = text.trim();
        (!stripped.is_empty()).then_some(stripped)
    })
}

fn terms_in(document: &Html) -> impl Iterator<Item = &str> + '_ {
    stripped_strings(document)
        .flat_map(str::split_whitespace)
        .filter_map(clean_term)
}

/// Turns a whitespace-delimited token into a term
///
/// Tokens without an ASCII letter are rejected. Kept tokens lose any run of
/// trailing `:` `,` `)` and then any run of leading `(`; interior punctuation
/// is untouched. A kept token always retains its letters, so trimming never
/// empties it.
///
/// ```
/// use lexi_crawl::crawler::clean_term;
///
/// assert_eq!(clean_term("(Hello),"), Some("Hello"));
/// assert_eq!(clean_term("42"), None);
/// assert_eq!(clean_term("C3PO"), Some("C3PO"));
/// ```
pub fn clean_term(token: &str) -> Option<&str> {
    if !token.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    Some(
        token
            .trim_end_matches(TRAILING_PUNCTUATION)
            .trim_start_matches(LEADING_PUNCTUATION),
    )
}
