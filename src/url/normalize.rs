use crate::UrlError;
use url::Url;

/// Normalizes a URL string into the identity form used by the frontier and the index
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not HTTP(S) or has no host
/// 3. Apply [`normalize`]: drop the query string and the fragment
///
/// Host lowercasing and dot-segment removal come from the `url` parser itself.
/// The path is otherwise kept byte-for-byte, including trailing slashes.
///
/// # Examples
///
/// ```
/// use lexi_crawl::url::normalize_url;
///
/// let url = normalize_url("http://Example.com/view/Afghanistan-1?page=2#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/view/Afghanistan-1");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(normalize(url))
}

/// Strips the query string and fragment from an already-parsed URL
///
/// Used directly on redirect targets, which `reqwest` hands back as a parsed [`Url`].
pub fn normalize(mut url: Url) -> Url {
    url.set_query(None);
    url.set_fragment(None);
    url
}
