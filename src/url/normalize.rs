use crate::{UrlError, UrlResult};
use url::Url;

/// Normalizes a target URL before fetch and before recording provenance
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Accept only `http` and `https` schemes
/// 3. Require a host
/// 4. When `strip_query` is set, drop the whole query component
///
/// Tracking parameters such as `gclid` or `gad_source` vary per visit, so
/// stripping keeps one canonical address per resource. Scheme, host, path and
/// fragment are left as the URL parser canonicalized them.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
/// * `strip_query` - Whether to discard the query component
///
/// # Examples
///
/// ```
/// use monagent::url::normalize_url;
///
/// let url = normalize_url("https://example.com/botox?gclid=abc&gad_source=1", true).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/botox");
/// ```
pub fn normalize_url(url_str: &str, strip_query: bool) -> UrlResult<Url> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    if strip_query {
        url.set_query(None);
    }

    Ok(url)
}
