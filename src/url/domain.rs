use url::Url;

/// Builds the cache key for per-host state: lowercase host plus explicit port
///
/// # Examples
///
/// ```
/// use url::Url;
/// use monagent::url::host_key;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(host_key(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(host_key(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Derives `<scheme>://<host>[:port]/robots.txt` for a target URL
///
/// Returns None if the URL has no host.
pub fn robots_url(url: &Url) -> Option<Url> {
    let key = host_key(url)?;
    Url::parse(&format!("{}://{}/robots.txt", url.scheme(), key)).ok()
}
