use url::Url;

/// Extracts the authority component of a URL, the key used to group
/// requests for politeness accounting.
///
/// The authority is the lowercased host, followed by `:port` when the URL
/// carries an explicit non-default port. Two URLs on the same host but
/// different ports are treated as different authorities.
///
/// # Arguments
///
/// * `url` - The URL string to extract the authority from
///
/// # Returns
///
/// * `Some(String)` - The `host[:port]` grouping key
/// * `None` - If the URL cannot be parsed or has no host
///
/// # Examples
///
/// ```
/// use spindrift::url::authority;
///
/// assert_eq!(authority("https://Example.COM/path"), Some("example.com".to_string()));
/// assert_eq!(authority("http://example.com:8080/"), Some("example.com:8080".to_string()));
/// assert_eq!(authority("https://example.com:443/"), Some("example.com".to_string()));
/// assert_eq!(authority("not a url"), None);
/// ```
pub fn authority(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    match parsed.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Extracts the lowercased host of a URL, without any port.
///
/// Used for matching against wildcard domain patterns, which never carry
/// ports.
pub fn host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(|h| h.to_lowercase())
}
