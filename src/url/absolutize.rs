use url::Url;

/// Resolves an extracted `href` against the page it was found on.
///
/// Relative references are joined against `base`, which should be the final
/// URL of the fetched page (after redirects) so that relative links on a
/// redirected page resolve where the server actually put them.
///
/// Links that cannot lead to a fetchable page are discarded: empty hrefs,
/// same-page fragments, and `javascript:`, `mailto:`, `tel:` and `data:`
/// pseudo-links, as well as anything that resolves to a non-http(s) scheme.
///
/// # Arguments
///
/// * `href` - The raw href attribute value
/// * `base` - The absolute URL of the page the href appeared on
///
/// # Returns
///
/// * `Some(String)` - The absolute http(s) URL
/// * `None` - If the href is not a followable web link
///
/// # Examples
///
/// ```
/// use spindrift::url::absolutize;
///
/// assert_eq!(
///     absolutize("/about", "https://example.com/index.html"),
///     Some("https://example.com/about".to_string())
/// );
/// assert_eq!(
///     absolutize("https://other.org/", "https://example.com/"),
///     Some("https://other.org/".to_string())
/// );
/// assert_eq!(absolutize("#top", "https://example.com/"), None);
/// assert_eq!(absolutize("mailto:hi@example.com", "https://example.com/"), None);
/// ```
pub fn absolutize(href: &str, base: &str) -> Option<String> {
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

    let base = Url::parse(base).ok()?;
    let resolved = base.join(href).ok()?;

    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}
