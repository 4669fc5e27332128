use url::form_urlencoded;
use url::Url;

/// List of tracking query parameters removed by [`strip_tracking_params`]
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
    "ref",
    "source",
];

/// Removes the fragment component of a URL.
///
/// Fragments address positions within one document, so two URLs that differ
/// only by fragment are the same page to a crawler. Intended as a building
/// block for `normalize` policy overrides; returns the input unchanged when
/// it does not parse, because normalization must never lose a URL.
///
/// # Examples
///
/// ```
/// use spindrift::url::strip_fragment;
///
/// assert_eq!(strip_fragment("https://example.com/page#intro"), "https://example.com/page");
/// assert_eq!(strip_fragment("not a url"), "not a url");
/// ```
pub fn strip_fragment(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}

/// Removes tracking query parameters and sorts the survivors by key, so
/// URLs that differ only in tracker noise or parameter order collapse to
/// one frontier entry.
///
/// Removed parameters are the exact keys in `TRACKING_PARAMS` plus anything
/// with a `utm_` prefix. An emptied query string is dropped entirely.
/// Returns the input unchanged when it does not parse.
///
/// # Examples
///
/// ```
/// use spindrift::url::strip_tracking_params;
///
/// assert_eq!(
///     strip_tracking_params("https://example.com/page?b=2&utm_source=x&a=1"),
///     "https://example.com/page?a=1&b=2"
/// );
/// assert_eq!(
///     strip_tracking_params("https://example.com/page?utm_campaign=spring"),
///     "https://example.com/page"
/// );
/// ```
pub fn strip_tracking_params(url: &str) -> String {
    let mut parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return url.to_string(),
    };

    if parsed.query().is_none() {
        return parsed.to_string();
    }

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    params.sort_by(|a, b| a.0.cmp(&b.0));

    if params.is_empty() {
        parsed.set_query(None);
    } else {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &params {
            serializer.append_pair(key, value);
        }
        let query = serializer.finish();
        parsed.set_query(Some(&query));
    }

    parsed.to_string()
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    if TRACKING_PARAMS.contains(&key) {
        return true;
    }

    // Catches any utm parameter, not just the well-known five
    if key.starts_with("utm_") {
        return true;
    }

    false
}
