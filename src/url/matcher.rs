/// Checks if a domain matches an allow/deny list pattern.
///
/// Two pattern forms are supported:
/// 1. Exact: "example.com" matches only "example.com"
/// 2. Wildcard: "*.example.com" matches the bare domain and any depth of
///    subdomain ("example.com", "blog.example.com", "api.v2.example.com")
///
/// Domains are expected to arrive already lowercased (the way
/// [`crate::url::host`] produces them); matching itself is case-sensitive.
///
/// # Examples
///
/// ```
/// use spindrift::url::matches_pattern;
///
/// assert!(matches_pattern("example.com", "example.com"));
/// assert!(!matches_pattern("example.com", "blog.example.com"));
///
/// assert!(matches_pattern("*.example.com", "example.com"));
/// assert!(matches_pattern("*.example.com", "api.v2.example.com"));
/// assert!(!matches_pattern("*.example.com", "example.org"));
/// ```
pub fn matches_pattern(pattern: &str, domain: &str) -> bool {
    if let Some(base) = pattern.strip_prefix("*.") {
        // Wildcard: the base domain itself or any subdomain of it
        domain == base || domain.ends_with(&format!(".{}", base))
    } else {
        domain == pattern
    }
}

/// Checks if a domain matches any pattern in a list.
///
/// An empty list matches nothing; callers decide what that means (an empty
/// deny list blocks nothing, an empty allow list is typically treated as
/// allow-all before this function is consulted).
pub fn matches_any(patterns: &[String], domain: &str) -> bool {
    patterns.iter().any(|p| matches_pattern(p, domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(matches_pattern("example.com", "example.com"));
        assert!(!matches_pattern("example.com", "other.com"));
        assert!(!matches_pattern("example.com", "blog.example.com"));
    }

    #[test]
    fn test_wildcard_matches_bare_domain_and_subdomains() {
        assert!(matches_pattern("*.example.com", "example.com"));
        assert!(matches_pattern("*.example.com", "blog.example.com"));
        assert!(matches_pattern("*.example.com", "deep.nested.sub.example.com"));
    }

    #[test]
    fn test_wildcard_rejects_lookalikes() {
        assert!(!matches_pattern("*.example.com", "notexample.com"));
        assert!(!matches_pattern("*.example.com", "myexample.com"));
        assert!(!matches_pattern("*.example.com", "example.com.org"));
        assert!(!matches_pattern("*.example.com", "example.org"));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        // Callers lowercase domains before matching.
        assert!(!matches_pattern("example.com", "EXAMPLE.COM"));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(!matches_pattern("*.example.com", ""));
        assert!(!matches_pattern("", "example.com"));
        assert!(matches_pattern("", ""));
    }

    #[test]
    fn test_multi_label_base() {
        assert!(matches_pattern("*.co.uk", "example.co.uk"));
        assert!(matches_pattern("*.co.uk", "blog.example.co.uk"));
        assert!(!matches_pattern("*.co.uk", "co.jp"));
    }

    #[test]
    fn test_matches_any() {
        let patterns = vec!["docs.example.com".to_string(), "*.example.org".to_string()];

        assert!(matches_any(&patterns, "docs.example.com"));
        assert!(matches_any(&patterns, "wiki.example.org"));
        assert!(!matches_any(&patterns, "example.com"));
    }

    #[test]
    fn test_matches_any_empty_list() {
        assert!(!matches_any(&[], "example.com"));
    }
}
