//! Crawl policy: the caller-facing decision surface
//!
//! Everything a caller may want to customize about a crawl without touching
//! the scheduling machinery lives behind one trait:
//! - `rank`: how desirable a discovered link is
//! - `follow`: whether a discovered link is scheduled at all
//! - `normalize`: canonical form of a URL before deduplication
//! - `visit`/`fail`: outcome callbacks per processed page
//!
//! Every method has a default body, so implementors override only what they
//! care about. [`DefaultPolicy`] is the stock behavior as a value.

use serde::Deserialize;

use super::frontier::Link;
use crate::url::{authority, host, matches_any};

/// Traversal preference used by the default ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMethod {
    /// Prefer exhausting the current domain before branching out
    #[default]
    Depth,
    /// Prefer branching out to other domains early
    Breadth,
}

/// Caller-supplied crawl decisions.
///
/// Hook signatures are infallible: a decision is always produced. Overrides
/// that panic propagate to the caller of `step`; the session's bookkeeping
/// is updated before the outcome callbacks run, so state stays consistent
/// either way.
pub trait CrawlPolicy {
    /// Scores a discovered link in `[0, 1]`; higher means visit sooner.
    ///
    /// The frontier stores `1 - rank` as the priority, so a rank of 1.0
    /// sorts ahead of everything except seeds.
    ///
    /// The default deprioritizes parameterized URLs (0.7), scores
    /// same-domain links by method (1.0 under [`CrawlMethod::Depth`], 0.8
    /// under [`CrawlMethod::Breadth`]) and cross-domain links 0.9.
    fn rank(&self, link: &Link, referrer: &Link, method: CrawlMethod) -> f64 {
        if link.url.contains('?') {
            return 0.7;
        }
        if authority(&link.url) == authority(&referrer.url) {
            match method {
                CrawlMethod::Depth => 1.0,
                CrawlMethod::Breadth => 0.8,
            }
        } else {
            0.9
        }
    }

    /// Decides whether a discovered link is scheduled at all.
    ///
    /// This is the single gate in front of the registry: a refused link is
    /// not remembered and may be offered again when rediscovered. Robots
    /// exclusion, domain allow-lists and file-type filters belong here.
    fn follow(&self, _link: &Link, _referrer: &Link) -> bool {
        true
    }

    /// Rewrites a URL to its canonical form before deduplication.
    ///
    /// Applied to every extracted link, so equivalent spellings collapse to
    /// one frontier entry. Must be infallible; the default is identity.
    /// [`crate::url::strip_fragment`] and
    /// [`crate::url::strip_tracking_params`] are made for overrides of this
    /// hook.
    fn normalize(&self, url: &str) -> String {
        url.to_string()
    }

    /// Called once per successfully downloaded HTML page
    fn visit(&mut self, _link: &Link, _referrer: Option<&Link>, _body: &str) {}

    /// Called once per link whose fetch failed or was not HTML
    fn fail(&mut self, _link: &Link, _referrer: Option<&Link>) {}
}

/// The default crawl behavior as a standalone value
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl CrawlPolicy for DefaultPolicy {}

/// A policy that gates `follow` on wildcard domain allow/deny lists.
///
/// Deny wins over allow; an empty allow list means allow-all. Links whose
/// host cannot be determined are refused, since no pattern could vouch for
/// them. Every other hook keeps its default behavior.
#[derive(Debug, Clone, Default)]
pub struct DomainFilterPolicy {
    allow: Vec<String>,
    deny: Vec<String>,
}

impl DomainFilterPolicy {
    /// Creates a filter from allow and deny pattern lists
    ///
    /// Patterns are exact domains ("example.com") or wildcards
    /// ("*.example.com", which also matches the bare domain).
    pub fn new(allow: Vec<String>, deny: Vec<String>) -> Self {
        Self { allow, deny }
    }

    /// Checks a domain against the lists, deny first
    pub fn permits(&self, domain: &str) -> bool {
        if matches_any(&self.deny, domain) {
            return false;
        }
        self.allow.is_empty() || matches_any(&self.allow, domain)
    }
}

impl CrawlPolicy for DomainFilterPolicy {
    fn follow(&self, link: &Link, _referrer: &Link) -> bool {
        match host(&link.url) {
            Some(domain) => self.permits(&domain),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn internal_pair() -> (Link, Link) {
        (
            Link::new("https://a.test/deeper/page"),
            Link::new("https://a.test/"),
        )
    }

    #[test]
    fn test_default_rank_query_component() {
        let policy = DefaultPolicy;
        let referrer = Link::new("https://a.test/");

        let internal = Link::new("https://a.test/search?q=rust");
        let external = Link::new("https://b.test/search?q=rust");

        // The query check comes first, for internal and external alike.
        assert_eq!(policy.rank(&internal, &referrer, CrawlMethod::Depth), 0.7);
        assert_eq!(policy.rank(&external, &referrer, CrawlMethod::Depth), 0.7);
    }

    #[test]
    fn test_default_rank_internal_depends_on_method() {
        let policy = DefaultPolicy;
        let (link, referrer) = internal_pair();

        assert_eq!(policy.rank(&link, &referrer, CrawlMethod::Depth), 1.0);
        assert_eq!(policy.rank(&link, &referrer, CrawlMethod::Breadth), 0.8);
    }

    #[test]
    fn test_default_rank_external() {
        let policy = DefaultPolicy;
        let referrer = Link::new("https://a.test/");
        let link = Link::new("https://b.test/");

        assert_eq!(policy.rank(&link, &referrer, CrawlMethod::Depth), 0.9);
        assert_eq!(policy.rank(&link, &referrer, CrawlMethod::Breadth), 0.9);
    }

    #[test]
    fn test_default_rank_subdomain_is_external() {
        let policy = DefaultPolicy;
        let referrer = Link::new("https://a.test/");
        let link = Link::new("https://blog.a.test/");

        assert_eq!(policy.rank(&link, &referrer, CrawlMethod::Depth), 0.9);
    }

    #[test]
    fn test_default_rank_unparseable_urls_compare_internal() {
        // Both authorities come back as None, which compares equal.
        let policy = DefaultPolicy;
        let link = Link::new("not a url");
        let referrer = Link::new("also not a url");

        assert_eq!(policy.rank(&link, &referrer, CrawlMethod::Depth), 1.0);
    }

    #[test]
    fn test_default_follow_accepts_everything() {
        let policy = DefaultPolicy;
        let (link, referrer) = internal_pair();

        assert!(policy.follow(&link, &referrer));
    }

    #[test]
    fn test_default_normalize_is_identity() {
        let policy = DefaultPolicy;
        assert_eq!(
            policy.normalize("https://a.test/page?utm_source=x#frag"),
            "https://a.test/page?utm_source=x#frag"
        );
    }

    #[test]
    fn test_filter_deny_wins_over_allow() {
        let policy = DomainFilterPolicy::new(
            vec!["*.example.com".to_string()],
            vec!["private.example.com".to_string()],
        );
        let referrer = Link::new("https://example.com/");

        assert!(policy.follow(&Link::new("https://docs.example.com/"), &referrer));
        assert!(!policy.follow(&Link::new("https://private.example.com/"), &referrer));
    }

    #[test]
    fn test_filter_empty_allow_means_allow_all() {
        let policy = DomainFilterPolicy::new(vec![], vec!["spam.test".to_string()]);
        let referrer = Link::new("https://a.test/");

        assert!(policy.follow(&Link::new("https://anything.test/"), &referrer));
        assert!(!policy.follow(&Link::new("https://spam.test/offer"), &referrer));
    }

    #[test]
    fn test_filter_allow_list_restricts() {
        let policy = DomainFilterPolicy::new(vec!["*.a.test".to_string()], vec![]);
        let referrer = Link::new("https://a.test/");

        assert!(policy.follow(&Link::new("https://a.test/page"), &referrer));
        assert!(policy.follow(&Link::new("https://sub.a.test/page"), &referrer));
        assert!(!policy.follow(&Link::new("https://b.test/page"), &referrer));
    }

    #[test]
    fn test_filter_refuses_unparseable_urls() {
        let policy = DomainFilterPolicy::new(vec![], vec![]);
        let referrer = Link::new("https://a.test/");

        assert!(!policy.follow(&Link::new("not a url"), &referrer));
    }

    #[test]
    fn test_filter_matches_lowercased_host() {
        let policy = DomainFilterPolicy::new(vec!["a.test".to_string()], vec![]);
        let referrer = Link::new("https://a.test/");

        assert!(policy.follow(&Link::new("https://A.TEST/Page"), &referrer));
    }

    #[test]
    fn test_crawl_method_default_is_depth() {
        assert_eq!(CrawlMethod::default(), CrawlMethod::Depth);
    }
}
