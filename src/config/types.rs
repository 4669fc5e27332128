use serde::Deserialize;

use crate::crawler::CrawlMethod;

/// Main configuration structure for Spindrift
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URLs the crawl starts from
    pub seeds: Vec<String>,

    /// Minimum time between requests to the same authority (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Never visit out of priority order, even while the best authority
    /// is cooling down
    #[serde(rename = "strict-order", default)]
    pub strict_order: bool,

    /// Traversal preference: "depth" or "breadth"
    #[serde(default)]
    pub method: CrawlMethod,

    /// Stop after this many processed pages
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u64>,
}

fn default_delay_ms() -> u64 {
    20_000
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Composes the `User-Agent` header value sent with every request
    ///
    /// Site operators see this string in their logs, so it carries both
    /// the contact URL and email.
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Per-request timeout (milliseconds)
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Redirect hops tolerated before a fetch fails
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Proxy URL applied to all requests
    #[serde(default)]
    pub proxy: Option<String>,

    /// Serve repeat fetches of the same URL from an in-memory cache
    #[serde(default = "default_cached")]
    pub cached: bool,

    /// How long a cached page stays fresh (seconds)
    #[serde(rename = "cache-ttl-secs", default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            proxy: None,
            cached: default_cached(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_redirects() -> usize {
    10
}

fn default_cached() -> bool {
    true
}

fn default_cache_ttl_secs() -> u64 {
    3_600
}

/// Domain filtering configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    /// Domain patterns the crawl may enter (e.g. "example.com" or
    /// "*.example.com"); an empty list allows every domain
    #[serde(default)]
    pub allow: Vec<String>,

    /// Domain patterns the crawl must never enter; deny wins over allow
    #[serde(default)]
    pub deny: Vec<String>,
}
