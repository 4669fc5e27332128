//! Crawl scheduling and execution
//!
//! This module contains the core crawling machinery, including:
//! - The priority frontier and eligible-link selection
//! - HTTP fetching and media-type classification
//! - HTML link extraction
//! - The policy trait that customizes ranking, filtering and outcomes
//! - The driver that steps a crawl session to completion

mod driver;
mod fetcher;
mod frontier;
mod parser;
mod policy;

pub use driver::{CrawlOptions, Crawler, StepStatus};
pub use fetcher::{build_http_client, Fetch, FetchFailure, FetchOptions, FetchedPage, HttpFetcher};
pub use frontier::{Frontier, FrontierEntry, Link};
pub use parser::{HtmlLinkExtractor, LinkExtractor};
pub use policy::{CrawlMethod, CrawlPolicy, DefaultPolicy, DomainFilterPolicy};

use std::sync::Arc;
use std::time::Duration;

use crate::cache::MemoryCache;
use crate::config::Config;
use crate::CrawlError;

/// Builds a crawl session from configuration, with the caller's policy
///
/// Wires up the HTTP fetcher (plus the in-memory page cache when enabled),
/// the HTML link extractor, and the session options, then seeds the
/// frontier with the configured URLs.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `policy` - The policy whose hooks steer this session
///
/// # Returns
///
/// * `Ok(Crawler)` - A session ready to step or run
/// * `Err(CrawlError)` - The HTTP client could not be constructed
pub fn build_crawler<P: CrawlPolicy>(config: &Config, policy: P) -> Result<Crawler<P>, CrawlError> {
    let fetch_options = FetchOptions {
        timeout: Duration::from_millis(config.fetch.timeout_ms),
        max_redirects: config.fetch.max_redirects,
        proxy: config.fetch.proxy.clone(),
        user_agent: config.user_agent.header_value(),
    };

    let fetcher = if config.fetch.cached {
        let ttl = chrono::Duration::seconds(config.fetch.cache_ttl_secs as i64);
        HttpFetcher::with_cache(&fetch_options, Arc::new(MemoryCache::with_ttl(ttl)))?
    } else {
        HttpFetcher::new(&fetch_options)?
    };

    let options = CrawlOptions {
        delay: Duration::from_millis(config.crawler.delay_ms),
        strict_order: config.crawler.strict_order,
        method: config.crawler.method,
        max_pages: config.crawler.max_pages,
    };

    let seeds = config
        .crawler
        .seeds
        .iter()
        .map(|seed| Link::new(seed.as_str()))
        .collect();

    Ok(Crawler::new(
        seeds,
        options,
        policy,
        Box::new(fetcher),
        Box::new(HtmlLinkExtractor::new()),
    ))
}

/// Runs a complete crawl operation
///
/// This is the main entry point for configuration-driven crawls. It
/// applies the `[filter]` allow and deny lists and discards page bodies;
/// callers who want the content implement [`CrawlPolicy`] themselves and
/// pass it to [`build_crawler`].
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(())` - Crawl ran to completion
/// * `Err(CrawlError)` - Setup failed before the first fetch
pub async fn crawl(config: Config) -> Result<(), CrawlError> {
    let policy = DomainFilterPolicy::new(
        config.filter.allow.clone(),
        config.filter.deny.clone(),
    );
    let mut crawler = build_crawler(&config, policy)?;
    crawler.run().await;
    Ok(())
}
