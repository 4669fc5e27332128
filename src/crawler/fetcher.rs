//! HTTP fetcher implementation
//!
//! This module handles downloading pages for the crawl:
//! - The [`Fetch`] trait, the narrow seam the driver consumes
//! - Building reqwest clients with proper user agent strings
//! - Redirect following with a bounded hop count
//! - Error classification into the [`FetchFailure`] taxonomy
//! - Optional fetch memoization through a [`FetchCache`]

use async_trait::async_trait;
use reqwest::{header, redirect::Policy, Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::cache::FetchCache;

/// A successfully downloaded resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Final URL after redirects; relative links resolve against this
    pub final_url: String,

    /// Lowercased media type from the Content-Type header, without
    /// parameters ("text/html", never "text/html; charset=utf-8")
    pub mime_type: String,

    /// Decoded response body
    pub body: String,
}

/// Categorized fetch failures
///
/// The driver treats every kind the same way (the link fails), but the kind
/// is preserved so callers and logs can tell a vanished page from a
/// rate-limiting host.
#[derive(Debug, Error)]
pub enum FetchFailure {
    #[error("request timed out for {url}")]
    Timeout { url: String },

    #[error("HTTP 404 Not Found for {url}")]
    NotFound { url: String },

    #[error("HTTP 403 Forbidden for {url}")]
    Forbidden { url: String },

    #[error("HTTP 400 Bad Request for {url}")]
    BadRequest { url: String },

    #[error("HTTP 401 Unauthorized for {url}")]
    Unauthorized { url: String },

    #[error("rate limited (HTTP {status}) for {url}")]
    RateLimited { url: String, status: u16 },

    #[error("too many redirects from {url}")]
    TooManyRedirects { url: String },

    #[error("fetch failed for {url}: {message}")]
    Generic { url: String, message: String },
}

/// The fetch seam the crawl driver consumes.
///
/// One call downloads one URL. `referrer` is the URL of the page the link
/// was discovered on, for implementations that send a Referer header.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str, referrer: Option<&str>) -> Result<FetchedPage, FetchFailure>;
}

/// Knobs for the reqwest-backed fetcher
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Total per-request timeout
    pub timeout: Duration,

    /// Redirect hops before the fetch fails with `TooManyRedirects`
    pub max_redirects: usize,

    /// Optional proxy URL applied to all requests
    pub proxy: Option<String>,

    /// Value of the User-Agent header
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_redirects: 10,
            proxy: None,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Builds an HTTP client from fetch options
///
/// # Arguments
///
/// * `options` - The fetch options
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (e.g. bad proxy URL)
pub fn build_http_client(options: &FetchOptions) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(options.user_agent.clone())
        .timeout(options.timeout)
        .redirect(Policy::limited(options.max_redirects))
        .gzip(true)
        .brotli(true);

    if let Some(proxy) = &options.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    builder.build()
}

/// reqwest-backed [`Fetch`] implementation
///
/// Follows redirects up to the configured limit, optionally memoizes
/// successful pages in a [`FetchCache`], and classifies every failure into
/// the [`FetchFailure`] taxonomy.
///
/// # Example
///
/// ```no_run
/// use spindrift::crawler::{Fetch, FetchOptions, HttpFetcher};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = HttpFetcher::new(&FetchOptions::default())?;
/// let page = fetcher.fetch("https://example.com/", None).await?;
/// println!("{} bytes of {}", page.body.len(), page.mime_type);
/// # Ok(())
/// # }
/// ```
pub struct HttpFetcher {
    client: Client,
    cache: Option<Arc<dyn FetchCache>>,
}

impl HttpFetcher {
    /// Creates a fetcher without memoization
    pub fn new(options: &FetchOptions) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(options)?,
            cache: None,
        })
    }

    /// Creates a fetcher that consults `cache` before the network and
    /// stores successful pages after
    pub fn with_cache(
        options: &FetchOptions,
        cache: Arc<dyn FetchCache>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(options)?,
            cache: Some(cache),
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str, referrer: Option<&str>) -> Result<FetchedPage, FetchFailure> {
        if let Some(cache) = &self.cache {
            if let Some(page) = cache.get(url) {
                tracing::debug!("Cache hit for {}", url);
                return Ok(page);
            }
        }

        let mut request = self.client.get(url);
        if let Some(referrer) = referrer {
            request = request.header(header::REFERER, referrer);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return Err(classify_transport_error(url, &e)),
        };

        let status = response.status();
        if let Some(failure) = classify_status(url, status) {
            return Err(failure);
        }

        let final_url = response.url().to_string();
        let mime_type = extract_mime_type(response.headers());

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Err(FetchFailure::Generic {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
        };

        let page = FetchedPage {
            final_url,
            mime_type,
            body,
        };

        if let Some(cache) = &self.cache {
            cache.put(url, &page);
        }

        Ok(page)
    }
}

/// Maps a non-success HTTP status to its failure kind
fn classify_status(url: &str, status: StatusCode) -> Option<FetchFailure> {
    if status.is_success() {
        return None;
    }

    let url = url.to_string();
    Some(match status.as_u16() {
        400 => FetchFailure::BadRequest { url },
        401 => FetchFailure::Unauthorized { url },
        403 => FetchFailure::Forbidden { url },
        404 => FetchFailure::NotFound { url },
        // 420 is the legacy rate-limit status some services still send
        420 | 429 => FetchFailure::RateLimited {
            url,
            status: status.as_u16(),
        },
        _ => FetchFailure::Generic {
            url,
            message: format!("HTTP status {}", status),
        },
    })
}

/// Classifies errors raised before a response arrived
fn classify_transport_error(url: &str, error: &reqwest::Error) -> FetchFailure {
    let url = url.to_string();

    if error.is_timeout() {
        FetchFailure::Timeout { url }
    } else if error.is_redirect() {
        FetchFailure::TooManyRedirects { url }
    } else {
        FetchFailure::Generic {
            url,
            message: error.to_string(),
        }
    }
}

/// Extracts the bare media type from response headers
fn extract_mime_type(headers: &header::HeaderMap) -> String {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}
