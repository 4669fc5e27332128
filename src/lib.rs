//! Spindrift: a polite, policy-driven crawl scheduler
//!
//! This crate decides which URL a crawl should fetch next. It keeps a
//! priority frontier of discovered links, enforces a per-authority politeness
//! delay, tallies cross-domain backlinks, and lets callers steer ranking,
//! filtering and page handling through a pluggable policy.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Spindrift operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for Spindrift operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::{FetchCache, MemoryCache};
pub use config::Config;
pub use crawler::{
    build_crawler, crawl, CrawlMethod, CrawlOptions, CrawlPolicy, Crawler, DefaultPolicy,
    DomainFilterPolicy, Fetch, FetchFailure, FetchOptions, FetchedPage, HtmlLinkExtractor,
    HttpFetcher, Link, LinkExtractor, StepStatus,
};
pub use state::{PolitenessTracker, VisitedRegistry};
pub use crate::url::{absolutize, authority, strip_fragment, strip_tracking_params};
