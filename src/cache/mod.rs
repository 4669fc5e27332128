//! Fetch memoization cache
//!
//! A fetcher can be handed a cache so repeated requests for the same URL are
//! served from memory instead of the network. The cache is an injected
//! capability behind the [`FetchCache`] trait; the scheduler core never
//! depends on a concrete implementation.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::crawler::FetchedPage;

/// Get/put contract for memoizing successful fetches.
///
/// Only successful pages are stored; failures always go back to the
/// network. Implementations decide eviction and freshness on their own.
pub trait FetchCache: Send + Sync {
    /// Returns the cached page for a URL, if present and still fresh
    fn get(&self, url: &str) -> Option<FetchedPage>;

    /// Stores a fetched page under the request URL
    fn put(&self, url: &str, page: &FetchedPage);
}

struct CacheEntry {
    page: FetchedPage,
    stored_at: DateTime<Utc>,
}

/// In-memory [`FetchCache`] with an optional wall-clock TTL.
///
/// Entries older than the TTL are dropped on lookup. Without a TTL the
/// cache holds pages for the lifetime of the process, which suits the
/// typical single-session crawl.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Option<chrono::Duration>,
}

impl MemoryCache {
    /// Creates a cache whose entries never expire
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: None,
        }
    }

    /// Creates a cache whose entries go stale `ttl` after storage
    pub fn with_ttl(ttl: chrono::Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    /// Number of entries currently stored, stale ones included
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns true if the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_stale(&self, stored_at: DateTime<Utc>) -> bool {
        match self.ttl {
            Some(ttl) => Utc::now() - stored_at > ttl,
            None => false,
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchCache for MemoryCache {
    fn get(&self, url: &str) -> Option<FetchedPage> {
        let mut entries = self.entries.lock().ok()?;

        if let Some(entry) = entries.get(url) {
            if self.is_stale(entry.stored_at) {
                entries.remove(url);
                return None;
            }
            return Some(entry.page.clone());
        }

        None
    }

    fn put(&self, url: &str, page: &FetchedPage) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                url.to_string(),
                CacheEntry {
                    page: page.clone(),
                    stored_at: Utc::now(),
                },
            );
        }
    }
}
