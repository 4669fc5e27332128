use std::collections::HashMap;

/// Registry of every URL the crawl has seen, keyed by exact URL string.
///
/// The stored counter carries two meanings over a URL's lifetime. While the
/// URL sits in the frontier, the counter is the number of cross-domain pages
/// observed linking to it (0 at discovery). Once the URL has been processed,
/// the counter is overwritten to 1 and acts as a completion marker. The
/// pre-visit backlink total is therefore lost at processing time; callers
/// that need the aggregate must read [`backlinks`](Self::backlinks) before
/// the URL is fetched.
///
/// Presence in the registry is what prevents a URL from ever being scheduled
/// twice: discovery happens at most once per URL.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    entries: HashMap<String, u32>,
}

impl VisitedRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers a URL as discovered, with a backlink count of zero
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and is now registered
    /// * `false` - The URL was already known; nothing changed
    pub fn discover(&mut self, url: &str) -> bool {
        if self.entries.contains_key(url) {
            return false;
        }
        self.entries.insert(url.to_string(), 0);
        true
    }

    /// Increments the backlink count of an already-registered URL
    ///
    /// Unknown URLs are ignored; bumping is only meaningful for URLs that
    /// went through [`discover`](Self::discover).
    pub fn bump(&mut self, url: &str) {
        if let Some(count) = self.entries.get_mut(url) {
            *count += 1;
        }
    }

    /// Marks a URL as processed, overwriting its counter to 1
    ///
    /// This deliberately discards any backlink total accumulated while the
    /// URL was pending; after this call the value 1 means "processed", not
    /// "one backlink".
    pub fn mark_processed(&mut self, url: &str) {
        self.entries.insert(url.to_string(), 1);
    }

    /// Returns the stored counter for a URL, or 0 if it was never seen
    pub fn backlinks(&self, url: &str) -> u32 {
        self.entries.get(url).copied().unwrap_or(0)
    }

    /// Checks whether a URL has ever been discovered or processed
    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    /// Number of distinct URLs ever seen
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no URL was ever registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
