//! Crawl frontier: the ordered set of links waiting to be visited
//!
//! This module handles:
//! - Link values and their identity (two links are the same link when their
//!   URLs are equal)
//! - Frontier entries carrying scheduling metadata (priority, enqueue time,
//!   referrer)
//! - Sorted insertion and politeness-aware selection in two modes, strict
//!   and interleaved

use crate::state::PolitenessTracker;
use crate::url::authority;
use std::cmp::Ordering;
use std::time::{Duration, Instant};

/// A discovered hyperlink
///
/// Equality and ordering consider only the URL; `description` (the anchor's
/// `title` attribute) and `relation` (its `rel` attribute) are carried along
/// for the caller's benefit but never influence scheduling.
#[derive(Debug, Clone, Default)]
pub struct Link {
    /// Absolute URL of the link target
    pub url: String,

    /// Human-readable description, if the anchor carried one
    pub description: String,

    /// Relation tag, e.g. "nofollow"
    pub relation: String,
}

impl Link {
    /// Creates a link with an empty description and relation
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: String::new(),
            relation: String::new(),
        }
    }
}

impl From<&str> for Link {
    fn from(url: &str) -> Self {
        Self::new(url)
    }
}

impl From<String> for Link {
    fn from(url: String) -> Self {
        Self::new(url)
    }
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for Link {}

impl Ord for Link {
    fn cmp(&self, other: &Self) -> Ordering {
        self.url.cmp(&other.url)
    }
}

impl PartialOrd for Link {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A link queued for visiting, with its scheduling metadata
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    /// Priority value (lower is visited sooner); `1 - rank` for discovered
    /// links, a sub-zero sentinel for seeds
    pub priority: f64,

    /// When the entry was added to the frontier; breaks priority ties in
    /// arrival order
    pub enqueued_at: Instant,

    /// The link to visit
    pub link: Link,

    /// The page the link was found on; `None` for seeds
    pub referrer: Option<Link>,
}

impl FrontierEntry {
    /// Creates a new frontier entry
    pub fn new(priority: f64, enqueued_at: Instant, link: Link, referrer: Option<Link>) -> Self {
        Self {
            priority,
            enqueued_at,
            link,
            referrer,
        }
    }

    /// The politeness grouping key of this entry's link
    ///
    /// Links whose URL has no derivable authority share the empty-string
    /// bucket rather than escaping politeness accounting.
    pub fn authority(&self) -> String {
        authority(&self.link.url).unwrap_or_default()
    }
}

// Ascending order: the head of a sorted collection is the next link to
// visit. Priority first, then arrival time, then URL so the order is total.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| self.enqueued_at.cmp(&other.enqueued_at))
            .then_with(|| self.link.cmp(&other.link))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// The ordered set of links waiting to be visited
///
/// Entries are kept sorted ascending by `(priority, enqueued_at)` at all
/// times; selection walks that order, constrained by per-domain politeness.
#[derive(Debug, Default)]
pub struct Frontier {
    entries: Vec<FrontierEntry>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts an entry, preserving sort order
    ///
    /// The position is found by binary search; an entry that compares equal
    /// to existing ones lands after them, so arrival order is preserved
    /// among equals.
    pub fn insert(&mut self, entry: FrontierEntry) {
        let position = self.entries.partition_point(|existing| existing <= &entry);
        self.entries.insert(position, entry);
    }

    /// Removes and returns the next entry that politeness allows
    ///
    /// Entries are considered in sorted order. An entry is eligible when its
    /// authority was never visited or was last visited strictly more than
    /// `delay` ago.
    ///
    /// # Arguments
    ///
    /// * `politeness` - Last-visit bookkeeping consulted per entry
    /// * `delay` - Minimum time between visits to one authority
    /// * `strict_order` - When true, only the head entry is ever considered:
    ///   if its authority is still cooling the whole frontier stalls. When
    ///   false, selection skips over cooling entries and returns the first
    ///   eligible one, trading exact priority order for throughput.
    /// * `now` - The current time instant
    ///
    /// # Returns
    ///
    /// * `Some(entry)` - The entry was removed from the frontier
    /// * `None` - Nothing is eligible right now; the frontier is unchanged
    pub fn select_eligible(
        &mut self,
        politeness: &PolitenessTracker,
        delay: Duration,
        strict_order: bool,
        now: Instant,
    ) -> Option<FrontierEntry> {
        if strict_order {
            let head = self.entries.first()?;
            if politeness.is_ready(&head.authority(), delay, now) {
                return Some(self.entries.remove(0));
            }
            tracing::trace!("Head {} still cooling, strict order stalls", head.link.url);
            return None;
        }

        let position = self
            .entries
            .iter()
            .position(|entry| politeness.is_ready(&entry.authority(), delay, now))?;

        if position > 0 {
            tracing::trace!("Skipped {} cooling entries", position);
        }

        Some(self.entries.remove(position))
    }

    /// Calculates how long until some entry becomes eligible
    ///
    /// In strict mode only the head entry counts; in interleaved mode the
    /// soonest authority across the whole frontier. `Duration::ZERO` means
    /// an entry is ready now, `None` means the frontier is empty.
    pub fn next_ready_in(
        &self,
        politeness: &PolitenessTracker,
        delay: Duration,
        strict_order: bool,
        now: Instant,
    ) -> Option<Duration> {
        if strict_order {
            let head = self.entries.first()?;
            let wait = politeness
                .remaining(&head.authority(), delay, now)
                .unwrap_or(Duration::ZERO);
            return Some(wait);
        }

        let mut soonest: Option<Duration> = None;
        for entry in &self.entries {
            match politeness.remaining(&entry.authority(), delay, now) {
                None => return Some(Duration::ZERO),
                Some(wait) => {
                    soonest = Some(match soonest {
                        Some(current) => current.min(wait),
                        None => wait,
                    });
                }
            }
        }

        soonest
    }

    /// Number of pending entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates pending entries in visit order, for diagnostics
    pub fn iter(&self) -> std::slice::Iter<'_, FrontierEntry> {
        self.entries.iter()
    }
}
