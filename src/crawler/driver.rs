//! Crawl driver - the single-step crawl protocol
//!
//! This module owns one crawl session end to end:
//! - Seeding the frontier and deduplicating against the visited registry
//! - The `step()` protocol: select an eligible link, fetch it, classify by
//!   media type, extract and schedule children, report the outcome
//! - The `run()` loop, which paces repeated steps by sleeping until the
//!   next authority cools down
//!
//! The driver never blocks inside `step()`: when politeness permits nothing
//! right now it reports `Idle` and leaves pacing to the caller.

use std::time::{Duration, Instant};

use super::fetcher::{Fetch, FetchedPage};
use super::frontier::{Frontier, FrontierEntry, Link};
use super::parser::LinkExtractor;
use super::policy::{CrawlMethod, CrawlPolicy};
use crate::state::{PolitenessTracker, VisitedRegistry};
use crate::url::{absolutize, authority};

/// Priority assigned to seeds; sorts ahead of anything a rank can produce
const SEED_PRIORITY: f64 = -1.0;

/// Fallback sleep when idling without a computable cooldown
const IDLE_WAIT: Duration = Duration::from_millis(100);

/// Buffer added to cooldown sleeps so the boundary has passed on wake
const WAKE_BUFFER: Duration = Duration::from_millis(10);

/// What one `step()` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// One link was processed, successfully or not
    Progressed,
    /// Links are pending but every eligible authority is cooling down
    Idle,
    /// The frontier is empty; stepping again changes nothing
    Done,
}

/// Construction options for a crawl session
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Minimum time between two visits to the same authority
    pub delay: Duration,

    /// When true, only the frontier head is ever considered and the crawl
    /// stalls while its authority cools down. When false (the default),
    /// selection skips cooling entries to keep making progress.
    pub strict_order: bool,

    /// Traversal preference handed to the policy's rank hook
    pub method: CrawlMethod,

    /// `run()` stops after this many processed pages; `None` runs until
    /// the frontier is exhausted
    pub max_pages: Option<u64>,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(20),
            strict_order: false,
            method: CrawlMethod::Depth,
            max_pages: None,
        }
    }
}

/// A crawl session: frontier, bookkeeping, collaborators and policy
///
/// One `Crawler` owns all mutable crawl state. It processes exactly one
/// link per [`step`](Self::step) call; [`run`](Self::run) drives steps to
/// completion with politeness-aware pacing.
pub struct Crawler<P: CrawlPolicy> {
    options: CrawlOptions,
    policy: P,
    fetcher: Box<dyn Fetch>,
    extractor: Box<dyn LinkExtractor>,
    frontier: Frontier,
    politeness: PolitenessTracker,
    visited: VisitedRegistry,
    pages_visited: u64,
    pages_failed: u64,
}

impl<P: CrawlPolicy> Crawler<P> {
    /// Creates a session seeded with `seeds`
    ///
    /// Seeds enter the frontier at a priority ahead of any ranked link,
    /// with no referrer. They pass the same registry gate as discovered
    /// links, so a duplicated seed yields one frontier entry.
    pub fn new(
        seeds: Vec<Link>,
        options: CrawlOptions,
        policy: P,
        fetcher: Box<dyn Fetch>,
        extractor: Box<dyn LinkExtractor>,
    ) -> Self {
        let mut crawler = Self {
            options,
            policy,
            fetcher,
            extractor,
            frontier: Frontier::new(),
            politeness: PolitenessTracker::new(),
            visited: VisitedRegistry::new(),
            pages_visited: 0,
            pages_failed: 0,
        };

        let now = Instant::now();
        for seed in seeds {
            if crawler.visited.discover(&seed.url) {
                crawler
                    .frontier
                    .insert(FrontierEntry::new(SEED_PRIORITY, now, seed, None));
            } else {
                tracing::debug!("Ignoring duplicate seed {}", seed.url);
            }
        }

        crawler
    }

    /// Processes at most one link
    ///
    /// The full protocol: select the next eligible frontier entry, fetch
    /// it, and if it came back as HTML extract its links, resolve them
    /// against the final (post-redirect) URL, normalize them, and either
    /// bump backlink counts or schedule the new ones the policy accepts.
    /// Finally the link is marked processed, its authority's politeness
    /// stamp refreshed, and exactly one of the `visit`/`fail` callbacks
    /// invoked. A fetch failure or a non-HTML resource is a failed link,
    /// not an error: `step` itself is infallible.
    ///
    /// # Returns
    ///
    /// * `Progressed` - One link was processed
    /// * `Idle` - Nothing is eligible yet; retry after a pause
    /// * `Done` - The frontier is empty
    pub async fn step(&mut self) -> StepStatus {
        if self.frontier.is_empty() {
            return StepStatus::Done;
        }

        let now = Instant::now();
        let entry = match self.frontier.select_eligible(
            &self.politeness,
            self.options.delay,
            self.options.strict_order,
            now,
        ) {
            Some(entry) => entry,
            None => return StepStatus::Idle,
        };

        let link_authority = entry.authority();
        let FrontierEntry { link, referrer, .. } = entry;
        tracing::debug!("Processing {}", link.url);

        let referrer_url = referrer.as_ref().map(|r| r.url.as_str());
        let mut body = None;

        match self.fetcher.fetch(&link.url, referrer_url).await {
            Ok(page) if page.mime_type == "text/html" => {
                self.schedule_children(&link, &page);
                body = Some(page.body);
            }
            Ok(page) => {
                tracing::debug!(
                    "Treating {} as failed: not HTML ({})",
                    link.url,
                    page.mime_type
                );
            }
            Err(failure) => {
                tracing::warn!("Fetch failed: {}", failure);
            }
        }

        // Bookkeeping before callbacks, so a panicking hook cannot leave
        // the session inconsistent.
        self.visited.mark_processed(&link.url);
        self.politeness.record_visit(&link_authority, Instant::now());

        match body {
            Some(body) => {
                self.pages_visited += 1;
                self.policy.visit(&link, referrer.as_ref(), &body);
            }
            None => {
                self.pages_failed += 1;
                self.policy.fail(&link, referrer.as_ref());
            }
        }

        StepStatus::Progressed
    }

    /// Extracts, resolves and schedules the links of a fetched page
    fn schedule_children(&mut self, current: &Link, page: &FetchedPage) {
        let current_authority = authority(&current.url).unwrap_or_default();
        let mut scheduled = 0usize;

        for mut child in self.extractor.extract(&page.body) {
            let resolved = match absolutize(&child.url, &page.final_url) {
                Some(resolved) => resolved,
                None => {
                    tracing::trace!("Discarding unresolvable href {:?}", child.url);
                    continue;
                }
            };
            child.url = self.policy.normalize(&resolved);

            if self.visited.contains(&child.url) {
                // A repeat sighting only counts as a backlink when it comes
                // from another domain. The comparison uses the current
                // page's original URL, not its redirect target.
                if authority(&child.url).unwrap_or_default() != current_authority {
                    self.visited.bump(&child.url);
                }
                continue;
            }

            if !self.policy.follow(&child, current) {
                tracing::trace!("Policy refused {}", child.url);
                continue;
            }

            if self.visited.discover(&child.url) {
                let rank = self.policy.rank(&child, current, self.options.method);
                self.frontier.insert(FrontierEntry::new(
                    1.0 - rank,
                    Instant::now(),
                    child,
                    Some(current.clone()),
                ));
                scheduled += 1;
            }
        }

        if scheduled > 0 {
            tracing::debug!("Scheduled {} new links from {}", scheduled, current.url);
        }
    }

    /// Steps until the frontier is exhausted or the page budget is spent
    ///
    /// On `Idle` the loop sleeps just past the soonest cooldown expiry
    /// instead of polling at a fixed interval. Progress is logged every
    /// ten processed pages.
    pub async fn run(&mut self) {
        tracing::info!("Starting crawl, {} links pending", self.frontier.len());
        let start_time = Instant::now();

        loop {
            if let Some(max) = self.options.max_pages {
                if self.pages_processed() >= max {
                    tracing::info!("Page budget of {} reached", max);
                    break;
                }
            }

            match self.step().await {
                StepStatus::Done => {
                    tracing::info!("Frontier is empty, crawl complete");
                    break;
                }
                StepStatus::Progressed => {
                    let processed = self.pages_processed();
                    if processed % 10 == 0 {
                        let rate = processed as f64 / start_time.elapsed().as_secs_f64();
                        tracing::info!(
                            "Progress: {} pages processed, {} in frontier, {:.2} pages/sec",
                            processed,
                            self.frontier.len(),
                            rate
                        );
                    }
                }
                StepStatus::Idle => {
                    let wait = self
                        .frontier
                        .next_ready_in(
                            &self.politeness,
                            self.options.delay,
                            self.options.strict_order,
                            Instant::now(),
                        )
                        .unwrap_or(IDLE_WAIT);
                    tracing::debug!("All pending authorities cooling, waiting {:?}", wait);
                    tokio::time::sleep(wait + WAKE_BUFFER).await;
                }
            }
        }

        tracing::info!(
            "Crawl finished: {} visited, {} failed, {} URLs discovered in {:?}",
            self.pages_visited,
            self.pages_failed,
            self.visited.len(),
            start_time.elapsed()
        );
    }

    /// True once the frontier is empty
    pub fn done(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Pages that were fetched as HTML and reported through `visit`
    pub fn pages_visited(&self) -> u64 {
        self.pages_visited
    }

    /// Pages that failed to fetch or were not HTML
    pub fn pages_failed(&self) -> u64 {
        self.pages_failed
    }

    /// Total pages processed so far
    pub fn pages_processed(&self) -> u64 {
        self.pages_visited + self.pages_failed
    }

    /// Read access to the visited registry
    pub fn registry(&self) -> &VisitedRegistry {
        &self.visited
    }

    /// Number of links waiting in the frontier
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Pending frontier entries in visit order, for diagnostics
    pub fn pending(&self) -> impl Iterator<Item = &FrontierEntry> {
        self.frontier.iter()
    }

    /// Read access to the policy
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Mutable access to the policy
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Consumes the session and hands back the policy with whatever state
    /// its callbacks accumulated
    pub fn into_policy(self) -> P {
        self.policy
    }
}
