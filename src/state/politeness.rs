use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Tracks the most recent completed visit per authority.
///
/// The tracker answers one question: how long has it been since the crawl
/// last touched a given authority (`host[:port]`)? The frontier uses the
/// answer to enforce the politeness delay between requests to the same
/// domain. An authority that was never visited has no entry, which reads as
/// "infinitely long ago", so first contact is always allowed.
///
/// Time is passed in explicitly as `now` so eligibility can be tested
/// without sleeping.
#[derive(Debug, Default)]
pub struct PolitenessTracker {
    last_visit: HashMap<String, Instant>,
}

impl PolitenessTracker {
    /// Creates an empty tracker
    pub fn new() -> Self {
        Self {
            last_visit: HashMap::new(),
        }
    }

    /// Records that a visit to the authority completed at `now`
    pub fn record_visit(&mut self, authority: &str, now: Instant) {
        self.last_visit.insert(authority.to_string(), now);
    }

    /// Returns the time elapsed since the authority was last visited
    ///
    /// # Returns
    ///
    /// * `Some(elapsed)` - Time since the last recorded visit
    /// * `None` - The authority was never visited
    pub fn elapsed_since(&self, authority: &str, now: Instant) -> Option<Duration> {
        self.last_visit
            .get(authority)
            .map(|last| now.duration_since(*last))
    }

    /// Checks whether the authority may be visited again
    ///
    /// True when the authority was never visited, or when strictly more
    /// than `delay` has elapsed since its last visit.
    pub fn is_ready(&self, authority: &str, delay: Duration, now: Instant) -> bool {
        match self.elapsed_since(authority, now) {
            Some(elapsed) => elapsed > delay,
            None => true,
        }
    }

    /// Calculates how long until the authority cools down
    ///
    /// Returns `None` if the authority can be visited now, otherwise the
    /// remaining wait. A zero result means the boundary instant itself:
    /// eligibility requires strictly more than `delay` elapsed.
    pub fn remaining(&self, authority: &str, delay: Duration, now: Instant) -> Option<Duration> {
        match self.elapsed_since(authority, now) {
            Some(elapsed) if elapsed <= delay => Some(delay - elapsed),
            _ => None,
        }
    }

    /// Number of authorities with a recorded visit
    pub fn len(&self) -> usize {
        self.last_visit.len()
    }

    /// Returns true if no visit was ever recorded
    pub fn is_empty(&self) -> bool {
        self.last_visit.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_visited_has_no_elapsed() {
        let tracker = PolitenessTracker::new();
        let now = Instant::now();

        assert!(tracker.elapsed_since("example.com", now).is_none());
    }

    #[test]
    fn test_never_visited_is_ready() {
        let tracker = PolitenessTracker::new();
        let now = Instant::now();

        assert!(tracker.is_ready("example.com", Duration::from_secs(20), now));
    }

    #[test]
    fn test_elapsed_after_visit() {
        let mut tracker = PolitenessTracker::new();
        let now = Instant::now();

        tracker.record_visit("example.com", now);

        let later = now + Duration::from_millis(750);
        assert_eq!(
            tracker.elapsed_since("example.com", later),
            Some(Duration::from_millis(750))
        );
    }

    #[test]
    fn test_not_ready_during_cooldown() {
        let mut tracker = PolitenessTracker::new();
        let now = Instant::now();
        let delay = Duration::from_secs(20);

        tracker.record_visit("example.com", now);

        assert!(!tracker.is_ready("example.com", delay, now));
        let soon = now + Duration::from_secs(10);
        assert!(!tracker.is_ready("example.com", delay, soon));
    }

    #[test]
    fn test_ready_requires_strictly_more_than_delay() {
        let mut tracker = PolitenessTracker::new();
        let now = Instant::now();
        let delay = Duration::from_secs(20);

        tracker.record_visit("example.com", now);

        // Exactly at the boundary: still cooling.
        let boundary = now + delay;
        assert!(!tracker.is_ready("example.com", delay, boundary));

        let past = boundary + Duration::from_millis(1);
        assert!(tracker.is_ready("example.com", delay, past));
    }

    #[test]
    fn test_zero_delay_ready_immediately_after() {
        let mut tracker = PolitenessTracker::new();
        let now = Instant::now();

        tracker.record_visit("example.com", now);

        // With a zero delay, any forward movement of the clock is enough.
        assert!(!tracker.is_ready("example.com", Duration::ZERO, now));
        let next = now + Duration::from_nanos(1);
        assert!(tracker.is_ready("example.com", Duration::ZERO, next));
    }

    #[test]
    fn test_authorities_tracked_independently() {
        let mut tracker = PolitenessTracker::new();
        let now = Instant::now();
        let delay = Duration::from_secs(20);

        tracker.record_visit("a.test", now);

        assert!(!tracker.is_ready("a.test", delay, now));
        assert!(tracker.is_ready("b.test", delay, now));
    }

    #[test]
    fn test_ports_are_distinct_authorities() {
        let mut tracker = PolitenessTracker::new();
        let now = Instant::now();
        let delay = Duration::from_secs(20);

        tracker.record_visit("example.com:8080", now);

        assert!(!tracker.is_ready("example.com:8080", delay, now));
        assert!(tracker.is_ready("example.com:9090", delay, now));
        assert!(tracker.is_ready("example.com", delay, now));
    }

    #[test]
    fn test_revisit_refreshes_stamp() {
        let mut tracker = PolitenessTracker::new();
        let now = Instant::now();
        let delay = Duration::from_millis(100);

        tracker.record_visit("example.com", now);
        let later = now + Duration::from_millis(150);
        assert!(tracker.is_ready("example.com", delay, later));

        tracker.record_visit("example.com", later);
        assert!(!tracker.is_ready("example.com", delay, later));
        assert_eq!(
            tracker.elapsed_since("example.com", later),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_remaining_none_when_never_visited() {
        let tracker = PolitenessTracker::new();
        let now = Instant::now();

        assert!(tracker
            .remaining("example.com", Duration::from_secs(20), now)
            .is_none());
    }

    #[test]
    fn test_remaining_counts_down() {
        let mut tracker = PolitenessTracker::new();
        let now = Instant::now();
        let delay = Duration::from_millis(1000);

        tracker.record_visit("example.com", now);

        assert_eq!(
            tracker.remaining("example.com", delay, now),
            Some(Duration::from_millis(1000))
        );

        let soon = now + Duration::from_millis(400);
        assert_eq!(
            tracker.remaining("example.com", delay, soon),
            Some(Duration::from_millis(600))
        );

        // At the boundary the remaining wait is zero but not yet ready.
        let boundary = now + delay;
        assert_eq!(
            tracker.remaining("example.com", delay, boundary),
            Some(Duration::ZERO)
        );

        let past = boundary + Duration::from_millis(1);
        assert!(tracker.remaining("example.com", delay, past).is_none());
    }

    #[test]
    fn test_len_and_is_empty() {
        let mut tracker = PolitenessTracker::new();
        assert!(tracker.is_empty());

        let now = Instant::now();
        tracker.record_visit("a.test", now);
        tracker.record_visit("b.test", now);
        tracker.record_visit("a.test", now);

        assert_eq!(tracker.len(), 2);
        assert!(!tracker.is_empty());
    }
}
