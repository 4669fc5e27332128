//! State module for tracking crawl progress
//!
//! This module provides the bookkeeping a crawl session carries between
//! steps.
//!
//! # Components
//!
//! - `PolitenessTracker`: Per-authority last-visit timestamps for rate limiting
//! - `VisitedRegistry`: URL deduplication and backlink counting

mod politeness;
mod registry;

// Re-export main types
pub use politeness::PolitenessTracker;
pub use registry::VisitedRegistry;
