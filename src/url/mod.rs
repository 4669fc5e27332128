//! URL handling module for Spindrift
//!
//! This module provides the URL plumbing the scheduler leans on: authority
//! extraction (the politeness grouping key), href absolutization, wildcard
//! domain matching for filter policies, and optional normalization helpers
//! for `CrawlPolicy::normalize` overrides.

mod absolutize;
mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use absolutize::absolutize;
pub use domain::{authority, host};
pub use matcher::{matches_any, matches_pattern};
pub use normalize::{strip_fragment, strip_tracking_params};
