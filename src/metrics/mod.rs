//! Metrics collection module
//!
//! Counts searches and their outcomes for the stats endpoint.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Search counters
#[derive(Debug, Default)]
pub struct Metrics {
    searches: AtomicU64,
    empty: AtomicU64,
    failed: AtomicU64,
    superseded: AtomicU64,
    suggestions: AtomicU64,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub searches: u64,
    pub empty: u64,
    pub failed: u64,
    pub superseded: u64,
    pub suggestions: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A non-empty query was submitted
    pub fn inc_search(&self) {
        self.searches.fetch_add(1, Ordering::Relaxed);
    }

    /// A search mounted the empty view
    pub fn inc_empty(&self) {
        self.empty.fetch_add(1, Ordering::Relaxed);
    }

    /// A search mounted the error view
    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// A finished search was discarded because a newer one had started
    pub fn inc_superseded(&self) {
        self.superseded.fetch_add(1, Ordering::Relaxed);
    }

    /// A suggestion box was shown
    pub fn inc_suggestions(&self) {
        self.suggestions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            searches: self.searches.load(Ordering::Relaxed),
            empty: self.empty.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            superseded: self.superseded.load(Ordering::Relaxed),
            suggestions: self.suggestions.load(Ordering::Relaxed),
        }
    }
}
