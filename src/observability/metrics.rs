//! Request counting.
//!
//! # Metrics
//! - request counter: numbers requests so log lines can be correlated
//!
//! # Design Decisions
//! - One atomic `fetch_add`; no lock, no separate read-then-write
//! - The value a request logs is the value its own increment returned

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide monotonic request counter.
#[derive(Debug, Default)]
pub struct RequestCounter {
    count: AtomicU64,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically increment and return the new value.
    ///
    /// N concurrent calls return exactly the values `1..=N`.
    pub fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Current value. May already be stale when read.
    pub fn current(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
