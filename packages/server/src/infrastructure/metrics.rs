//! Dropped-event counters.
//!
//! Mutating events rejected with `NotFound` or `InvalidArgument` never reach clients as errors;
//! they are counted here and exposed through `GET /api/stats`.

use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::domain::ErrorKind;

/// Lock-free per-kind counters.
#[derive(Debug, Default)]
pub struct DroppedEventCounters {
    not_found: AtomicU64,
    invalid_argument: AtomicU64,
    upstream_unavailable: AtomicU64,
}

impl DroppedEventCounters {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, kind: ErrorKind) -> &AtomicU64 {
        match kind {
            ErrorKind::NotFound => &self.not_found,
            ErrorKind::InvalidArgument => &self.invalid_argument,
            ErrorKind::UpstreamUnavailable => &self.upstream_unavailable,
        }
    }

    pub fn record(&self, kind: ErrorKind) {
        self.counter(kind).fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, kind: ErrorKind) -> u64 {
        self.counter(kind).load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        ErrorKind::ALL.iter().map(|kind| self.get(*kind)).sum()
    }

    /// Counter values keyed by kind name.
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        ErrorKind::ALL
            .iter()
            .map(|kind| (kind.as_str().to_string(), self.get(*kind)))
            .collect()
    }
}
