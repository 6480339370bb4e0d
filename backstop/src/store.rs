//! The shared cache engine.
//!
//! [`CacheStore`] owns the two pieces of shared mutable state in the whole
//! pipeline:
//!
//! - the **entry map**: fingerprint → [`CacheEntry`], freshness bounded by
//!   the memory TTL (10 s in the reference configuration)
//! - the **recent-request map**: fingerprint → last-seen timestamp, bounded
//!   by the duplicate window (1 s in the reference configuration)
//!
//! The maps are kept separate on purpose: their eviction policies differ,
//! and conflating them would couple cache freshness to suppression. Both
//! are [`DashMap`]s, so concurrent callers get whole-value atomic reads and
//! writes without external locking. No operation spans both maps
//! transactionally; the sweep lags real time by at most one request.
//!
//! One store instance is created at startup and handed to every component
//! that needs it via `Arc` - there is no global accessor.

use std::time::Duration;

use backstop_core::{CacheEntry, Fingerprint};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::trace;

/// Point-in-time entry counts of the two maps.
///
/// The two counts are read independently; under concurrent writers they
/// may describe slightly different instants. Good enough for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of cached response entries, fresh or expired.
    pub cache_entries: usize,
    /// Number of recent-request records.
    pub recent_requests: usize,
}

/// Shared cache state for one pipeline.
#[derive(Debug)]
pub struct CacheStore {
    entries: DashMap<Fingerprint, CacheEntry>,
    recent: DashMap<Fingerprint, DateTime<Utc>>,
    memory_ttl: Duration,
    duplicate_window: Duration,
}

impl CacheStore {
    /// Creates an empty store with the given eviction thresholds.
    pub fn new(memory_ttl: Duration, duplicate_window: Duration) -> Self {
        CacheStore {
            entries: DashMap::new(),
            recent: DashMap::new(),
            memory_ttl,
            duplicate_window,
        }
    }

    /// Freshness TTL applied to cached entries.
    pub fn memory_ttl(&self) -> Duration {
        self.memory_ttl
    }

    /// Age threshold for duplicate suppression.
    pub fn duplicate_window(&self) -> Duration {
        self.duplicate_window
    }

    /// Returns the entry for `fingerprint` if one exists and is still
    /// fresh. Expired entries are left in place for the stale-fallback
    /// path.
    pub fn fresh_entry(&self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        let entry = self.entries.get(fingerprint)?;
        if entry.is_expired(self.memory_ttl) {
            None
        } else {
            Some(entry.value().clone())
        }
    }

    /// Returns the entry for `fingerprint` regardless of age.
    pub fn any_entry(&self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        self.entries
            .get(fingerprint)
            .map(|entry| entry.value().clone())
    }

    /// Stores an entry, replacing any existing one (last write wins).
    pub fn store_entry(&self, fingerprint: Fingerprint, entry: CacheEntry) {
        trace!(fingerprint = %fingerprint, "storing cache entry");
        self.entries.insert(fingerprint, entry);
    }

    /// Records `fingerprint` as seen right now and returns the age of the
    /// previous record, if any.
    ///
    /// The write happens unconditionally, before any suppression decision
    /// is made. A suppressed call therefore also resets the window for the
    /// next one (sliding-window behavior).
    pub fn touch_recent(&self, fingerprint: &Fingerprint) -> Option<Duration> {
        let previous = self.recent.insert(fingerprint.clone(), Utc::now());
        previous.map(|seen| (Utc::now() - seen).to_std().unwrap_or(Duration::ZERO))
    }

    /// Removes entries past the memory TTL and recent-request records past
    /// the duplicate window. O(map size); acceptable for a single-client
    /// cache.
    pub fn sweep(&self) {
        self.entries
            .retain(|_, entry| !entry.is_expired(self.memory_ttl));
        let window = self.duplicate_window;
        self.recent
            .retain(|_, seen| (Utc::now() - *seen).to_std().unwrap_or(Duration::ZERO) < window);
    }

    /// Empties both maps.
    pub fn clear_all(&self) {
        self.entries.clear();
        self.recent.clear();
    }

    /// Current entry counts.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            cache_entries: self.entries.len(),
            recent_requests: self.recent.len(),
        }
    }
}
