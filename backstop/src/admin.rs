//! Diagnostics surface over the shared cache store.

use std::sync::Arc;

use crate::store::{CacheStore, StoreStats};

/// Handle exposing cache statistics and the clear-all operation to
/// external callers, without handing them the rest of the store API.
#[derive(Clone)]
pub struct CacheAdmin {
    store: Arc<CacheStore>,
}

impl CacheAdmin {
    /// Creates an admin handle over a store.
    pub fn new(store: Arc<CacheStore>) -> Self {
        CacheAdmin { store }
    }

    /// Empties the cache-entry map and the recent-request map.
    pub fn clear_all(&self) {
        self.store.clear_all();
    }

    /// Returns point-in-time entry counts of both maps.
    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }
}
