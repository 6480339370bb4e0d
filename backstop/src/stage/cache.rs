//! In-memory response cache stage.

use std::sync::Arc;

use async_trait::async_trait;
use backstop_core::{CacheEntry, ExchangeResponse, Fingerprint, RequestDescriptor};
use http::{HeaderName, HeaderValue, Method};
use tracing::{debug, warn};

use super::{CACHE_STATUS_HEADER, Next, Stage, StageResult};
use crate::store::CacheStore;

/// Serves and populates the in-memory response cache for GET requests.
///
/// A fresh entry is served without a network call. On a miss the exchange
/// runs: a 2xx GET response is snapshotted (last write wins), a thrown
/// transport error falls back to any existing entry - even an expired one -
/// before propagating, and everything else passes through unchanged.
/// Responses served from cache carry an `x-cache-status` header of `HIT`
/// or `STALE`; freshly stored ones are marked `MISS`.
///
/// Every invocation ends with a sweep of both store maps, so physical
/// eviction lags real time by at most one request.
pub struct MemoryCacheStage {
    store: Arc<CacheStore>,
}

impl MemoryCacheStage {
    /// Creates the stage over the shared store.
    pub fn new(store: Arc<CacheStore>) -> Self {
        MemoryCacheStage { store }
    }

    fn mark(response: &mut ExchangeResponse, status: &'static str) {
        response.insert_header(
            HeaderName::from_static(CACHE_STATUS_HEADER),
            HeaderValue::from_static(status),
        );
    }

    async fn lookup_or_fetch(&self, request: RequestDescriptor, next: Next<'_>) -> StageResult {
        let fingerprint = Fingerprint::of(&request);
        let cacheable = request.method() == Method::GET;

        if cacheable && let Some(entry) = self.store.fresh_entry(&fingerprint) {
            debug!(fingerprint = %fingerprint, "cache hit");
            let mut response = entry.to_response();
            Self::mark(&mut response, "HIT");
            return Ok(response);
        }

        match next.run(request).await {
            Ok(mut response) => {
                if cacheable && response.is_success() {
                    self.store
                        .store_entry(fingerprint, CacheEntry::from_response(&response));
                    Self::mark(&mut response, "MISS");
                }
                Ok(response)
            }
            Err(error) => match self.store.any_entry(&fingerprint) {
                Some(entry) => {
                    warn!(
                        fingerprint = %fingerprint,
                        error = %error,
                        "transport failed, serving stale cache entry"
                    );
                    let mut response = entry.to_response();
                    Self::mark(&mut response, "STALE");
                    Ok(response)
                }
                None => Err(error),
            },
        }
    }
}

#[async_trait]
impl Stage for MemoryCacheStage {
    async fn process(&self, request: RequestDescriptor, next: Next<'_>) -> StageResult {
        let result = self.lookup_or_fetch(request, next).await;
        self.store.sweep();
        result
    }
}
