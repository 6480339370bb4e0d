//! Cached response snapshots.

use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::HeaderMap;

use crate::response::ExchangeResponse;

/// A snapshot of a prior successful response, owned by the cache map.
///
/// Entries record their creation time and are treated as expired (but not
/// deleted) once older than the memory-cache TTL; physical removal happens
/// only in the periodic sweep or an explicit clear. Keeping expired entries
/// around is what makes the stale-fallback path possible.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    status: http::StatusCode,
    headers: HeaderMap,
    body: Bytes,
    created_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Snapshots a response at the current time.
    pub fn from_response(response: &ExchangeResponse) -> Self {
        CacheEntry {
            status: response.status(),
            headers: response.headers().clone(),
            body: response.body().clone(),
            created_at: Utc::now(),
        }
    }

    /// Returns when this entry was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the entry's age, saturating at zero for clock skew.
    pub fn age(&self) -> Duration {
        (Utc::now() - self.created_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Returns `true` once the entry is older than `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }

    /// Rebuilds a response from the snapshot.
    pub fn to_response(&self) -> ExchangeResponse {
        ExchangeResponse::new(self.status, self.headers.clone(), self.body.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn response() -> ExchangeResponse {
        ExchangeResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            Bytes::from_static(b"payload"),
        )
    }

    #[test]
    fn snapshot_round_trips_the_response() {
        let original = response();
        let entry = CacheEntry::from_response(&original);
        assert_eq!(entry.to_response(), original);
    }

    #[test]
    fn fresh_entry_is_not_expired() {
        let entry = CacheEntry::from_response(&response());
        assert!(!entry.is_expired(Duration::from_secs(10)));
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let entry = CacheEntry::from_response(&response());
        assert!(entry.is_expired(Duration::ZERO));
    }
}
