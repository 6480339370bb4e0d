//! Duplicate-suppression stage.

use std::sync::Arc;

use async_trait::async_trait;
use backstop_core::{ExchangeResponse, Fingerprint, Notifier, RequestDescriptor};
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use tracing::debug;

use super::{CACHE_STATUS_HEADER, Next, POLICY_STATUS_HEADER, Stage, StageResult};
use crate::store::CacheStore;

/// Advisory body of a synthesized 429.
const ADVISORY_BODY: &[u8] = b"{\"error\":\"too many requests, please retry later\"}";

/// Message delivered to the user, once per suppressed attempt.
const SUPPRESSION_NOTICE: &str = "too many requests";

/// Short-circuits requests that repeat an identical one within the
/// duplicate window.
///
/// The recent-request record is written unconditionally, before the
/// decision - so a suppressed call also resets the window for the next
/// one. Within the window, a fresh cache entry is served when available;
/// otherwise the stage synthesizes a 429 without touching the network and
/// fires a user notification on a detached task.
///
/// This check runs strictly before the memory-cache lookup on the
/// not-suppressed path; suppression and cache-hit are independent
/// policies.
pub struct DuplicateSuppressionStage {
    store: Arc<CacheStore>,
    notifier: Arc<dyn Notifier>,
}

impl DuplicateSuppressionStage {
    /// Creates the stage over the shared store and notification channel.
    pub fn new(store: Arc<CacheStore>, notifier: Arc<dyn Notifier>) -> Self {
        DuplicateSuppressionStage { store, notifier }
    }

    fn synthesize_rate_limit() -> ExchangeResponse {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(POLICY_STATUS_HEADER),
            HeaderValue::from_static("SUPPRESSED"),
        );
        headers.insert(http::header::RETRY_AFTER, HeaderValue::from_static("1"));
        ExchangeResponse::new(
            StatusCode::TOO_MANY_REQUESTS,
            headers,
            Bytes::from_static(ADVISORY_BODY),
        )
    }
}

#[async_trait]
impl Stage for DuplicateSuppressionStage {
    async fn process(&self, request: RequestDescriptor, next: Next<'_>) -> StageResult {
        let fingerprint = Fingerprint::of(&request);

        let within_window = self
            .store
            .touch_recent(&fingerprint)
            .is_some_and(|age| age < self.store.duplicate_window());
        if !within_window {
            return next.run(request).await;
        }

        if let Some(entry) = self.store.fresh_entry(&fingerprint) {
            debug!(fingerprint = %fingerprint, "duplicate request, serving cached response");
            let mut response = entry.to_response();
            response.insert_header(
                HeaderName::from_static(CACHE_STATUS_HEADER),
                HeaderValue::from_static("HIT"),
            );
            return Ok(response);
        }

        debug!(fingerprint = %fingerprint, "duplicate request, synthesizing 429");
        let notifier = Arc::clone(&self.notifier);
        // Fire-and-forget: the notice must not delay the response path,
        // and a failing notifier must not affect the outcome.
        tokio::spawn(async move {
            notifier.notify(SUPPRESSION_NOTICE).await;
        });

        Ok(Self::synthesize_rate_limit())
    }
}
