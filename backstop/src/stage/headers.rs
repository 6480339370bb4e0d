//! Header-injection stage.

use async_trait::async_trait;
use backstop_core::RequestDescriptor;
use http::{HeaderName, HeaderValue};

use super::{Next, Stage, StageResult};

/// Injects a fixed set of headers into every outgoing request.
///
/// Runs outermost so that every inner stage - including the cache key
/// derivation - sees the final request. Injection is copy-on-write: the
/// caller's descriptor is never mutated.
pub struct HeaderStage {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl HeaderStage {
    /// Creates the stage with the headers to inject.
    pub fn new(headers: Vec<(HeaderName, HeaderValue)>) -> Self {
        HeaderStage { headers }
    }
}

#[async_trait]
impl Stage for HeaderStage {
    async fn process(&self, request: RequestDescriptor, next: Next<'_>) -> StageResult {
        let request = self
            .headers
            .iter()
            .fold(request, |request, (name, value)| {
                request.with_header(name.clone(), value.clone())
            });
        next.run(request).await
    }
}
