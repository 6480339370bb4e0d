//! Middleware stages and their composition contract.
//!
//! Every cross-cutting policy is a [`Stage`]: it receives the request and
//! a [`Next`] cursor over the rest of the chain, and decides whether to
//! forward, short-circuit, or re-issue. Stages are unit-testable in
//! isolation by handing them a chain that contains nothing but a mock
//! upstream.

use std::sync::Arc;

use async_trait::async_trait;
use backstop_core::{ExchangeResponse, RequestDescriptor, TransportError, Upstream};

mod cache;
mod headers;
mod retry;
mod suppress;

pub use cache::MemoryCacheStage;
pub use headers::HeaderStage;
pub use retry::RetryStage;
pub use suppress::DuplicateSuppressionStage;

/// Response header reporting where a response came from.
pub const CACHE_STATUS_HEADER: &str = "x-cache-status";
/// Response header marking a response synthesized by a policy stage.
pub const POLICY_STATUS_HEADER: &str = "x-policy-status";

/// The outcome a stage hands back: a completed exchange or a transport
/// failure.
pub type StageResult = Result<ExchangeResponse, TransportError>;

/// One middleware stage in the chain.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Processes the request, forwarding to `next` zero or more times.
    async fn process(&self, request: RequestDescriptor, next: Next<'_>) -> StageResult;
}

/// Cursor over the remaining stages of a chain, ending at the upstream.
///
/// `Next` is `Copy`, so a stage that needs to re-issue the request (retry)
/// can call [`run`](Next::run) repeatedly.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    stages: &'a [Arc<dyn Stage>],
    upstream: &'a dyn Upstream,
}

impl<'a> Next<'a> {
    pub(crate) fn new(stages: &'a [Arc<dyn Stage>], upstream: &'a dyn Upstream) -> Self {
        Next { stages, upstream }
    }

    /// Runs the rest of the chain with the given request.
    pub async fn run(self, request: RequestDescriptor) -> StageResult {
        match self.stages.split_first() {
            Some((stage, rest)) => {
                let next = Next {
                    stages: rest,
                    upstream: self.upstream,
                };
                stage.process(request, next).await
            }
            None => self.upstream.exchange(request).await,
        }
    }
}
