//! Chain composition.
//!
//! [`Chain`] wires the stages in their fixed, contractual order:
//!
//! 1. [`HeaderStage`] - must see the final request
//! 2. [`RetryStage`] - wraps cache and network so a retried attempt can
//!    still hit or populate the cache
//! 3. [`DuplicateSuppressionStage`] - runs before the real network call,
//!    with visibility into the cache for its fallback path
//! 4. [`MemoryCacheStage`] - innermost policy, directly over the upstream
//!
//! Reordering these breaks the documented fallback behaviors, so the
//! builder does not expose stage ordering - only configuration, the shared
//! store, the notifier, and the upstream.

use std::sync::Arc;

use backstop_core::{NoopNotifier, Notifier, RequestDescriptor, Upstream};
use tracing::instrument;

use crate::config::PipelineConfig;
use crate::stage::{
    DuplicateSuppressionStage, HeaderStage, MemoryCacheStage, Next, RetryStage, Stage, StageResult,
};
use crate::store::CacheStore;

/// The composed middleware chain over one upstream.
///
/// A chain is cheap to share (`Arc` it) and safe under concurrent
/// invocation; the only shared mutable state lives in the [`CacheStore`].
pub struct Chain {
    stages: Vec<Arc<dyn Stage>>,
    upstream: Arc<dyn Upstream>,
    store: Arc<CacheStore>,
}

impl Chain {
    /// Starts building a chain.
    pub fn builder() -> ChainBuilder {
        ChainBuilder::default()
    }

    /// Runs a request through every stage and the upstream.
    #[instrument(skip_all, fields(method = %request.method(), uri = %request.uri()))]
    pub async fn execute(&self, request: RequestDescriptor) -> StageResult {
        Next::new(&self.stages, self.upstream.as_ref())
            .run(request)
            .await
    }

    /// The cache store backing this chain.
    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }
}

/// Builder for [`Chain`].
pub struct ChainBuilder {
    config: PipelineConfig,
    notifier: Arc<dyn Notifier>,
    store: Option<Arc<CacheStore>>,
}

impl Default for ChainBuilder {
    fn default() -> Self {
        ChainBuilder {
            config: PipelineConfig::default(),
            notifier: Arc::new(NoopNotifier),
            store: None,
        }
    }
}

impl ChainBuilder {
    /// Sets the pipeline configuration.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the user-notification channel used by duplicate suppression.
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Shares an existing store instead of creating a fresh one, so
    /// several chains can serve from the same cache.
    pub fn store(mut self, store: Arc<CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Builds the chain over the given upstream.
    pub fn build(self, upstream: Arc<dyn Upstream>) -> Chain {
        let store = self.store.unwrap_or_else(|| {
            Arc::new(CacheStore::new(
                self.config.memory_ttl(),
                self.config.duplicate_window(),
            ))
        });

        let stages: Vec<Arc<dyn Stage>> = vec![
            Arc::new(HeaderStage::new(self.config.injected_headers().to_vec())),
            Arc::new(RetryStage::new(
                self.config.max_retries(),
                self.config.retry_delay(),
            )),
            Arc::new(DuplicateSuppressionStage::new(
                Arc::clone(&store),
                self.notifier,
            )),
            Arc::new(MemoryCacheStage::new(Arc::clone(&store))),
        ];

        Chain {
            stages,
            upstream,
            store,
        }
    }
}
