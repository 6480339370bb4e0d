#![warn(missing_docs)]
//! # backstop
//!
//! A resilience pipeline for outbound HTTP calls. Every logical request
//! runs through a fixed chain of middleware stages before reaching the
//! transport:
//!
//! ```text
//! header injection -> retry -> duplicate suppression -> memory cache -> transport
//! ```
//!
//! The composition order is a contract, not an implementation detail:
//! header injection must see the final request so the cache key is stable,
//! retry must wrap cache and network so a retried attempt can still hit or
//! populate the cache, and duplicate suppression must run before the real
//! network call while keeping visibility into the cache for its fallback
//! path.
//!
//! ## Quick start
//!
//! ```
//! use std::sync::Arc;
//! use backstop::{Chain, Client, PipelineConfig};
//! use backstop_core::{ExchangeResponse, RequestDescriptor, TransportError, Upstream};
//!
//! # struct StaticUpstream;
//! # #[async_trait::async_trait]
//! # impl Upstream for StaticUpstream {
//! #     async fn exchange(
//! #         &self,
//! #         _request: RequestDescriptor,
//! #     ) -> Result<ExchangeResponse, TransportError> {
//! #         Ok(ExchangeResponse::new(
//! #             http::StatusCode::OK,
//! #             http::HeaderMap::new(),
//! #             bytes::Bytes::from_static(b"{}"),
//! #         ))
//! #     }
//! # }
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let chain = Chain::builder()
//!     .config(PipelineConfig::default())
//!     .build(Arc::new(StaticUpstream));
//! let client = Client::new(chain);
//!
//! let request = RequestDescriptor::get("https://api.example.com/users".parse().unwrap());
//! let outcome = client.call(request).await;
//! assert!(outcome.is_success());
//! # }
//! ```

/// Cache statistics and the clear-all operation, for diagnostics callers.
pub mod admin;

/// The middleware chain: fixed stage ordering and the chain builder.
pub mod chain;

/// Transient-failure classification.
///
/// Pure predicates deciding whether a status code or transport error is
/// worth retrying. Only gateway/timeout-class statuses qualify; TLS
/// failures never do.
pub mod classify;

/// Boundary adapter turning raw chain results into [`Outcome`] envelopes.
pub mod client;

/// Pipeline configuration: retry counts, delays, TTLs, injected headers.
pub mod config;

/// Middleware stages and the `process(request, next)` contract.
pub mod stage;

/// The shared cache engine: entry map, recent-request map, sweep.
pub mod store;

pub use admin::CacheAdmin;
pub use chain::{Chain, ChainBuilder};
pub use client::Client;
pub use config::PipelineConfig;
pub use store::{CacheStore, StoreStats};

pub use backstop_core::{
    CacheEntry, ExchangeResponse, Fingerprint, NoopNotifier, Notifier, Outcome, OutcomeError, Raw,
    RequestDescriptor, TransportError, Upstream,
};
