#![warn(missing_docs)]
//! # backstop-core
//!
//! Core types and seam traits for the Backstop HTTP client pipeline.
//!
//! This crate holds the vocabulary shared by every pipeline stage and by
//! transport adapters:
//!
//! - **Describe** an outbound request ([`RequestDescriptor`])
//! - **Carry** a transport outcome ([`ExchangeResponse`], [`TransportError`])
//! - **Key** the cache ([`Fingerprint`])
//! - **Snapshot** a cached response ([`CacheEntry`])
//! - **Call** the transport ([`Upstream`])
//! - **Signal** the user out-of-band ([`Notifier`])
//! - **Report** a normalized result to callers ([`Outcome`])
//!
//! Nothing in this crate makes a policy decision. Retry, de-duplication
//! and caching live in the `backstop` crate and are built on top of these
//! types.

pub mod entry;
pub mod envelope;
pub mod error;
pub mod fingerprint;
pub mod notify;
pub mod request;
pub mod response;
pub mod upstream;

pub use entry::CacheEntry;
pub use envelope::{Outcome, OutcomeError};
pub use error::TransportError;
pub use fingerprint::Fingerprint;
pub use notify::{Notifier, NoopNotifier};
pub use request::RequestDescriptor;
pub use response::ExchangeResponse;
pub use upstream::Upstream;

/// Raw byte data type used for request and response bodies.
/// Using `Bytes` provides efficient zero-copy cloning via reference counting.
pub type Raw = bytes::Bytes;
