//! Seam between the pipeline and the actual transport.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::request::RequestDescriptor;
use crate::response::ExchangeResponse;

/// Performs one HTTP exchange.
///
/// This is the only operation in the pipeline expected to suspend on I/O.
/// Implementations live outside the core: a real transport adapter (see
/// `backstop-reqwest`) or a scripted double in tests.
///
/// A returned [`ExchangeResponse`] means the transport completed an
/// exchange, whatever the status code; [`TransportError`] means no usable
/// response was obtained.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Issues the request and returns the raw transport outcome.
    async fn exchange(&self, request: RequestDescriptor)
    -> Result<ExchangeResponse, TransportError>;
}
