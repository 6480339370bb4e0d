//! Transport response carried through the pipeline.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

/// The result of one successful transport exchange: a status code, the
/// response headers, and a fully buffered body.
///
/// Stages annotate responses with diagnostic headers (cache status, policy
/// markers) via [`insert_header`](ExchangeResponse::insert_header); the body
/// and status are never rewritten by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ExchangeResponse {
    /// Creates a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        ExchangeResponse {
            status,
            headers,
            body,
        }
    }

    /// Returns the HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consumes the response, returning the body bytes.
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Returns `true` when the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Sets a header, replacing any existing value.
    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }
}
