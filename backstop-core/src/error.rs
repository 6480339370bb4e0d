//! Transport-layer failure taxonomy.
//!
//! [`TransportError`] enumerates the ways a single HTTP exchange can fail
//! below the status-code level. The `Display` strings double as the
//! human-readable messages attached to caller-facing errors, so each one
//! is written as prose rather than a debug dump.

use thiserror::Error;

/// A failure raised by the underlying transport while performing one
/// HTTP exchange.
///
/// Unrecognized I/O failures are carried as [`TransportError::Io`] with
/// the transport's own message preserved; the retry classifier falls back
/// to message inspection for those.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Host name resolution failed.
    #[error("could not resolve host: {0}")]
    DnsFailure(String),
    /// The connection attempt timed out.
    #[error("connection timed out")]
    ConnectTimeout,
    /// The server stopped responding mid-exchange.
    #[error("read timed out")]
    ReadTimeout,
    /// The peer reset the connection.
    #[error("connection reset by peer")]
    ConnectionReset,
    /// The peer refused the connection.
    #[error("connection refused")]
    ConnectionRefused,
    /// No route to the target network.
    #[error("network unreachable")]
    NetworkUnreachable,
    /// TLS negotiation or certificate validation failed.
    #[error("secure connection failed: {0}")]
    TlsFailure(String),
    /// Any other I/O failure, with the transport's message preserved.
    #[error("transport error: {0}")]
    Io(String),
}
