//! Transient-failure classification.
//!
//! Two pure predicates decide retry eligibility. The status-code rule is
//! deliberately narrow: only gateway/timeout-class statuses are retried.
//! A plain 500 or 501 is a server bug, not a transient condition, and
//! retrying it one second later buys nothing.

use backstop_core::TransportError;
use http::StatusCode;

/// Statuses worth one more attempt: request timeout plus the gateway trio.
const RETRYABLE_STATUSES: [u16; 4] = [408, 502, 503, 504];

/// Message fragments that mark an unclassified I/O error as transient.
const RETRYABLE_MESSAGE_MARKERS: [&str; 5] = [
    "connection reset",
    "connection refused",
    "connection abort",
    "network unreachable",
    "broken pipe",
];

/// Returns `true` when a response status is worth retrying.
///
/// Exactly {408, 502, 503, 504}. Every other code, including 500 and 501,
/// is final.
pub fn is_retryable_status(status: StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status.as_u16())
}

/// Returns `true` when a transport error is worth retrying.
///
/// DNS failures, connect/read timeouts, and the reset/refused/unreachable
/// family are transient. TLS failures never are: a certificate problem
/// will not heal within one second. Unclassified I/O errors fall back to
/// message inspection; with no recognized fragment, they are final.
pub fn is_retryable_error(error: &TransportError) -> bool {
    match error {
        TransportError::DnsFailure(_)
        | TransportError::ConnectTimeout
        | TransportError::ReadTimeout
        | TransportError::ConnectionReset
        | TransportError::ConnectionRefused
        | TransportError::NetworkUnreachable => true,
        TransportError::TlsFailure(_) => false,
        TransportError::Io(message) => {
            let message = message.to_ascii_lowercase();
            RETRYABLE_MESSAGE_MARKERS
                .iter()
                .any(|marker| message.contains(marker))
        }
    }
}
