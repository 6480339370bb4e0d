//! Upstream implementation over a `reqwest::Client`.

use std::time::Duration;

use async_trait::async_trait;
use backstop_core::{ExchangeResponse, RequestDescriptor, TransportError, Upstream};
use tracing::trace;

/// Fixed connect timeout applied at client construction.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Fixed overall request timeout applied at client construction.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Performs exchanges with a [`reqwest::Client`].
///
/// Response bodies are buffered fully; the pipeline works on complete
/// byte bodies.
#[derive(Clone, Debug)]
pub struct ReqwestUpstream {
    client: reqwest::Client,
}

impl ReqwestUpstream {
    /// Wraps an existing client. Timeouts are whatever the client was
    /// built with.
    pub fn new(client: reqwest::Client) -> Self {
        ReqwestUpstream { client }
    }

    /// Builds a client with the fixed default connect/request timeouts.
    pub fn with_default_timeouts() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(ReqwestUpstream { client })
    }
}

#[async_trait]
impl Upstream for ReqwestUpstream {
    async fn exchange(
        &self,
        request: RequestDescriptor,
    ) -> Result<ExchangeResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.uri().to_string())
            .headers(request.headers().clone());
        if let Some(body) = request.body() {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(classify_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(classify_error)?;
        trace!(status = status.as_u16(), bytes = body.len(), "exchange completed");

        Ok(ExchangeResponse::new(status, headers, body))
    }
}

/// Maps a `reqwest::Error` into the pipeline's transport taxonomy.
fn classify_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        return if error.is_connect() {
            TransportError::ConnectTimeout
        } else {
            TransportError::ReadTimeout
        };
    }
    classify_message(&error_chain(&error))
}

/// Message-based classification for errors reqwest does not expose
/// structurally (DNS, TLS, and the reset/refused/unreachable family all
/// surface as opaque I/O causes).
fn classify_message(text: &str) -> TransportError {
    let lower = text.to_ascii_lowercase();
    if lower.contains("certificate") || lower.contains("tls") || lower.contains("ssl") {
        TransportError::TlsFailure(text.to_owned())
    } else if lower.contains("dns")
        || lower.contains("failed to resolve")
        || lower.contains("name or service not known")
    {
        TransportError::DnsFailure(text.to_owned())
    } else if lower.contains("connection refused") {
        TransportError::ConnectionRefused
    } else if lower.contains("connection reset") {
        TransportError::ConnectionReset
    } else if lower.contains("unreachable") {
        TransportError::NetworkUnreachable
    } else {
        TransportError::Io(text.to_owned())
    }
}

/// Flattens an error and its source chain into one line.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tls_messages_classify_as_tls_failure() {
        assert!(matches!(
            classify_message("error sending request: invalid peer certificate"),
            TransportError::TlsFailure(_)
        ));
    }

    #[test]
    fn dns_messages_classify_as_dns_failure() {
        assert!(matches!(
            classify_message("client error: dns error: Name or service not known"),
            TransportError::DnsFailure(_)
        ));
    }

    #[test]
    fn connect_family_classifies_by_fragment() {
        assert_eq!(
            classify_message("tcp connect error: Connection refused (os error 111)"),
            TransportError::ConnectionRefused
        );
        assert_eq!(
            classify_message("Connection reset by peer (os error 104)"),
            TransportError::ConnectionReset
        );
        assert_eq!(
            classify_message("Network is unreachable (os error 101)"),
            TransportError::NetworkUnreachable
        );
    }

    #[test]
    fn unknown_messages_stay_opaque() {
        assert!(matches!(
            classify_message("error decoding response body"),
            TransportError::Io(_)
        ));
    }
}
