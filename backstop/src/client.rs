//! Boundary adapter: raw chain results to caller-facing envelopes.
//!
//! [`Client`] is the single place where transport outcomes become
//! [`Outcome`] values. Everything the chain produces funnels through here:
//! 2xx responses become `Success`, other statuses become `Error` with a
//! short human message, and transport failures become `Error` with the
//! cause attached and no status code. Messages are always prose - never a
//! stack trace.

use backstop_core::{Outcome, OutcomeError, Raw, RequestDescriptor};
use http::StatusCode;

use crate::admin::CacheAdmin;
use crate::chain::Chain;

/// Caller-facing adapter over a [`Chain`].
pub struct Client {
    chain: Chain,
}

impl Client {
    /// Wraps a chain.
    pub fn new(chain: Chain) -> Self {
        Client { chain }
    }

    /// Issues a logical request and normalizes the result.
    ///
    /// A 2xx response with a body becomes `Success`; a 2xx response with
    /// an empty body is a broken expectation and surfaces as an error. Any
    /// other status maps to an error with its code and a human-readable
    /// message; transport failures carry their cause and no code.
    pub async fn call(&self, request: RequestDescriptor) -> Outcome<Raw> {
        match self.chain.execute(request).await {
            Ok(response) if response.is_success() => {
                let status = response.status();
                let body = response.into_body();
                if body.is_empty() {
                    Outcome::error(Some(status.as_u16()), "empty response")
                } else {
                    Outcome::success(body)
                }
            }
            Ok(response) => Outcome::Error(OutcomeError::new(
                Some(response.status().as_u16()),
                status_message(response.status()),
            )),
            Err(error) => {
                Outcome::Error(OutcomeError::new(None, error.to_string()).with_cause(error))
            }
        }
    }

    /// Returns the diagnostics handle for this client's cache.
    pub fn admin(&self) -> CacheAdmin {
        CacheAdmin::new(self.chain.store().clone())
    }

    /// The underlying chain.
    pub fn chain(&self) -> &Chain {
        &self.chain
    }
}

/// Human-readable message for a non-2xx status.
fn status_message(status: StatusCode) -> String {
    let message = match status.as_u16() {
        400 => "bad request",
        401 => "unauthorized",
        403 => "forbidden",
        404 => "not found",
        408 => "timeout",
        429 => "rate limited",
        500 => "server error",
        502 => "bad gateway",
        503 => "unavailable",
        _ => {
            return status
                .canonical_reason()
                .map(str::to_owned)
                .unwrap_or_else(|| format!("http error {}", status.as_u16()));
        }
    };
    message.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_map_to_fixed_prose() {
        assert_eq!(status_message(StatusCode::BAD_REQUEST), "bad request");
        assert_eq!(status_message(StatusCode::UNAUTHORIZED), "unauthorized");
        assert_eq!(status_message(StatusCode::FORBIDDEN), "forbidden");
        assert_eq!(status_message(StatusCode::NOT_FOUND), "not found");
        assert_eq!(status_message(StatusCode::REQUEST_TIMEOUT), "timeout");
        assert_eq!(status_message(StatusCode::TOO_MANY_REQUESTS), "rate limited");
        assert_eq!(
            status_message(StatusCode::INTERNAL_SERVER_ERROR),
            "server error"
        );
        assert_eq!(status_message(StatusCode::BAD_GATEWAY), "bad gateway");
        assert_eq!(
            status_message(StatusCode::SERVICE_UNAVAILABLE),
            "unavailable"
        );
    }

    #[test]
    fn unlisted_statuses_fall_back_to_the_reason_phrase() {
        assert_eq!(status_message(StatusCode::GONE), "Gone");
        assert_eq!(
            status_message(StatusCode::GATEWAY_TIMEOUT),
            "Gateway Timeout"
        );
    }
}
