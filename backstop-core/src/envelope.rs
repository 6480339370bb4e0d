//! Tri-state request outcome reported to callers.
//!
//! [`Outcome`] is the boundary type handed back by the pipeline's client
//! adapter. It is a tagged union over three states:
//!
//! - [`Outcome::Loading`] - the request has been issued but not resolved
//! - [`Outcome::Success`] - the request resolved with a payload
//! - [`Outcome::Error`] - the request failed, with a human-readable message
//!
//! Exactly one variant is ever active, `Loading` carries no payload, and an
//! `Error` always carries a non-empty message ([`OutcomeError::new`]
//! substitutes a generic message for an empty one).
//!
//! The `on_*` combinators are pass-through: each applies its callback only
//! when the outcome is in the matching state and returns the outcome
//! unchanged, so observers can be chained without altering control flow.
//!
//! ```
//! use backstop_core::Outcome;
//!
//! let outcome = Outcome::success(42)
//!     .on_success(|n| println!("got {n}"))
//!     .on_error(|e| eprintln!("failed: {}", e.message()));
//!
//! assert!(outcome.is_success());
//! assert_eq!(outcome.data(), Some(&42));
//! ```

use std::fmt;

use crate::error::TransportError;

/// Fallback used when an error is constructed with an empty message.
const GENERIC_ERROR_MESSAGE: &str = "request failed";

/// The error payload of a failed [`Outcome`].
///
/// Carries an optional HTTP status code (`None` for pure transport
/// failures), a human-readable message, and the originating
/// [`TransportError`] when one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeError {
    code: Option<u16>,
    message: String,
    cause: Option<TransportError>,
}

impl OutcomeError {
    /// Creates a new error payload.
    ///
    /// An empty message is replaced with a generic one so that every
    /// error surfaced to a caller reads as prose.
    pub fn new(code: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.is_empty() {
            GENERIC_ERROR_MESSAGE.to_owned()
        } else {
            message
        };
        OutcomeError {
            code,
            message,
            cause: None,
        }
    }

    /// Attaches the originating transport error.
    pub fn with_cause(mut self, cause: TransportError) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Returns the HTTP status code, if one is known.
    pub fn code(&self) -> Option<u16> {
        self.code
    }

    /// Returns the human-readable message. Never empty.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the originating transport error, if any.
    pub fn cause(&self) -> Option<&TransportError> {
        self.cause.as_ref()
    }
}

impl fmt::Display for OutcomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} ({})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Tri-state result of a logical request.
///
/// See the [module documentation](self) for the state machine and the
/// combinator contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The request is in flight.
    Loading,
    /// The request resolved successfully with a payload.
    Success(T),
    /// The request failed.
    Error(OutcomeError),
}

impl<T> Outcome<T> {
    /// Creates a successful outcome.
    pub fn success(data: T) -> Self {
        Outcome::Success(data)
    }

    /// Creates a loading outcome.
    pub fn loading() -> Self {
        Outcome::Loading
    }

    /// Creates a failed outcome from a code and message.
    pub fn error(code: Option<u16>, message: impl Into<String>) -> Self {
        Outcome::Error(OutcomeError::new(code, message))
    }

    /// Transforms the success payload, leaving the other states untouched.
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Loading => Outcome::Loading,
            Outcome::Success(data) => Outcome::Success(f(data)),
            Outcome::Error(error) => Outcome::Error(error),
        }
    }

    /// Applies `f` to the payload when successful; pass-through otherwise.
    pub fn on_success<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Outcome::Success(ref data) = self {
            f(data);
        }
        self
    }

    /// Applies `f` to the error when failed; pass-through otherwise.
    pub fn on_error<F>(self, f: F) -> Self
    where
        F: FnOnce(&OutcomeError),
    {
        if let Outcome::Error(ref error) = self {
            f(error);
        }
        self
    }

    /// Applies `f` when loading; pass-through otherwise.
    pub fn on_loading<F>(self, f: F) -> Self
    where
        F: FnOnce(),
    {
        if let Outcome::Loading = self {
            f();
        }
        self
    }

    /// Returns `true` for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Returns `true` for [`Outcome::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }

    /// Returns `true` for [`Outcome::Loading`].
    pub fn is_loading(&self) -> bool {
        matches!(self, Outcome::Loading)
    }

    /// Returns the success payload, or `None` in any other state.
    pub fn data(&self) -> Option<&T> {
        match self {
            Outcome::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Consumes the outcome, returning the success payload if present.
    pub fn into_data(self) -> Option<T> {
        match self {
            Outcome::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Returns the error payload, or `None` in any other state.
    pub fn error_info(&self) -> Option<&OutcomeError> {
        match self {
            Outcome::Error(error) => Some(error),
            _ => None,
        }
    }

    /// Returns the error message, or `None` in any other state.
    pub fn error_message(&self) -> Option<&str> {
        self.error_info().map(OutcomeError::message)
    }

    /// Returns the HTTP status code of the error, if failed with one.
    pub fn error_code(&self) -> Option<u16> {
        self.error_info().and_then(OutcomeError::code)
    }
}

impl<T> From<OutcomeError> for Outcome<T> {
    fn from(error: OutcomeError) -> Self {
        Outcome::Error(error)
    }
}
