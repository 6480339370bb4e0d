//! Deterministic cache keys for request de-duplication and caching.
//!
//! A [`Fingerprint`] identifies a request for caching purposes. It is
//! derived from the method, the full URL, and exactly two headers:
//! `authorization` and `content-type`. Everything else (request IDs,
//! timestamps, tracing headers) is deliberately excluded so that
//! otherwise-identical calls land in the same cache bucket.
//!
//! Distinct requests that happen to produce the same fingerprint share a
//! bucket; collisions are an accepted risk and are not detected.
//!
//! ```
//! use backstop_core::{Fingerprint, RequestDescriptor};
//! use http::header::{AUTHORIZATION, HeaderName};
//!
//! let uri: http::Uri = "https://api.example.com/users".parse().unwrap();
//! let a = RequestDescriptor::get(uri.clone())
//!     .with_header(AUTHORIZATION, "Bearer t".parse().unwrap());
//! let b = a.with_header(HeaderName::from_static("x-request-id"), "42".parse().unwrap());
//!
//! // The request ID is irrelevant for caching.
//! assert_eq!(Fingerprint::of(&a), Fingerprint::of(&b));
//! ```

use std::fmt;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use smol_str::SmolStr;

use crate::request::RequestDescriptor;

/// A deterministic cache key derived from a [`RequestDescriptor`].
///
/// Cheap to clone ([`SmolStr`] is either inline or reference-counted) and
/// usable directly as a concurrent-map key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(SmolStr);

impl Fingerprint {
    /// Derives the fingerprint of a request.
    ///
    /// Pure: two structurally equal descriptors always fingerprint
    /// identically, regardless of when or how often this is called.
    pub fn of(request: &RequestDescriptor) -> Self {
        let mut raw = String::with_capacity(64);
        raw.push_str(request.method().as_str());
        raw.push(' ');
        raw.push_str(&request.uri().to_string());
        for name in [AUTHORIZATION, CONTENT_TYPE] {
            if let Some(value) = request.headers().get(&name) {
                raw.push(' ');
                raw.push_str(name.as_str());
                raw.push('=');
                // Header values are almost always visible ASCII; opaque
                // bytes still fingerprint deterministically.
                raw.push_str(&String::from_utf8_lossy(value.as_bytes()));
            }
        }
        Fingerprint(SmolStr::new(raw))
    }

    /// Returns the fingerprint as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
