//! Immutable outbound request description.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};

/// An immutable description of one logical HTTP request.
///
/// Descriptors are never mutated inside the pipeline. A stage that needs
/// to add a header derives a new descriptor via [`with_header`], leaving
/// the original untouched (copy-on-write). Bodies are [`Bytes`], so the
/// copy is a reference-count bump rather than a byte copy.
///
/// # Example
///
/// ```
/// use backstop_core::RequestDescriptor;
/// use http::header::ACCEPT;
///
/// let request = RequestDescriptor::get("https://api.example.com/users".parse().unwrap());
/// let derived = request.with_header(ACCEPT, "application/json".parse().unwrap());
///
/// assert!(request.headers().get(ACCEPT).is_none());
/// assert!(derived.headers().get(ACCEPT).is_some());
/// ```
///
/// [`with_header`]: RequestDescriptor::with_header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl RequestDescriptor {
    /// Creates a descriptor with no headers and no body.
    pub fn new(method: Method, uri: Uri) -> Self {
        RequestDescriptor {
            method,
            uri,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Shorthand for a GET descriptor.
    pub fn get(uri: Uri) -> Self {
        Self::new(Method::GET, uri)
    }

    /// Shorthand for a POST descriptor.
    pub fn post(uri: Uri) -> Self {
        Self::new(Method::POST, uri)
    }

    /// Shorthand for a PUT descriptor.
    pub fn put(uri: Uri) -> Self {
        Self::new(Method::PUT, uri)
    }

    /// Shorthand for a PATCH descriptor.
    pub fn patch(uri: Uri) -> Self {
        Self::new(Method::PATCH, uri)
    }

    /// Shorthand for a DELETE descriptor.
    pub fn delete(uri: Uri) -> Self {
        Self::new(Method::DELETE, uri)
    }

    /// Derives a new descriptor with the given header set.
    ///
    /// An existing header with the same name is replaced. Header names are
    /// case-insensitive by construction of [`HeaderName`].
    pub fn with_header(&self, name: HeaderName, value: HeaderValue) -> Self {
        let mut derived = self.clone();
        derived.headers.insert(name, value);
        derived
    }

    /// Derives a new descriptor carrying the given body.
    pub fn with_body(&self, body: Bytes) -> Self {
        let mut derived = self.clone();
        derived.body = Some(body);
        derived
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the target URI.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the header map.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the body bytes, if a body is attached.
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}
