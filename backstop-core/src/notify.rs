//! Fire-and-forget user notification seam.

use async_trait::async_trait;

/// Delivers a short out-of-band message to the user.
///
/// The pipeline invokes this fire-and-forget: the call is spawned, never
/// awaited on the response path, and a failing notifier must not affect
/// the request outcome.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers the message. Best effort.
    async fn notify(&self, message: &str);
}

/// A notifier that drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _message: &str) {}
}
