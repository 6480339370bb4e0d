//! Pipeline configuration.
//!
//! [`PipelineConfig`] gathers every tunable the chain needs: how many
//! retries, how long to back off, how long cached responses live, how wide
//! the duplicate-suppression window is, and which headers to inject into
//! every outgoing request. The defaults match the reference behavior:
//! one retry with a 1 s base delay, a 10 s memory TTL, and a 1 s
//! duplicate window.

use std::time::Duration;

use http::{HeaderName, HeaderValue};

const DEFAULT_MAX_RETRIES: u32 = 1;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);
const DEFAULT_MEMORY_TTL: Duration = Duration::from_millis(10_000);
const DEFAULT_DUPLICATE_WINDOW: Duration = Duration::from_millis(1000);

/// Configuration for a [`Chain`](crate::Chain).
///
/// Constructed via [`Default`] and refined with the `with_*` setters:
///
/// ```
/// use std::time::Duration;
/// use backstop::PipelineConfig;
///
/// let config = PipelineConfig::default()
///     .with_max_retries(2)
///     .with_retry_delay(Duration::from_millis(250));
///
/// assert_eq!(config.max_retries(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    max_retries: u32,
    retry_delay: Duration,
    memory_ttl: Duration,
    duplicate_window: Duration,
    injected_headers: Vec<(HeaderName, HeaderValue)>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            memory_ttl: DEFAULT_MEMORY_TTL,
            duplicate_window: DEFAULT_DUPLICATE_WINDOW,
            injected_headers: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Sets how many times a failed attempt is re-issued.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the base retry delay. Attempt `n` waits `delay * 2^n`.
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Sets how long cached GET responses stay fresh.
    pub fn with_memory_ttl(mut self, memory_ttl: Duration) -> Self {
        self.memory_ttl = memory_ttl;
        self
    }

    /// Sets the window within which a repeated request is suppressed.
    pub fn with_duplicate_window(mut self, duplicate_window: Duration) -> Self {
        self.duplicate_window = duplicate_window;
        self
    }

    /// Adds a header injected into every outgoing request.
    pub fn with_injected_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.injected_headers.push((name, value));
        self
    }

    /// Maximum number of re-attempts after the initial one.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Base delay before a retry.
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Freshness TTL for cached responses.
    pub fn memory_ttl(&self) -> Duration {
        self.memory_ttl
    }

    /// Duplicate-suppression window.
    pub fn duplicate_window(&self) -> Duration {
        self.duplicate_window
    }

    /// Headers injected into every outgoing request.
    pub fn injected_headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.injected_headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_retries(), 1);
        assert_eq!(config.retry_delay(), Duration::from_millis(1000));
        assert_eq!(config.memory_ttl(), Duration::from_millis(10_000));
        assert_eq!(config.duplicate_window(), Duration::from_millis(1000));
        assert!(config.injected_headers().is_empty());
    }
}
