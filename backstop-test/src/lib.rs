//! Test doubles for exercising the Backstop pipeline without a network.
//!
//! [`MockUpstream`] plays back a scripted sequence of transport outcomes
//! and counts invocations, which is how the suppression, caching, and
//! retry contracts are asserted. [`RecordingNotifier`] captures user
//! notices for inspection.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use backstop_core::{
    ExchangeResponse, Notifier, RequestDescriptor, TransportError, Upstream,
};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};

/// One scripted transport outcome.
pub type ScriptedOutcome = Result<ExchangeResponse, TransportError>;

/// An [`Upstream`] that plays back a script.
///
/// Outcomes are consumed front to back; once a single outcome remains it
/// repeats forever, so "always fails with X" is just a one-element script.
/// Every call is counted and the exact descriptor seen is recorded.
pub struct MockUpstream {
    script: Mutex<VecDeque<ScriptedOutcome>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<RequestDescriptor>>,
}

impl MockUpstream {
    /// Creates an upstream that plays back `outcomes` in order, repeating
    /// the last one when the script runs out.
    pub fn script(outcomes: Vec<ScriptedOutcome>) -> Self {
        MockUpstream {
            script: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Creates an upstream that always produces `outcome`.
    pub fn returning(outcome: ScriptedOutcome) -> Self {
        Self::script(vec![outcome])
    }

    /// Number of times `exchange` has been invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every descriptor the upstream has seen, in order.
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Upstream for MockUpstream {
    async fn exchange(
        &self,
        request: RequestDescriptor,
    ) -> Result<ExchangeResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request);

        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().expect("script is non-empty")
        } else {
            script
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(response(StatusCode::OK, b"{}")))
        }
    }
}

/// A [`Notifier`] that appends every message to a shared list.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_owned());
    }
}

/// Builds a headerless response with the given status and body.
pub fn response(status: StatusCode, body: &'static [u8]) -> ExchangeResponse {
    ExchangeResponse::new(status, HeaderMap::new(), Bytes::from_static(body))
}
