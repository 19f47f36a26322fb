//! External analytics sink interface.
//!
//! Every tracked event is forwarded, fire-and-forget, to an
//! [`AnalyticsSink`] in addition to the local ledger write. Sink failures are
//! swallowed inside the implementation and must never affect local state or
//! the user-visible flow, so the trait methods are infallible.

#[cfg(any(test, feature = "testing"))]
use std::sync::Mutex;

use crate::events::{EventName, Properties};

/// Identity forwarded on a successful login.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub group: Option<String>,
}

impl Identity {
    /// An identify call with neither a user id nor an email is a no-op.
    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none() && self.email.is_none()
    }
}

/// Fire-and-forget analytics sink.
pub trait AnalyticsSink: Send + Sync {
    /// Forward a tracked event.
    fn track(&self, event: EventName, properties: &Properties);

    /// Associate subsequent events with a user.
    fn identify(&self, identity: &Identity);

    /// Clear any associated user, e.g. on logout.
    fn reset(&self);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl AnalyticsSink for NoopSink {
    fn track(&self, _event: EventName, _properties: &Properties) {}
    fn identify(&self, _identity: &Identity) {}
    fn reset(&self) {}
}

/// Sink that forwards to the `tracing` subscriber at debug level.
///
/// The local stand-in for a hosted analytics SDK: the "forward" half of every
/// tracked action lands in the log stream instead of a network call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn track(&self, event: EventName, properties: &Properties) {
        tracing::debug!(event = event.as_str(), ?properties, "sink track");
    }

    fn identify(&self, identity: &Identity) {
        if identity.is_anonymous() {
            return;
        }
        tracing::debug!(
            user_id = identity.user_id.as_deref(),
            email = identity.email.as_deref(),
            group = identity.group.as_deref(),
            "sink identify"
        );
    }

    fn reset(&self) {
        tracing::debug!("sink reset");
    }
}

/// A call captured by [`RecordingSink`].
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Track(EventName, Properties),
    Identify(Identity),
    Reset,
}

/// Sink that records every call for test assertions.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
}

#[cfg(any(test, feature = "testing"))]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all calls so far.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Names of all tracked events, in order.
    pub fn tracked(&self) -> Vec<EventName> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                SinkCall::Track(event, _) => Some(*event),
                _ => None,
            })
            .collect()
    }

    /// Discards recorded calls, e.g. after fixture setup.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[cfg(any(test, feature = "testing"))]
impl AnalyticsSink for RecordingSink {
    fn track(&self, event: EventName, properties: &Properties) {
        self.calls
            .lock()
            .unwrap()
            .push(SinkCall::Track(event, properties.clone()));
    }

    fn identify(&self, identity: &Identity) {
        if identity.is_anonymous() {
            return;
        }
        self.calls
            .lock()
            .unwrap()
            .push(SinkCall::Identify(identity.clone()));
    }

    fn reset(&self) {
        self.calls.lock().unwrap().push(SinkCall::Reset);
    }
}
