//! The event ledger writer.
//!
//! Every tracked action is appended to the `localAmplitudeEvents` collection
//! and mirrored, fire-and-forget, to the external analytics sink. The ledger
//! is append-only apart from cap eviction: once it exceeds
//! [`LEDGER_CAP`] records, the oldest entries are dropped first.

use std::sync::Arc;

use crate::{
    Result,
    auth::CurrentUser,
    clock::Clock,
    constants::{CURRENT_USER_KEY, EVENT_LEDGER_KEY, LEDGER_CAP, SESSION_KEY},
    events::{EventName, EventRecord, PropKey, Properties},
    session::SessionRecord,
    sink::AnalyticsSink,
    storage::{Storage, read_json, write_json},
};

/// Appends tracked events to the ledger and forwards them to the sink.
#[derive(Clone)]
pub struct EventLedger {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn AnalyticsSink>,
}

impl EventLedger {
    pub fn new(
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            storage,
            clock,
            sink,
        }
    }

    /// Records one event.
    ///
    /// The actor resolves to the current user's email when one is logged in,
    /// else to the event's own `email` property, else stays absent. A
    /// malformed existing ledger is treated as empty rather than an error.
    /// The sink is always invoked, even when the local write fails; its
    /// failures never propagate here.
    pub fn record(&self, event: EventName, properties: Properties) -> Result<()> {
        let outcome = self.append_local(event, &properties);
        self.sink.track(event, &properties);
        outcome
    }

    /// Records a generic `Page Viewed` event carrying the page name.
    pub fn record_page_view(&self, page: &str) -> Result<()> {
        self.record(
            EventName::PageViewed,
            Properties::new().with_str(PropKey::Page, page),
        )
    }

    /// Tolerant read of the full ledger.
    pub fn events(&self) -> Vec<EventRecord> {
        read_json(&*self.storage, EVENT_LEDGER_KEY).unwrap_or_default()
    }

    fn append_local(&self, event: EventName, properties: &Properties) -> Result<()> {
        let mut list: Vec<EventRecord> =
            read_json(&*self.storage, EVENT_LEDGER_KEY).unwrap_or_default();

        let session_id = read_json::<SessionRecord>(&*self.storage, SESSION_KEY)
            .into_option()
            .map(|record| record.id);

        let user = read_json::<CurrentUser>(&*self.storage, CURRENT_USER_KEY)
            .into_option()
            .map(|current| current.email)
            .filter(|email| !email.is_empty())
            .or_else(|| {
                properties
                    .str_value(PropKey::Email)
                    .map(|email| email.to_string())
            });

        list.push(EventRecord {
            id: list.len() as u64 + 1,
            event,
            properties: properties.clone(),
            ts: self.clock.now_millis(),
            user,
            session_id,
        });
        if list.len() > LEDGER_CAP {
            let overflow = list.len() - LEDGER_CAP;
            list.drain(..overflow);
        }

        write_json(&*self.storage, EVENT_LEDGER_KEY, &list)
    }
}
