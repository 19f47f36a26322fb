//! Polling refresh over the record store.
//!
//! The dashboard re-reads the store every [`POLL_INTERVAL`] to pick up
//! out-of-band writes (another tab, another process holding the same
//! snapshot file). The refresh is last-write-wins and short-circuits when
//! nothing identifying changed, so consumers skip redundant recomputes.
//! The consuming view owns the timer and tears it down when it goes away.

use std::sync::Arc;

use crate::{
    constants::{EVENT_LEDGER_KEY, USERS_KEY},
    directory::UserRecord,
    events::EventRecord,
    storage::{Storage, read_json},
};

pub use crate::constants::POLL_INTERVAL;

/// A consistent-enough view of the ledger and user list at one poll.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub events: Vec<EventRecord>,
    pub users: Vec<UserRecord>,
}

/// Detects store changes between polls.
pub struct Watcher {
    storage: Arc<dyn Storage>,
    current: Snapshot,
    primed: bool,
}

impl Watcher {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            current: Snapshot::default(),
            primed: false,
        }
    }

    /// The most recently observed snapshot.
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    /// Re-reads the store; returns the fresh snapshot only when something
    /// changed since the last poll.
    ///
    /// The events collection counts as unchanged when the length and the
    /// newest record's `(id, ts)` are the same; the user list when its
    /// length is the same. The first poll always reports a snapshot.
    pub fn poll(&mut self) -> Option<Snapshot> {
        let events: Vec<EventRecord> =
            read_json(&*self.storage, EVENT_LEDGER_KEY).unwrap_or_default();
        let users: Vec<UserRecord> = read_json(&*self.storage, USERS_KEY).unwrap_or_default();

        let events_unchanged = events.len() == self.current.events.len()
            && match (events.last(), self.current.events.last()) {
                (Some(new), Some(old)) => new.id == old.id && new.ts == old.ts,
                (None, None) => true,
                _ => false,
            };
        let users_unchanged = users.len() == self.current.users.len();

        if self.primed && events_unchanged && users_unchanged {
            return None;
        }

        self.primed = true;
        self.current = Snapshot { events, users };
        Some(self.current.clone())
    }
}
