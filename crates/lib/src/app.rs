//! Application facade wiring the store to every service.
//!
//! `App` owns the shared handles (store, clock, sink) and hands out
//! cheaply-cloneable service objects. Services built from the same `App`
//! observe the same store, so an auth flow's writes are immediately visible
//! to the directory and to analytics reads.

use std::sync::Arc;

use crate::{
    auth::Authenticator,
    clock::{Clock, SystemClock},
    directory::{GroupFilter, UserDirectory},
    events::EventRecord,
    ledger::EventLedger,
    session::SessionManager,
    sink::{AnalyticsSink, TracingSink},
    storage::Storage,
};
use crate::analytics::{self, Dashboard, ExplorerQuery, ExplorerView, Watcher};

/// Entry point tying one store to the auth, directory, and analytics
/// services.
#[derive(Clone)]
pub struct App {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn AnalyticsSink>,
}

impl App {
    /// Builds an app on the given store with the system clock and a sink
    /// that logs events through `tracing`.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_sink(storage, Arc::new(TracingSink))
    }

    /// Builds an app with a caller-provided sink.
    pub fn with_sink(storage: Arc<dyn Storage>, sink: Arc<dyn AnalyticsSink>) -> Self {
        Self {
            storage,
            clock: Arc::new(SystemClock),
            sink,
        }
    }

    /// Fully-injected constructor for tests.
    #[cfg(any(test, feature = "testing"))]
    pub fn with_parts(
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

    pub fn storage(&self) -> Arc<dyn Storage> {
        self.storage.clone()
    }

    pub fn ledger(&self) -> EventLedger {
        EventLedger::new(self.storage.clone(), self.clock.clone(), self.sink.clone())
    }

    pub fn sessions(&self) -> SessionManager {
        SessionManager::new(self.storage.clone(), self.clock.clone())
    }

    pub fn auth(&self) -> Authenticator {
        Authenticator::new(
            self.storage.clone(),
            self.ledger(),
            self.sessions(),
            self.sink.clone(),
        )
    }

    pub fn directory(&self) -> UserDirectory {
        UserDirectory::new(self.storage.clone(), self.ledger())
    }

    pub fn watcher(&self) -> Watcher {
        Watcher::new(self.storage.clone())
    }

    /// Aggregates the current store contents into the dashboard view.
    pub fn dashboard(&self) -> Dashboard {
        analytics::dashboard(&self.ledger().events(), &crate::directory::load_users(&*self.storage))
    }

    /// Filters and orders the current ledger for the event explorer.
    pub fn explore(&self, query: &ExplorerQuery) -> ExplorerView {
        analytics::explore(
            &self.ledger().events(),
            &crate::directory::load_users(&*self.storage),
            query,
        )
    }

    /// The raw ledger, oldest first.
    pub fn events(&self) -> Vec<EventRecord> {
        self.ledger().events()
    }

    /// Grouped directory view for the given filter.
    pub fn grouped_users(&self, filter: &GroupFilter) -> Vec<(String, Vec<crate::directory::DirectoryEntry>)> {
        self.directory().grouped(filter)
    }
}
