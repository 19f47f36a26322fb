//! Teamdesk: a local-first user directory with a built-in analytics ledger.
//!
//! Teamdesk keeps a small user collection, the signed-in user, and the active
//! session in a string-keyed JSON record store, and appends an analytics event
//! to a capped local ledger for every meaningful action. Aggregations over
//! that ledger power an event dashboard and an event explorer without any
//! network dependency.
//!
//! # Architecture
//!
//! - [`storage`] — the [`Storage`](storage::Storage) port and the tolerant
//!   JSON codec that heals corrupt reads to empty collections.
//! - [`events`] — the fixed event vocabulary and the persisted record shape.
//! - [`ledger`] — the append path: local ledger write plus sink forwarding.
//! - [`session`] / [`auth`] — session lifecycle and the login, logout,
//!   registration, and password-reset flows.
//! - [`directory`] — user CRUD, grouping, and the group filter.
//! - [`analytics`] — pure dashboard/explorer aggregations and the polling
//!   watcher.
//! - [`app`] — the facade wiring one store into all of the above.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use teamdesk::{App, storage::InMemory};
//!
//! let app = App::new(Arc::new(InMemory::new()));
//! app.auth()
//!     .register("Ada Lovelace", "ada@example.com", "Engineering", "s3cret")?;
//! let dashboard = app.dashboard();
//! assert_eq!(dashboard.registration_funnel[1].value, 1);
//! # Ok::<(), teamdesk::Error>(())
//! ```

pub mod analytics;
pub mod app;
pub mod auth;
pub mod clock;
pub mod constants;
pub mod directory;
pub mod events;
pub mod ledger;
pub mod session;
pub mod sink;
pub mod storage;

pub use app::App;
pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;
pub use events::{EventName, EventRecord, Properties};
pub use sink::{AnalyticsSink, Identity, NoopSink, TracingSink};
#[cfg(any(test, feature = "testing"))]
pub use sink::{RecordingSink, SinkCall};
pub use storage::{Decoded, InMemory, Storage};

use thiserror::Error;

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The unified error type for all Teamdesk operations.
///
/// Write and persistence failures from the subsystems are aggregated here;
/// read-side corruption never surfaces as an error (see [`storage`]).
/// Subsystem errors stay inspectable through the transparent variants and
/// the `is_*()` helpers.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    /// Errors from record-store operations.
    #[error(transparent)]
    Storage(#[from] storage::StorageError),
}

impl Error {
    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Storage(e) => e.is_io_error(),
        }
    }

    /// Check if this error is a serialization failure.
    pub fn is_serialization_error(&self) -> bool {
        match self {
            Error::Storage(e) => e.is_serialization_error(),
        }
    }
}
