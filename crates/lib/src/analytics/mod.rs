//! Read-only analytics over the event ledger and user directory.
//!
//! Both aggregations are pure functions of a point-in-time read; they hold
//! no state and never write back to the store. [`watch`] provides the
//! polling refresh the live views sit on.

pub mod dashboard;
pub mod explorer;
pub mod watch;

pub use dashboard::{CountedStep, Dashboard, dashboard};
pub use explorer::{ExplorerQuery, ExplorerRow, ExplorerView, explore};
pub use watch::{Snapshot, Watcher};
