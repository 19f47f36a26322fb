//! Constants used throughout the Teamdesk library.
//!
//! This module provides central definitions for the persisted collection keys
//! and the fixed limits of the event ledger and analytics views.

use std::time::Duration;

/// Storage key for the user collection.
pub const USERS_KEY: &str = "users";

/// Storage key for the logged-in user record.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Storage key for the active session record.
pub const SESSION_KEY: &str = "currentSessionId";

/// Storage key for the tracked-event ledger.
pub const EVENT_LEDGER_KEY: &str = "localAmplitudeEvents";

/// Storage key for the pending forced-password-reset marker.
///
/// Stored as a bare email string, not JSON, for wire compatibility.
pub const PENDING_RESET_KEY: &str = "pendingPasswordResetEmail";

/// Maximum number of records kept in the event ledger. Oldest entries are
/// evicted first once the cap is exceeded.
pub const LEDGER_CAP: usize = 1000;

/// Maximum number of rows returned by the event explorer.
pub const EXPLORER_ROW_CAP: usize = 300;

/// Sentinel password assigned to directory-created users. Logging in with it
/// triggers the forced-password-reset flow.
pub const DEFAULT_PASSWORD: &str = "changeme";

/// Bucket label for users without a group.
pub const UNASSIGNED_GROUP: &str = "Unassigned";

/// Interval at which consuming views re-read the store to pick up
/// out-of-band changes.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
