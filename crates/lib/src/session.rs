//! Session lifecycle management.
//!
//! At most one session record exists per store. A session is created at
//! login, destroyed at logout, and always ended before a replacement starts.
//! Every ledger record written while a session is active carries its id.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Result,
    clock::Clock,
    constants::SESSION_KEY,
    storage::{Storage, read_json, write_json},
};

/// The persisted session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: String,
    #[serde(rename = "startedAt")]
    pub started_at: u64,
}

/// Creates and ends session records in the store.
#[derive(Clone)]
pub struct SessionManager {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Generates a fresh session id and persists `{id, startedAt}`.
    ///
    /// Returns the new id; a persistence failure propagates so the caller can
    /// treat it as the null-session sentinel.
    pub fn start_session(&self) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let record = SessionRecord {
            id: id.clone(),
            started_at: self.clock.now_millis(),
        };
        write_json(&*self.storage, SESSION_KEY, &record)?;
        Ok(id)
    }

    /// The active session id, or `None` when absent or unparsable.
    pub fn current_session_id(&self) -> Option<String> {
        read_json::<SessionRecord>(&*self.storage, SESSION_KEY)
            .into_option()
            .map(|record| record.id)
    }

    /// Removes the session record. Ending an absent session is not an error.
    pub fn end_session(&self) -> Result<()> {
        self.storage.remove(SESSION_KEY)
    }
}

/// Composite session id: `sess_<millis base36>_<8 random base36 chars>`,
/// lower-cased.
///
/// The fallback id scheme for environments without a UUID source; also used
/// to fabricate plausible historical session ids when seeding demo data.
pub fn composite_session_id(clock: &dyn Clock) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..8)
        .map(|_| {
            let digit = rng.gen_range(0..36u32);
            char::from_digit(digit, 36).unwrap_or('0')
        })
        .collect();
    format!("sess_{}_{}", to_base36(clock.now_millis()), suffix)
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        let digit = (n % 36) as u32;
        digits.push(char::from_digit(digit, 36).unwrap_or('0'));
        n /= 36;
    }
    digits.iter().rev().collect()
}
