//! The local record store and its tolerant JSON codec.
//!
//! This module provides the [`Storage`] trait — a string-keyed key/value port
//! over which every collection (users, current user, session, event ledger)
//! is persisted as a JSON blob — together with the [`Decoded`] read step that
//! treats absent or corrupt data as an empty collection instead of an error.
//!
//! The trait boundary is what makes the authentication, directory, and
//! aggregator components testable against an in-memory fake.

use serde::{Serialize, de::DeserializeOwned};

pub mod errors;
mod memory;

pub use errors::StorageError;
pub use memory::InMemory;

use crate::Result;

/// String-keyed persistent key/value store.
///
/// Values are JSON-serialized strings; the store itself knows nothing about
/// their shape. Implementations must be `Send + Sync` so component handles
/// can share one store.
pub trait Storage: Send + Sync {
    /// Retrieves the raw value for a key, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores a raw value under a key, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes a key. Succeeds even if the key does not exist.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Outcome of tolerantly decoding a persisted collection.
///
/// Reads never fail past this boundary: a missing key, unparsable JSON, or a
/// value of the wrong shape all decode to [`Decoded::Empty`]. The collection
/// self-heals on the next successful write.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    /// The collection was present and well-formed.
    Present(T),
    /// The collection was absent or corrupt; treat as empty/default.
    Empty,
}

impl<T> Decoded<T> {
    /// Returns the decoded value, or the type's default for `Empty`.
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        match self {
            Decoded::Present(value) => value,
            Decoded::Empty => T::default(),
        }
    }

    /// Converts into an `Option`, discarding the empty marker.
    pub fn into_option(self) -> Option<T> {
        match self {
            Decoded::Present(value) => Some(value),
            Decoded::Empty => None,
        }
    }
}

/// Reads and decodes a JSON collection from the store.
///
/// Malformed data is healed to [`Decoded::Empty`] and logged at warn level,
/// never surfaced to the caller.
pub fn read_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Decoded<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Decoded::Empty,
        Err(e) => {
            tracing::warn!(key, "store read failed, treating as empty: {e}");
            return Decoded::Empty;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Decoded::Present(value),
        Err(e) => {
            tracing::warn!(key, "malformed collection, treating as empty: {e}");
            Decoded::Empty
        }
    }
}

/// Serializes a value and stores it under the given key.
pub fn write_json<T: Serialize>(storage: &dyn Storage, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::SerializationFailed {
        collection: key.to_string(),
        source: e,
    })?;
    storage.set(key, &raw)
}
