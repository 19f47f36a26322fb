//! In-memory record store with optional JSON file persistence.
//!
//! This is the default [`Storage`] implementation: a `HashMap` behind an
//! `RwLock`, playing the role the browser profile's local storage plays in
//! the original deployment. The snapshot save/load functions let the CLI
//! carry state across invocations.

use std::{
    collections::HashMap,
    path::Path,
    sync::RwLock,
};

use serde::{Deserialize, Deserializer, Serialize};

use super::errors::StorageError;
use crate::{Result, storage::Storage};

/// The current snapshot file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const SNAPSHOT_VERSION: u8 = 0;

fn is_v0(v: &u8) -> bool {
    *v == 0
}

/// Validates the snapshot version during deserialization.
fn validate_snapshot_version<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let version = u8::deserialize(deserializer)?;
    if version != SNAPSHOT_VERSION {
        return Err(serde::de::Error::custom(format!(
            "unsupported snapshot version {version}; only version {SNAPSHOT_VERSION} is supported"
        )));
    }
    Ok(version)
}

/// Serializable snapshot of the store for file persistence.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    /// File format version for compatibility checking
    #[serde(
        rename = "_v",
        default,
        skip_serializing_if = "is_v0",
        deserialize_with = "validate_snapshot_version"
    )]
    version: u8,
    records: HashMap<String, String>,
}

/// In-memory string-keyed record store.
#[derive(Debug, Default)]
pub struct InMemory {
    records: RwLock<HashMap<String, String>>,
}

impl InMemory {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves the full store state to a JSON snapshot file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let records = self
            .records
            .read()
            .map_err(|_| StorageError::LockPoisoned)?
            .clone();
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            records,
        };
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| StorageError::SnapshotSerializationFailed { source: e })?;
        std::fs::write(path, json).map_err(|e| StorageError::FileIo { source: e })?;
        Ok(())
    }

    /// Loads a store from a JSON snapshot file.
    ///
    /// A missing file yields a new, empty store.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let snapshot: Snapshot = serde_json::from_str(&json)
                    .map_err(|e| StorageError::SnapshotDeserializationFailed { source: e })?;
                Ok(Self {
                    records: RwLock::new(snapshot.records),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(StorageError::FileIo { source: e }.into()),
        }
    }

    /// Replaces the store contents with a fresh read of the snapshot file.
    ///
    /// Lets a long-lived store pick up writes made by another process. A
    /// missing file clears the store.
    pub fn reload_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let fresh = Self::load_from_file(path)?;
        let records = fresh
            .records
            .into_inner()
            .map_err(|_| StorageError::LockPoisoned)?;
        *self.records.write().map_err(|_| StorageError::LockPoisoned)? = records;
        Ok(())
    }
}

impl Storage for InMemory {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let records = self.records.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(records.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        records.remove(key);
        Ok(())
    }
}
