//! Storage error types for the Teamdesk record store.
//!
//! This module defines structured error types for record-store operations,
//! providing better error context and type safety compared to string-based
//! errors. Note that *read-side* corruption (unparsable JSON, wrong shape) is
//! deliberately not an error: decode helpers heal it to an empty collection.

use thiserror::Error;

/// Errors that can occur during record-store operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StorageError {
    /// Serializing a collection for persistence failed.
    #[error("Failed to serialize collection '{collection}'")]
    SerializationFailed {
        /// The storage key of the collection being written
        collection: String,
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserializing a store snapshot file failed.
    #[error("Failed to deserialize store snapshot")]
    SnapshotDeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// Serializing a store snapshot file failed.
    #[error("Failed to serialize store snapshot")]
    SnapshotSerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error while loading or saving a store snapshot.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A store lock was poisoned by a panicking writer.
    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, StorageError::FileIo { .. })
    }

    /// Check if this error is a serialization failure.
    pub fn is_serialization_error(&self) -> bool {
        matches!(
            self,
            StorageError::SerializationFailed { .. }
                | StorageError::SnapshotSerializationFailed { .. }
                | StorageError::SnapshotDeserializationFailed { .. }
        )
    }
}
