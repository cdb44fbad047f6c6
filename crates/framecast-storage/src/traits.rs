//! Storage abstraction trait
//!
//! The sender only needs one operation: push a local file to the store and
//! get back a publicly fetchable URL. Keeping it behind a trait lets tests
//! and alternative backends stand in for the WebDAV implementation.

use std::path::Path;

use async_trait::async_trait;

use crate::error::StorageResult;

/// A successfully stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Destination name on the store.
    pub name: String,
    /// Publicly reachable URL, built from the configured public host rather
    /// than the store host, which may not be internet-facing.
    pub url: String,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a local file under `destination_name`.
    ///
    /// Implementations verify the local file exists before any network call
    /// and surface a typed [`crate::StorageError`] on failure. No retries.
    async fn upload(&self, local_path: &Path, destination_name: &str)
        -> StorageResult<StoredObject>;
}
