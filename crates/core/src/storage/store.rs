//! Object store contract.

use std::future::Future;

use bytes::Bytes;

use super::error::StorageError;

/// Result of a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Publicly resolvable URL of the object.
    pub url: String,
    /// Key the object was stored under.
    pub key: String,
}

/// Durable blob storage keyed by string.
///
/// Implementations carry their own endpoint, credentials and timeouts.
pub trait ObjectStore: Send + Sync {
    /// Write `data` under `key`, replacing any existing object.
    fn put(
        &self,
        data: Bytes,
        key: &str,
    ) -> impl Future<Output = Result<StoredObject, StorageError>> + Send;

    /// Remove the object stored under `key`.
    ///
    /// Removing a key that does not exist succeeds.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}
