//! Metadata repository contract.

use std::future::Future;

use petfile_shared::{ImageId, PetId};
use thiserror::Error;

use super::types::{Image, ImagePatch, NewImage};

/// Metadata store failures, as classified by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No row matched.
    #[error("record not found")]
    NotFound,

    /// A referenced pet does not exist.
    #[error("referenced pet does not exist")]
    OwnerNotFound,

    /// Any other driver error.
    #[error("database error: {0}")]
    Database(String),
}

impl RepositoryError {
    /// Create a database error.
    #[must_use]
    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
}

/// Repository trait for image record persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
pub trait ImageRepository: Send + Sync {
    /// Insert a record; the store assigns the id and timestamps.
    fn create(
        &self,
        input: NewImage,
    ) -> impl Future<Output = Result<Image, RepositoryError>> + Send;

    /// All records owned by `pet_id`, in store order.
    fn find_by_owner(
        &self,
        pet_id: PetId,
    ) -> impl Future<Output = Result<Vec<Image>, RepositoryError>> + Send;

    /// Find a record by id.
    fn find_by_id(
        &self,
        id: ImageId,
    ) -> impl Future<Output = Result<Option<Image>, RepositoryError>> + Send;

    /// Apply a partial update; [`RepositoryError::NotFound`] when no row matched.
    fn update(
        &self,
        id: ImageId,
        patch: ImagePatch,
    ) -> impl Future<Output = Result<Image, RepositoryError>> + Send;

    /// Delete a record; `false` when no row matched.
    fn delete(&self, id: ImageId) -> impl Future<Output = Result<bool, RepositoryError>> + Send;
}
