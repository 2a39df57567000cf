//! Image orchestration error types.

use petfile_shared::{ImageId, PetId};
use thiserror::Error;

use super::key::KeyError;
use super::repository::RepositoryError;
use crate::storage::StorageError;

/// Which collaborator, if any, an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePhase {
    /// Rejected before any backend call.
    Validation,
    /// The key suffix could not be generated.
    KeyGeneration,
    /// The object store failed or reported the failure.
    ObjectStore,
    /// The metadata store failed or reported the failure.
    MetadataStore,
}

/// Image operation errors.
#[derive(Debug, Error)]
pub enum ImageError {
    // ========== Validation Errors ==========
    /// Pet id is not a well-formed identifier.
    #[error("pet id is not a valid UUID: {0:?}")]
    InvalidPetId(String),

    /// Image id is not a well-formed identifier.
    #[error("image id is not a valid UUID: {0:?}")]
    InvalidImageId(String),

    /// Upload without a filename.
    #[error("filename must not be empty")]
    EmptyFilename,

    /// Filename that would place the object outside the store root.
    #[error("filename must be relative and free of '..' segments: {0:?}")]
    InvalidFilename(String),

    /// Owner assignment without any image ids.
    #[error("at least one image id is required")]
    EmptyBatch,

    /// Upload larger than the configured limit.
    #[error("file size {size} bytes exceeds maximum allowed {max} bytes")]
    FileTooLarge {
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    // ========== Not Found Errors ==========
    /// Image record does not exist.
    #[error("image not found: {0}")]
    ImageNotFound(ImageId),

    /// The metadata store reported no rows for the pet.
    #[error("no images found for pet {0}")]
    NoImagesForPet(PetId),

    /// Referenced pet does not exist.
    #[error("pet not found: {0}")]
    PetNotFound(PetId),

    // ========== Backend Errors ==========
    /// Entropy for the key suffix was unavailable.
    #[error("key generation failed: {0}")]
    KeyGeneration(#[from] KeyError),

    /// Object store rejected the write.
    #[error("upload to object storage failed: {0}")]
    Upload(#[source] StorageError),

    /// Metadata record could not be created after the object was written.
    #[error("image record creation failed: {0}")]
    Create(#[source] RepositoryError),

    /// Object store rejected the delete.
    #[error("deletion from object storage failed: {0}")]
    Deletion(#[source] StorageError),

    /// Metadata record could not be removed after the object was deleted.
    #[error("image record deletion failed: {0}")]
    RecordDeletion(#[source] RepositoryError),

    /// Any other metadata store failure.
    #[error("metadata store error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ImageError {
    /// Where the error originated.
    #[must_use]
    pub const fn phase(&self) -> FailurePhase {
        match self {
            Self::InvalidPetId(_)
            | Self::InvalidImageId(_)
            | Self::EmptyFilename
            | Self::InvalidFilename(_)
            | Self::EmptyBatch
            | Self::FileTooLarge { .. } => FailurePhase::Validation,
            Self::KeyGeneration(_) => FailurePhase::KeyGeneration,
            Self::Upload(_) | Self::Deletion(_) => FailurePhase::ObjectStore,
            Self::ImageNotFound(_)
            | Self::NoImagesForPet(_)
            | Self::PetNotFound(_)
            | Self::Create(_)
            | Self::RecordDeletion(_)
            | Self::Repository(_) => FailurePhase::MetadataStore,
        }
    }

    /// Create a file too large error.
    #[must_use]
    pub fn file_too_large(size: u64, max: u64) -> Self {
        Self::FileTooLarge { size, max }
    }
}

/// Parse a required pet id.
pub fn parse_pet_id(raw: &str) -> Result<PetId, ImageError> {
    raw.parse()
        .map_err(|_| ImageError::InvalidPetId(raw.to_string()))
}

/// Parse an optional pet id where the empty string means unassigned.
pub fn parse_optional_pet_id(raw: &str) -> Result<Option<PetId>, ImageError> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse_pet_id(raw).map(Some)
}

/// Parse an image id.
pub fn parse_image_id(raw: &str) -> Result<ImageId, ImageError> {
    raw.parse()
        .map_err(|_| ImageError::InvalidImageId(raw.to_string()))
}
