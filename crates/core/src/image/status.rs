//! Translation of image errors into caller-facing categories.
//!
//! Backend detail stays in the logs. Callers only see the category and one of
//! the fixed messages below.

use petfile_shared::AppError;

use super::error::ImageError;

/// Shown when an image or a pet's image set cannot be found.
pub const MSG_IMAGE_NOT_FOUND: &str = "Image not found";
/// Shown when the referenced pet does not exist.
pub const MSG_PET_NOT_FOUND: &str = "Pet not found";
/// Shown when the object store rejected an upload.
pub const MSG_UPLOAD_FAILED: &str = "Error uploading image to object storage";
/// Shown when the metadata record could not be created.
pub const MSG_CREATE_FAILED: &str = "Error creating image record";
/// Shown when the object store rejected a delete.
pub const MSG_DELETION_FAILED: &str = "Error deleting image from object storage";
/// Shown when the metadata record could not be removed.
pub const MSG_RECORD_DELETION_FAILED: &str = "Error deleting image record";
/// Shown when no object key could be generated.
pub const MSG_KEY_GENERATION_FAILED: &str = "Error generating object key";
/// Shown for any other metadata store failure.
pub const MSG_INTERNAL: &str = "Internal error";

impl From<ImageError> for AppError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::InvalidPetId(_)
            | ImageError::InvalidImageId(_)
            | ImageError::EmptyFilename
            | ImageError::InvalidFilename(_)
            | ImageError::EmptyBatch
            | ImageError::FileTooLarge { .. } => Self::InvalidArgument(err.to_string()),
            ImageError::ImageNotFound(_) | ImageError::NoImagesForPet(_) => {
                Self::NotFound(MSG_IMAGE_NOT_FOUND.into())
            }
            ImageError::PetNotFound(_) => Self::NotFound(MSG_PET_NOT_FOUND.into()),
            ImageError::KeyGeneration(_) => Self::Internal(MSG_KEY_GENERATION_FAILED.into()),
            ImageError::Upload(_) => Self::Internal(MSG_UPLOAD_FAILED.into()),
            ImageError::Create(_) => Self::Internal(MSG_CREATE_FAILED.into()),
            ImageError::Deletion(_) => Self::Internal(MSG_DELETION_FAILED.into()),
            ImageError::RecordDeletion(_) => Self::Internal(MSG_RECORD_DELETION_FAILED.into()),
            ImageError::Repository(_) => Self::Internal(MSG_INTERNAL.into()),
        }
    }
}
