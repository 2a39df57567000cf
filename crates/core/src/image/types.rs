//! Image types and data structures.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use petfile_shared::{ImageId, PetId};

/// Image domain model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Unique identifier, assigned by the metadata store.
    pub id: ImageId,
    /// Owning pet, if assigned.
    pub pet_id: Option<PetId>,
    /// Public URL returned by the object store.
    pub image_url: String,
    /// Key of the binary in the object store.
    pub object_key: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an image record.
///
/// `image_url` and `object_key` always come from the same successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    /// Owning pet, if known at upload time.
    pub pet_id: Option<PetId>,
    /// Public URL.
    pub image_url: String,
    /// Object store key.
    pub object_key: String,
}

/// Partial update of an image record. `None` fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImagePatch {
    /// New owner.
    pub pet_id: Option<PetId>,
}

impl ImagePatch {
    /// Patch that sets the owner.
    #[must_use]
    pub const fn assign(pet_id: PetId) -> Self {
        Self {
            pet_id: Some(pet_id),
        }
    }
}

/// Input for uploading an image.
#[derive(Debug, Clone)]
pub struct UploadInput {
    /// Raw image bytes.
    pub data: Bytes,
    /// Caller-supplied filename; the object key starts with it.
    pub filename: String,
    /// Owning pet id; empty means unassigned.
    pub pet_id: String,
}

/// Input for assigning images to a pet.
#[derive(Debug, Clone)]
pub struct AssignPetInput {
    /// Pet to assign to.
    pub pet_id: String,
    /// Images to update, in order.
    pub ids: Vec<String>,
}
