//! Pet image orchestration.
//!
//! This module coordinates the two stores behind every image:
//! - Upload: write the object, then create the record
//! - Assign: point existing records at a pet, one at a time
//! - Delete: remove the object, then the record
//! - Queries by id and by pet
//!
//! Neither store is rolled back when the other fails. The surviving half
//! (orphaned object or dangling record) is logged at error level.

mod error;
mod key;
mod repository;
mod service;
mod status;
mod types;

#[cfg(test)]
mod service_props;

pub use error::{FailurePhase, ImageError};
pub use key::{
    KeyError, OBJECT_KEY_SUFFIX_LEN, RandomSuffixGenerator, SuffixGenerator, compose_object_key,
    generate_suffix, is_confined_filename,
};
pub use repository::{ImageRepository, RepositoryError};
pub use service::{DEFAULT_MAX_FILE_SIZE, ImageService};
pub use status::{
    MSG_CREATE_FAILED, MSG_DELETION_FAILED, MSG_IMAGE_NOT_FOUND, MSG_INTERNAL,
    MSG_KEY_GENERATION_FAILED, MSG_PET_NOT_FOUND, MSG_RECORD_DELETION_FAILED, MSG_UPLOAD_FAILED,
};
pub use types::{AssignPetInput, Image, ImagePatch, NewImage, UploadInput};
