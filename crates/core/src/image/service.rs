//! Image service implementation.

use std::sync::Arc;

use petfile_shared::{ImageId, PetId};
use tracing::{debug, error, info, warn};

use super::error::{ImageError, parse_image_id, parse_optional_pet_id, parse_pet_id};
use super::key::{
    OBJECT_KEY_SUFFIX_LEN, RandomSuffixGenerator, SuffixGenerator, compose_object_key,
    is_confined_filename,
};
use super::repository::{ImageRepository, RepositoryError};
use super::types::{AssignPetInput, Image, ImagePatch, NewImage, UploadInput};
use crate::storage::ObjectStore;

pub use petfile_shared::config::DEFAULT_MAX_FILE_SIZE;

/// Image service coordinating the object store and the metadata store.
///
/// Every operation runs to completion without retries. Partial failures are
/// reported and logged, never compensated.
pub struct ImageService<S, R, G = RandomSuffixGenerator> {
    store: Arc<S>,
    repo: Arc<R>,
    keys: G,
    max_file_size: u64,
}

impl<S, R> ImageService<S, R>
where
    S: ObjectStore,
    R: ImageRepository,
{
    /// Create a new image service with OS-backed key suffixes.
    #[must_use]
    pub fn new(store: Arc<S>, repo: Arc<R>) -> Self {
        Self {
            store,
            repo,
            keys: RandomSuffixGenerator,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl<S, R, G> ImageService<S, R, G>
where
    S: ObjectStore,
    R: ImageRepository,
    G: SuffixGenerator,
{
    /// Set the upload size limit in bytes.
    #[must_use]
    pub fn with_max_file_size(mut self, max: u64) -> Self {
        self.max_file_size = max;
        self
    }

    /// Replace the key suffix source.
    #[must_use]
    pub fn with_suffix_generator<G2: SuffixGenerator>(self, keys: G2) -> ImageService<S, R, G2> {
        ImageService {
            store: self.store,
            repo: self.repo,
            keys,
            max_file_size: self.max_file_size,
        }
    }

    /// Upload limit in bytes.
    #[must_use]
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Store the bytes, then record them.
    ///
    /// The object is written before the record exists. If the record cannot be
    /// created the object stays in the store and its key is logged.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The filename is empty or escapes the store root
    /// - The file is too large or the pet id is malformed
    /// - No key suffix can be generated
    /// - The object store rejects the write
    /// - The record cannot be created
    pub async fn upload(&self, input: UploadInput) -> Result<Image, ImageError> {
        if input.filename.is_empty() {
            return Err(ImageError::EmptyFilename);
        }
        if !is_confined_filename(&input.filename) {
            return Err(ImageError::InvalidFilename(input.filename));
        }
        let size = u64::try_from(input.data.len()).unwrap_or(u64::MAX);
        if size > self.max_file_size {
            return Err(ImageError::file_too_large(size, self.max_file_size));
        }
        let pet_id = parse_optional_pet_id(&input.pet_id)?;

        let suffix = self.keys.generate(OBJECT_KEY_SUFFIX_LEN).map_err(|e| {
            error!(error = %e, filename = %input.filename, "Couldn't generate object key");
            ImageError::KeyGeneration(e)
        })?;
        let key = compose_object_key(&input.filename, &suffix);

        let stored = self.store.put(input.data, &key).await.map_err(|e| {
            error!(error = %e, object_key = %key, "Couldn't upload image");
            ImageError::Upload(e)
        })?;

        let record = NewImage {
            pet_id,
            image_url: stored.url,
            object_key: stored.key,
        };

        match self.repo.create(record).await {
            Ok(image) => {
                info!(
                    image_id = %image.id,
                    object_key = %image.object_key,
                    size,
                    "Image uploaded"
                );
                Ok(image)
            }
            Err(e) => {
                error!(
                    error = %e,
                    object_key = %key,
                    pet_id = ?pet_id,
                    "Couldn't create image record; object is orphaned in storage"
                );
                Err(match (e, pet_id) {
                    (RepositoryError::OwnerNotFound, Some(pet)) => ImageError::PetNotFound(pet),
                    (e, _) => ImageError::Create(e),
                })
            }
        }
    }

    /// Assign every listed image to the pet, in order.
    ///
    /// Stops at the first failing id. Updates already applied stay applied.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The pet id or any image id is malformed, or the list is empty
    /// - An image does not exist or the pet does not exist
    /// - The metadata store fails
    pub async fn assign_pet(&self, input: AssignPetInput) -> Result<(), ImageError> {
        let pet_id = parse_pet_id(&input.pet_id)?;
        if input.ids.is_empty() {
            return Err(ImageError::EmptyBatch);
        }
        let ids = input
            .ids
            .iter()
            .map(|raw| parse_image_id(raw))
            .collect::<Result<Vec<_>, _>>()?;

        for id in ids {
            self.repo
                .update(id, ImagePatch::assign(pet_id))
                .await
                .map_err(|e| {
                    error!(error = %e, image_id = %id, pet_id = %pet_id, "Couldn't assign image");
                    match e {
                        RepositoryError::NotFound => ImageError::ImageNotFound(id),
                        RepositoryError::OwnerNotFound => ImageError::PetNotFound(pet_id),
                        e @ RepositoryError::Database(_) => ImageError::Repository(e),
                    }
                })?;
        }

        debug!(pet_id = %pet_id, count = input.ids.len(), "Images assigned");
        Ok(())
    }

    /// Delete the object, then its record.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The id is malformed or no record matches
    /// - The object store rejects the delete (the record is kept)
    /// - The record cannot be removed (the object is already gone)
    pub async fn delete(&self, id: &str) -> Result<(), ImageError> {
        let id = parse_image_id(id)?;
        let image = self.find_existing(id).await?;
        self.remove(&image).await
    }

    /// All images owned by the pet. No images is an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the pet id is malformed or the metadata store fails.
    pub async fn find_by_pet(&self, pet_id: &str) -> Result<Vec<Image>, ImageError> {
        let pet_id = parse_pet_id(pet_id)?;
        self.images_of(pet_id).await
    }

    /// A single image by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is malformed, no record matches or the
    /// metadata store fails.
    pub async fn find_by_id(&self, id: &str) -> Result<Image, ImageError> {
        let id = parse_image_id(id)?;
        self.find_existing(id).await
    }

    /// Delete every image owned by the pet, one at a time.
    ///
    /// Each image goes through the same object-then-record sequence as
    /// [`Self::delete`]. Stops at the first failure. Returns how many were
    /// deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the pet id is malformed, listing fails, or any
    /// single deletion fails.
    pub async fn delete_by_pet(&self, pet_id: &str) -> Result<usize, ImageError> {
        let pet_id = parse_pet_id(pet_id)?;
        let images = match self.images_of(pet_id).await {
            Ok(images) => images,
            Err(ImageError::NoImagesForPet(_)) => return Ok(0),
            Err(e) => return Err(e),
        };

        for image in &images {
            self.remove(image).await?;
        }

        info!(pet_id = %pet_id, count = images.len(), "Deleted images of pet");
        Ok(images.len())
    }

    async fn images_of(&self, pet_id: PetId) -> Result<Vec<Image>, ImageError> {
        self.repo.find_by_owner(pet_id).await.map_err(|e| {
            error!(error = %e, pet_id = %pet_id, "Couldn't list images");
            match e {
                RepositoryError::NotFound => ImageError::NoImagesForPet(pet_id),
                e => ImageError::Repository(e),
            }
        })
    }

    async fn find_existing(&self, id: ImageId) -> Result<Image, ImageError> {
        match self.repo.find_by_id(id).await {
            Ok(Some(image)) => Ok(image),
            Ok(None) | Err(RepositoryError::NotFound) => {
                debug!(image_id = %id, "Image not found");
                Err(ImageError::ImageNotFound(id))
            }
            Err(e) => {
                error!(error = %e, image_id = %id, "Couldn't find image");
                Err(ImageError::Repository(e))
            }
        }
    }

    async fn remove(&self, image: &Image) -> Result<(), ImageError> {
        self.store.delete(&image.object_key).await.map_err(|e| {
            error!(
                error = %e,
                image_id = %image.id,
                object_key = %image.object_key,
                "Couldn't delete object; record kept"
            );
            ImageError::Deletion(e)
        })?;

        match self.repo.delete(image.id).await {
            Ok(true) => {
                info!(image_id = %image.id, object_key = %image.object_key, "Image deleted");
                Ok(())
            }
            Ok(false) => {
                warn!(image_id = %image.id, "Image record already removed");
                Ok(())
            }
            Err(e) => {
                error!(
                    error = %e,
                    image_id = %image.id,
                    object_key = %image.object_key,
                    "Couldn't delete image record; record is dangling"
                );
                Err(ImageError::RecordDeletion(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::image::FailurePhase;
    use crate::testing::{
        FailingSuffixGenerator, FixedSuffixGenerator, InMemoryImageRepository,
        InMemoryObjectStore, MEMORY_BASE_URL,
    };

    type TestService = ImageService<InMemoryObjectStore, InMemoryImageRepository, FixedSuffixGenerator>;

    struct Harness {
        store: Arc<InMemoryObjectStore>,
        repo: Arc<InMemoryImageRepository>,
        service: TestService,
    }

    fn harness_with(repo: InMemoryImageRepository) -> Harness {
        let store = Arc::new(InMemoryObjectStore::new());
        let repo = Arc::new(repo);
        let service = ImageService::new(Arc::clone(&store), Arc::clone(&repo))
            .with_suffix_generator(FixedSuffixGenerator("AbCdEfGh12".into()));
        Harness {
            store,
            repo,
            service,
        }
    }

    fn harness() -> Harness {
        harness_with(InMemoryImageRepository::new())
    }

    fn upload_input(filename: &str, pet_id: &str) -> UploadInput {
        UploadInput {
            data: Bytes::from_static(b"\x89PNG\r\n"),
            filename: filename.into(),
            pet_id: pet_id.into(),
        }
    }

    // ========== Upload ==========

    #[tokio::test]
    async fn test_upload_persists_key_and_url_from_store() {
        let h = harness();
        let pet = PetId::new();

        let image = h
            .service
            .upload(upload_input("cat.png", &pet.to_string()))
            .await
            .expect("upload should succeed");

        assert_eq!(image.object_key, "cat.png_AbCdEfGh12");
        assert_eq!(image.image_url, format!("{MEMORY_BASE_URL}/cat.png_AbCdEfGh12"));
        assert_eq!(image.pet_id, Some(pet));
        assert_eq!(h.repo.get(image.id), Some(image.clone()));
        assert_eq!(
            h.store.get("cat.png_AbCdEfGh12"),
            Some(Bytes::from_static(b"\x89PNG\r\n"))
        );
    }

    #[tokio::test]
    async fn test_upload_unassigned() {
        let h = harness();

        let image = h
            .service
            .upload(upload_input("dog.jpg", ""))
            .await
            .expect("upload should succeed");

        assert_eq!(image.pet_id, None);
        assert_eq!(image.object_key, "dog.jpg_AbCdEfGh12");
    }

    #[tokio::test]
    async fn test_upload_key_uses_random_suffix_by_default() {
        let store = Arc::new(InMemoryObjectStore::new());
        let repo = Arc::new(InMemoryImageRepository::new());
        let service = ImageService::new(Arc::clone(&store), Arc::clone(&repo));

        let a = service.upload(upload_input("cat.png", "")).await.unwrap();
        let b = service.upload(upload_input("cat.png", "")).await.unwrap();

        assert_ne!(a.object_key, b.object_key);
        for image in [&a, &b] {
            let suffix = image.object_key.strip_prefix("cat.png_").unwrap();
            assert_eq!(suffix.len(), OBJECT_KEY_SUFFIX_LEN);
        }
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_upload_put_failure_never_creates_record() {
        let h = harness();
        h.store.fail_puts(true);

        let err = h.service.upload(upload_input("cat.png", "")).await.unwrap_err();

        assert!(matches!(err, ImageError::Upload(_)));
        assert_eq!(err.phase(), FailurePhase::ObjectStore);
        assert_eq!(h.store.put_calls(), 1);
        assert_eq!(h.repo.create_calls(), 0);
        assert!(h.repo.is_empty());
    }

    #[tokio::test]
    async fn test_upload_create_failure_leaves_object_in_store() {
        let h = harness();
        h.repo.fail_creates(true);

        let err = h.service.upload(upload_input("cat.png", "")).await.unwrap_err();

        assert!(matches!(err, ImageError::Create(_)));
        assert_eq!(err.phase(), FailurePhase::MetadataStore);
        assert!(h.store.contains("cat.png_AbCdEfGh12"));
        assert_eq!(h.store.delete_calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_unknown_pet_is_not_found_and_orphans_object() {
        let h = harness_with(InMemoryImageRepository::with_pets(Vec::new()));
        let pet = PetId::new();

        let err = h
            .service
            .upload(upload_input("cat.png", &pet.to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::PetNotFound(p) if p == pet));
        assert!(h.store.contains("cat.png_AbCdEfGh12"));
    }

    #[tokio::test]
    async fn test_upload_malformed_pet_id_rejected_before_store() {
        let h = harness();

        let err = h
            .service
            .upload(upload_input("cat.png", "not-a-uuid"))
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::InvalidPetId(_)));
        assert_eq!(h.store.put_calls(), 0);
        assert_eq!(h.repo.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_empty_filename_rejected() {
        let h = harness();

        let err = h.service.upload(upload_input("", "")).await.unwrap_err();

        assert!(matches!(err, ImageError::EmptyFilename));
        assert_eq!(h.store.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_parent_segments_in_filename_rejected() {
        let h = harness();

        for filename in ["../escape.png", "../../etc/x", "pets/../../x.png"] {
            let err = h.service.upload(upload_input(filename, "")).await.unwrap_err();
            assert!(matches!(err, ImageError::InvalidFilename(ref f) if f == filename));
            assert_eq!(err.phase(), FailurePhase::Validation);
        }
        assert_eq!(h.store.put_calls(), 0);
        assert_eq!(h.repo.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_absolute_filename_rejected() {
        let h = harness();

        let err = h
            .service
            .upload(upload_input("/etc/passwd", ""))
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::InvalidFilename(_)));
        assert_eq!(
            petfile_shared::AppError::from(err).code(),
            petfile_shared::StatusCode::InvalidArgument
        );
        assert_eq!(h.store.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_dots_inside_filename_allowed() {
        let h = harness();

        let image = h.service.upload(upload_input("cat..png", "")).await.unwrap();

        assert_eq!(image.object_key, "cat..png_AbCdEfGh12");
    }

    #[tokio::test]
    async fn test_upload_too_large_rejected() {
        let store = Arc::new(InMemoryObjectStore::new());
        let repo = Arc::new(InMemoryImageRepository::new());
        let service = ImageService::new(Arc::clone(&store), repo)
            .with_suffix_generator(FailingSuffixGenerator)
            .with_max_file_size(4);

        let err = service.upload(upload_input("cat.png", "")).await.unwrap_err();

        // Size is checked before key generation.
        assert!(matches!(err, ImageError::FileTooLarge { size: 6, max: 4 }));
        assert_eq!(store.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_key_generation_failure_is_internal() {
        let store = Arc::new(InMemoryObjectStore::new());
        let repo = Arc::new(InMemoryImageRepository::new());
        let service = ImageService::new(Arc::clone(&store), Arc::clone(&repo))
            .with_suffix_generator(FailingSuffixGenerator);

        let err = service.upload(upload_input("cat.png", "")).await.unwrap_err();

        assert!(matches!(err, ImageError::KeyGeneration(_)));
        assert_eq!(store.put_calls(), 0);
        assert_eq!(repo.create_calls(), 0);
    }

    // ========== AssignPet ==========

    #[tokio::test]
    async fn test_assign_pet_updates_all() {
        let h = harness();
        let a = h.repo.seed(None, "a.png_1");
        let b = h.repo.seed(None, "b.png_2");
        let pet = PetId::new();

        h.service
            .assign_pet(AssignPetInput {
                pet_id: pet.to_string(),
                ids: vec![a.id.to_string(), b.id.to_string()],
            })
            .await
            .expect("assign should succeed");

        assert_eq!(h.repo.get(a.id).unwrap().pet_id, Some(pet));
        assert_eq!(h.repo.get(b.id).unwrap().pet_id, Some(pet));
        assert_eq!(h.repo.updated_ids(), vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_assign_pet_short_circuits_on_not_found() {
        let h = harness();
        let missing = ImageId::new();
        let b = h.repo.seed(None, "b.png_2");

        let err = h
            .service
            .assign_pet(AssignPetInput {
                pet_id: PetId::new().to_string(),
                ids: vec![missing.to_string(), b.id.to_string()],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::ImageNotFound(id) if id == missing));
        assert_eq!(h.repo.updated_ids(), vec![missing]);
        assert_eq!(h.repo.get(b.id).unwrap().pet_id, None);
    }

    #[tokio::test]
    async fn test_assign_pet_keeps_earlier_updates() {
        let h = harness();
        let a = h.repo.seed(None, "a.png_1");
        let b = h.repo.seed(None, "b.png_2");
        let c = h.repo.seed(None, "c.png_3");
        h.repo
            .fail_update_for(b.id, RepositoryError::database("connection reset"));
        let pet = PetId::new();

        let err = h
            .service
            .assign_pet(AssignPetInput {
                pet_id: pet.to_string(),
                ids: vec![a.id.to_string(), b.id.to_string(), c.id.to_string()],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::Repository(_)));
        assert_eq!(h.repo.get(a.id).unwrap().pet_id, Some(pet));
        assert_eq!(h.repo.get(c.id).unwrap().pet_id, None);
        assert_eq!(h.repo.updated_ids(), vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_assign_pet_malformed_pet_id_touches_nothing() {
        let h = harness();
        let a = h.repo.seed(None, "a.png_1");

        let err = h
            .service
            .assign_pet(AssignPetInput {
                pet_id: "pet-42".into(),
                ids: vec![a.id.to_string()],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::InvalidPetId(_)));
        assert!(h.repo.updated_ids().is_empty());
        assert_eq!(h.repo.find_calls(), 0);
    }

    #[tokio::test]
    async fn test_assign_pet_malformed_image_id_touches_nothing() {
        let h = harness();
        let a = h.repo.seed(None, "a.png_1");

        let err = h
            .service
            .assign_pet(AssignPetInput {
                pet_id: PetId::new().to_string(),
                ids: vec![a.id.to_string(), "bogus".into()],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::InvalidImageId(ref s) if s == "bogus"));
        assert!(h.repo.updated_ids().is_empty());
    }

    #[tokio::test]
    async fn test_assign_pet_empty_batch_rejected() {
        let h = harness();

        let err = h
            .service
            .assign_pet(AssignPetInput {
                pet_id: PetId::new().to_string(),
                ids: vec![],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::EmptyBatch));
    }

    #[tokio::test]
    async fn test_assign_unknown_pet_is_not_found() {
        let h = harness_with(InMemoryImageRepository::with_pets(Vec::new()));
        let a = h.repo.seed(None, "a.png_1");
        let pet = PetId::new();

        let err = h
            .service
            .assign_pet(AssignPetInput {
                pet_id: pet.to_string(),
                ids: vec![a.id.to_string()],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::PetNotFound(p) if p == pet));
    }

    // ========== Delete ==========

    #[tokio::test]
    async fn test_delete_removes_object_then_record() {
        let h = harness();
        let image = h.service.upload(upload_input("cat.png", "")).await.unwrap();

        h.service
            .delete(&image.id.to_string())
            .await
            .expect("delete should succeed");

        assert!(!h.store.contains(&image.object_key));
        assert_eq!(h.repo.get(image.id), None);
    }

    #[tokio::test]
    async fn test_delete_missing_record_never_touches_store() {
        let h = harness();
        let id = ImageId::new();

        let err = h.service.delete(&id.to_string()).await.unwrap_err();

        assert!(matches!(err, ImageError::ImageNotFound(i) if i == id));
        assert_eq!(h.store.delete_calls(), 0);
        assert_eq!(h.repo.delete_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_store_failure_keeps_record() {
        let h = harness();
        let image = h.service.upload(upload_input("cat.png", "")).await.unwrap();
        h.store.fail_deletes(true);

        let err = h.service.delete(&image.id.to_string()).await.unwrap_err();

        assert!(matches!(err, ImageError::Deletion(_)));
        assert_eq!(h.repo.delete_calls(), 0);
        assert!(h.repo.get(image.id).is_some());
        assert!(h.store.contains(&image.object_key));
    }

    #[tokio::test]
    async fn test_delete_record_failure_leaves_dangling_record() {
        let h = harness();
        let image = h.service.upload(upload_input("cat.png", "")).await.unwrap();
        h.repo.fail_deletes(true);

        let err = h.service.delete(&image.id.to_string()).await.unwrap_err();

        assert!(matches!(err, ImageError::RecordDeletion(_)));
        assert_eq!(
            petfile_shared::AppError::from(err).code(),
            petfile_shared::StatusCode::Internal
        );
        assert!(!h.store.contains(&image.object_key));
        assert!(h.repo.get(image.id).is_some());
    }

    #[tokio::test]
    async fn test_delete_lookup_failure_is_internal() {
        let h = harness();
        h.repo.fail_finds(true);

        let err = h.service.delete(&ImageId::new().to_string()).await.unwrap_err();

        assert!(matches!(err, ImageError::Repository(_)));
        assert_eq!(h.store.delete_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_malformed_id() {
        let h = harness();

        let err = h.service.delete("12").await.unwrap_err();

        assert!(matches!(err, ImageError::InvalidImageId(_)));
        assert_eq!(h.repo.find_calls(), 0);
    }

    // ========== Queries ==========

    #[tokio::test]
    async fn test_find_by_pet_returns_owned_images_in_store_order() {
        let h = harness();
        let pet = PetId::new();
        let a = h.repo.seed(Some(pet), "a.png_1");
        h.repo.seed(Some(PetId::new()), "other.png_1");
        h.repo.seed(None, "loose.png_1");
        let b = h.repo.seed(Some(pet), "b.png_2");

        let images = h.service.find_by_pet(&pet.to_string()).await.unwrap();

        assert_eq!(images, vec![a, b]);
    }

    #[tokio::test]
    async fn test_find_by_pet_with_no_images_is_empty() {
        let h = harness();

        let images = h.service.find_by_pet(&PetId::new().to_string()).await.unwrap();

        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn test_find_by_pet_store_no_rows_is_not_found() {
        let h = harness();
        h.repo.report_no_rows(true);
        let pet = PetId::new();

        let err = h.service.find_by_pet(&pet.to_string()).await.unwrap_err();

        assert!(matches!(err, ImageError::NoImagesForPet(p) if p == pet));
    }

    #[tokio::test]
    async fn test_find_by_pet_store_failure_is_internal() {
        let h = harness();
        h.repo.fail_finds(true);

        let err = h
            .service
            .find_by_pet(&PetId::new().to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, ImageError::Repository(_)));
    }

    #[tokio::test]
    async fn test_find_by_pet_malformed() {
        let h = harness();

        let err = h.service.find_by_pet("").await.unwrap_err();

        assert!(matches!(err, ImageError::InvalidPetId(_)));
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let h = harness();
        let image = h.repo.seed(None, "a.png_1");

        assert_eq!(
            h.service.find_by_id(&image.id.to_string()).await.unwrap(),
            image
        );
        assert!(matches!(
            h.service.find_by_id(&ImageId::new().to_string()).await,
            Err(ImageError::ImageNotFound(_))
        ));
    }

    // ========== DeleteByPet ==========

    #[tokio::test]
    async fn test_delete_by_pet_removes_all_owned() {
        let h = harness();
        let pet = PetId::new();
        let a = h.repo.seed(Some(pet), "a.png_1");
        let b = h.repo.seed(Some(pet), "b.png_2");
        let other = h.repo.seed(None, "c.png_3");
        for image in [&a, &b, &other] {
            h.store.insert(&image.object_key, Bytes::from_static(b"x"));
        }

        let deleted = h.service.delete_by_pet(&pet.to_string()).await.unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(h.repo.len(), 1);
        assert!(h.store.contains(&other.object_key));
        assert!(!h.store.contains(&a.object_key));
        assert!(!h.store.contains(&b.object_key));
    }

    #[tokio::test]
    async fn test_delete_by_pet_without_images() {
        let h = harness();

        assert_eq!(
            h.service
                .delete_by_pet(&PetId::new().to_string())
                .await
                .unwrap(),
            0
        );

        h.repo.report_no_rows(true);
        assert_eq!(
            h.service
                .delete_by_pet(&PetId::new().to_string())
                .await
                .unwrap(),
            0
        );
        assert_eq!(h.store.delete_calls(), 0);
    }

    #[tokio::test]
    async fn test_delete_by_pet_stops_at_first_store_failure() {
        let h = harness();
        let pet = PetId::new();
        h.repo.seed(Some(pet), "a.png_1");
        h.repo.seed(Some(pet), "b.png_2");
        h.store.fail_deletes(true);

        let err = h.service.delete_by_pet(&pet.to_string()).await.unwrap_err();

        assert!(matches!(err, ImageError::Deletion(_)));
        assert_eq!(h.store.delete_calls(), 1);
        assert_eq!(h.repo.delete_calls(), 0);
        assert_eq!(h.repo.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_by_pet_stops_at_first_record_failure() {
        let h = harness();
        let pet = PetId::new();
        let first = h.repo.seed(Some(pet), "a.png_1");
        let second = h.repo.seed(Some(pet), "b.png_2");
        for image in [&first, &second] {
            h.store.insert(&image.object_key, Bytes::from_static(b"x"));
        }
        h.repo.fail_deletes(true);

        let err = h.service.delete_by_pet(&pet.to_string()).await.unwrap_err();

        assert!(matches!(err, ImageError::RecordDeletion(_)));
        assert_eq!(h.store.delete_calls(), 1);
        assert_eq!(h.repo.delete_calls(), 1);
        assert!(!h.store.contains(&first.object_key));
        assert!(h.repo.get(first.id).is_some());
        assert!(h.store.contains(&second.object_key));
        assert!(h.repo.get(second.id).is_some());
    }
}
