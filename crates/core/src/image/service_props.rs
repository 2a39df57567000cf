//! Property-based tests for ImageService.

use std::sync::Arc;

use bytes::Bytes;
use proptest::prelude::*;

use crate::image::key::OBJECT_KEY_SUFFIX_LEN;
use crate::image::service::ImageService;
use crate::image::types::{AssignPetInput, UploadInput};
use crate::image::{ImageError, RepositoryError};
use crate::testing::{InMemoryImageRepository, InMemoryObjectStore};
use petfile_shared::{ImageId, PetId};

fn block_on<F: std::future::Future>(fut: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime")
        .block_on(fut)
}

/// Filenames as callers send them, spaces and dots included.
fn arb_filename() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._-]{1,40}"
}

fn arb_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // =========================================================================
    // Upload key shape
    // =========================================================================

    /// The key is `filename_suffix` and the record holds exactly what the store returned.
    #[test]
    fn prop_upload_key_is_filename_and_suffix(filename in arb_filename(), data in arb_bytes()) {
        let store = Arc::new(InMemoryObjectStore::new());
        let repo = Arc::new(InMemoryImageRepository::new());
        let service = ImageService::new(Arc::clone(&store), Arc::clone(&repo));

        let image = block_on(service.upload(UploadInput {
            data: Bytes::from(data.clone()),
            filename: filename.clone(),
            pet_id: String::new(),
        }))
        .expect("upload should succeed");

        let prefix = format!("{filename}_");
        prop_assert!(image.object_key.starts_with(&prefix));
        let suffix = &image.object_key[prefix.len()..];
        prop_assert_eq!(suffix.len(), OBJECT_KEY_SUFFIX_LEN);
        prop_assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));

        prop_assert_eq!(store.get(&image.object_key), Some(Bytes::from(data)));
        let persisted = repo.get(image.id).expect("record persisted");
        prop_assert_eq!(&persisted.object_key, &image.object_key);
        prop_assert!(persisted.image_url.ends_with(&image.object_key.replace(' ', "+")));
    }

    /// A failed put never reaches the metadata store.
    #[test]
    fn prop_failed_put_never_creates(filename in arb_filename(), data in arb_bytes()) {
        let store = Arc::new(InMemoryObjectStore::new());
        let repo = Arc::new(InMemoryImageRepository::new());
        store.fail_puts(true);
        let service = ImageService::new(Arc::clone(&store), Arc::clone(&repo));

        let result = block_on(service.upload(UploadInput {
            data: Bytes::from(data),
            filename,
            pet_id: String::new(),
        }));

        prop_assert!(matches!(result, Err(ImageError::Upload(_))));
        prop_assert_eq!(repo.create_calls(), 0);
    }

    // =========================================================================
    // AssignPet short-circuit
    // =========================================================================

    /// Updates are issued in order up to and including the first failure, never past it.
    #[test]
    fn prop_assign_stops_at_first_failure(len in 1usize..8, fail_at in 0usize..8) {
        let fail_at = fail_at % len;
        let store = Arc::new(InMemoryObjectStore::new());
        let repo = Arc::new(InMemoryImageRepository::new());
        let ids: Vec<ImageId> = (0..len)
            .map(|i| repo.seed(None, &format!("img_{i}")).id)
            .collect();
        repo.fail_update_for(ids[fail_at], RepositoryError::NotFound);
        let service = ImageService::new(store, Arc::clone(&repo));

        let result = block_on(service.assign_pet(AssignPetInput {
            pet_id: PetId::new().to_string(),
            ids: ids.iter().map(ToString::to_string).collect(),
        }));

        prop_assert!(matches!(result, Err(ImageError::ImageNotFound(id)) if id == ids[fail_at]));
        prop_assert_eq!(repo.updated_ids(), ids[..=fail_at].to_vec());
    }

    /// Any malformed pet id is rejected before the metadata store is touched.
    #[test]
    fn prop_assign_rejects_malformed_pet(pet_id in "[g-z]{1,36}") {
        let store = Arc::new(InMemoryObjectStore::new());
        let repo = Arc::new(InMemoryImageRepository::new());
        let image = repo.seed(None, "a.png_1");
        let service = ImageService::new(store, Arc::clone(&repo));

        let result = block_on(service.assign_pet(AssignPetInput {
            pet_id,
            ids: vec![image.id.to_string()],
        }));

        prop_assert!(matches!(result, Err(ImageError::InvalidPetId(_))));
        prop_assert!(repo.updated_ids().is_empty());
    }
}
