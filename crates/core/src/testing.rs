//! In-memory collaborators for exercising [`ImageService`](crate::image::ImageService).
//!
//! Both stores count their calls and can be told to fail, so tests can assert
//! which backend was touched and in what order.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use chrono::Utc;
use petfile_shared::{ImageId, PetId};

use crate::image::{
    Image, ImagePatch, ImageRepository, KeyError, NewImage, RepositoryError, SuffixGenerator,
};
use crate::storage::{ObjectStore, StorageError, StoredObject};

/// URL prefix returned by [`InMemoryObjectStore::put`].
pub const MEMORY_BASE_URL: &str = "https://pet-images.example.com";

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Object store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, Bytes>>,
    fail_put: AtomicBool,
    fail_delete: AtomicBool,
    put_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl InMemoryObjectStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail.
    pub fn fail_puts(&self, fail: bool) {
        self.fail_put.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `delete` fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Store an object directly, bypassing the counters.
    pub fn insert(&self, key: &str, data: Bytes) {
        lock(&self.objects).insert(key.to_string(), data);
    }

    /// Number of `put` calls, successful or not.
    #[must_use]
    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }

    /// Number of `delete` calls, successful or not.
    #[must_use]
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Whether an object is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        lock(&self.objects).contains_key(key)
    }

    /// Bytes stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Bytes> {
        lock(&self.objects).get(key).cloned()
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.objects).len()
    }

    /// Whether the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for InMemoryObjectStore {
    async fn put(&self, data: Bytes, key: &str) -> Result<StoredObject, StorageError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_put.load(Ordering::SeqCst) {
            return Err(StorageError::operation("injected put failure"));
        }
        lock(&self.objects).insert(key.to_string(), data);
        Ok(StoredObject {
            url: format!("{MEMORY_BASE_URL}/{}", key.replace(' ', "+")),
            key: key.to_string(),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(StorageError::operation("injected delete failure"));
        }
        lock(&self.objects).remove(key);
        Ok(())
    }
}

/// Metadata repository backed by a `Vec`, kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryImageRepository {
    rows: Mutex<Vec<Image>>,
    pets: Mutex<Option<HashSet<PetId>>>,
    update_failures: Mutex<HashMap<ImageId, RepositoryError>>,
    updated: Mutex<Vec<ImageId>>,
    fail_create: AtomicBool,
    fail_delete: AtomicBool,
    fail_find: AtomicBool,
    no_rows_on_find: AtomicBool,
    create_calls: AtomicUsize,
    find_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl InMemoryImageRepository {
    /// Empty repository that accepts any pet id.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty repository that only accepts the given pets as owners.
    #[must_use]
    pub fn with_pets(pets: impl IntoIterator<Item = PetId>) -> Self {
        let repo = Self::default();
        *lock(&repo.pets) = Some(pets.into_iter().collect());
        repo
    }

    /// Insert a record directly, bypassing the counters.
    pub fn seed(&self, pet_id: Option<PetId>, object_key: &str) -> Image {
        let now = Utc::now();
        let image = Image {
            id: ImageId::new(),
            pet_id,
            image_url: format!("{MEMORY_BASE_URL}/{object_key}"),
            object_key: object_key.to_string(),
            created_at: now,
            updated_at: now,
        };
        lock(&self.rows).push(image.clone());
        image
    }

    /// Make every subsequent `create` fail.
    pub fn fail_creates(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `delete` fail.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_delete.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent lookup fail with a driver error.
    pub fn fail_finds(&self, fail: bool) {
        self.fail_find.store(fail, Ordering::SeqCst);
    }

    /// Make `find_by_owner` report no rows as [`RepositoryError::NotFound`].
    pub fn report_no_rows(&self, enabled: bool) {
        self.no_rows_on_find.store(enabled, Ordering::SeqCst);
    }

    /// Make `update` of `id` fail with `err`.
    pub fn fail_update_for(&self, id: ImageId, err: RepositoryError) {
        lock(&self.update_failures).insert(id, err);
    }

    /// Current state of a record.
    #[must_use]
    pub fn get(&self, id: ImageId) -> Option<Image> {
        lock(&self.rows).iter().find(|row| row.id == id).cloned()
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }

    /// Whether no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `create` calls.
    #[must_use]
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of `find_by_id` and `find_by_owner` calls.
    #[must_use]
    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    /// Number of `delete` calls.
    #[must_use]
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Ids passed to `update`, in call order.
    #[must_use]
    pub fn updated_ids(&self) -> Vec<ImageId> {
        lock(&self.updated).clone()
    }

    fn check_owner(&self, pet_id: Option<PetId>) -> Result<(), RepositoryError> {
        match (pet_id, lock(&self.pets).as_ref()) {
            (Some(pet), Some(known)) if !known.contains(&pet) => Err(RepositoryError::OwnerNotFound),
            _ => Ok(()),
        }
    }

    fn check_find(&self) -> Result<(), RepositoryError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_find.load(Ordering::SeqCst) {
            return Err(RepositoryError::database("injected find failure"));
        }
        Ok(())
    }
}

impl ImageRepository for InMemoryImageRepository {
    async fn create(&self, input: NewImage) -> Result<Image, RepositoryError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(RepositoryError::database("injected create failure"));
        }
        self.check_owner(input.pet_id)?;

        let now = Utc::now();
        let image = Image {
            id: ImageId::new(),
            pet_id: input.pet_id,
            image_url: input.image_url,
            object_key: input.object_key,
            created_at: now,
            updated_at: now,
        };
        lock(&self.rows).push(image.clone());
        Ok(image)
    }

    async fn find_by_owner(&self, pet_id: PetId) -> Result<Vec<Image>, RepositoryError> {
        self.check_find()?;
        let found: Vec<Image> = lock(&self.rows)
            .iter()
            .filter(|row| row.pet_id == Some(pet_id))
            .cloned()
            .collect();
        if found.is_empty() && self.no_rows_on_find.load(Ordering::SeqCst) {
            return Err(RepositoryError::NotFound);
        }
        Ok(found)
    }

    async fn find_by_id(&self, id: ImageId) -> Result<Option<Image>, RepositoryError> {
        self.check_find()?;
        Ok(self.get(id))
    }

    async fn update(&self, id: ImageId, patch: ImagePatch) -> Result<Image, RepositoryError> {
        lock(&self.updated).push(id);
        if let Some(err) = lock(&self.update_failures).get(&id) {
            return Err(err.clone());
        }
        self.check_owner(patch.pet_id)?;

        let mut rows = lock(&self.rows);
        let row = rows
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(pet_id) = patch.pet_id {
            row.pet_id = Some(pet_id);
        }
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: ImageId) -> Result<bool, RepositoryError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(RepositoryError::database("injected delete failure"));
        }
        let mut rows = lock(&self.rows);
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok(rows.len() < before)
    }
}

/// Returns a fixed suffix, repeated or cut to the requested length.
#[derive(Debug, Clone)]
pub struct FixedSuffixGenerator(pub String);

impl SuffixGenerator for FixedSuffixGenerator {
    fn generate(&self, length: usize) -> Result<String, KeyError> {
        Ok(self.0.chars().cycle().take(length).collect())
    }
}

/// Always reports an exhausted entropy source.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSuffixGenerator;

impl SuffixGenerator for FailingSuffixGenerator {
    fn generate(&self, _length: usize) -> Result<String, KeyError> {
        Err(KeyError::new("injected entropy failure"))
    }
}
