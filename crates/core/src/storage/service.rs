//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{Builder, Operator, services};
use petfile_shared::StorageProvider;
use tracing::{debug, error};

use super::config::StorageConfig;
use super::error::StorageError;
use super::store::{ObjectStore, StoredObject};

/// Storage service for image binaries.
#[derive(Debug, Clone)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let mut builder = services::S3::default()
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }
                finish(builder)
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => finish(
                services::Azblob::default()
                    .endpoint(&format!("https://{account}.blob.core.windows.net"))
                    .account_name(account)
                    .account_key(access_key)
                    .container(container),
            ),
            StorageProvider::LocalFs { root } => finish(
                services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                ),
            ),
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }
}

impl ObjectStore for StorageService {
    async fn put(&self, data: Bytes, key: &str) -> Result<StoredObject, StorageError> {
        validate_key(key)?;

        let size = data.len();
        self.operator.write(key, data).await.map_err(|e| {
            error!(
                error = %e,
                bucket = self.bucket(),
                key,
                "Couldn't upload object"
            );
            StorageError::from(e)
        })?;
        debug!(provider = self.provider_name(), key, size, "Object written");

        Ok(StoredObject {
            url: self.config.public_url(key),
            key: key.to_string(),
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        validate_key(key)?;

        self.operator.delete(key).await.map_err(|e| {
            error!(
                error = %e,
                bucket = self.bucket(),
                key,
                "Couldn't delete object"
            );
            StorageError::from(e)
        })
    }
}

fn finish(builder: impl Builder) -> Result<Operator, StorageError> {
    Ok(Operator::new(builder)
        .map_err(|e| StorageError::configuration(e.to_string()))?
        .finish())
}

/// Keys name files, never directories.
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() || key.ends_with('/') || !is_confined(key) {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Whether `path` stays below the store root once joined onto it.
///
/// Absolute paths and `..` segments are refused. The filesystem backend joins
/// keys onto its root without resolving them.
fn is_confined(path: &str) -> bool {
    !path.starts_with('/') && !path.split('/').any(|segment| segment == "..")
}
