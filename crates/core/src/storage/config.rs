//! Storage configuration types.

use petfile_shared::{StorageProvider, StorageSettings};

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Prefix for public URLs, overriding the provider-derived one.
    pub public_base_url: Option<String>,
}

impl StorageConfig {
    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            public_base_url: None,
        }
    }

    /// Public URL under which `key` is served.
    ///
    /// Spaces in the key are written as `+`; nothing else is escaped.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        let key = key.replace(' ', "+");

        if let Some(base) = &self.public_base_url {
            return format!("{}/{key}", base.trim_end_matches('/'));
        }

        match &self.provider {
            StorageProvider::S3 {
                endpoint: Some(endpoint),
                bucket,
                ..
            } => format!("{}/{bucket}/{key}", endpoint.trim_end_matches('/')),
            StorageProvider::S3 {
                endpoint: None,
                bucket,
                region,
                ..
            } => format!("https://{bucket}.s3.{region}.amazonaws.com/{key}"),
            StorageProvider::AzureBlob {
                account, container, ..
            } => format!("https://{account}.blob.core.windows.net/{container}/{key}"),
            StorageProvider::LocalFs { root } => {
                format!("file://{}/{key}", root.display().to_string().trim_end_matches('/'))
            }
        }
    }
}

impl From<StorageSettings> for StorageConfig {
    fn from(settings: StorageSettings) -> Self {
        Self {
            public_base_url: settings.public_base_url,
            ..Self::new(settings.provider)
        }
    }
}
