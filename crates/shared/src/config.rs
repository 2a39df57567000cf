//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Object storage configuration.
    pub storage: StorageSettings,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds to wait for in-flight requests after a shutdown signal.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_shutdown_timeout() -> u64 {
    2
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Log every SQL statement.
    #[serde(default)]
    pub sql_logging: bool,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Object storage provider.
///
/// Exactly one provider is selected at startup; credentials never leave
/// this struct except into the storage client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: AWS S3, Cloudflare R2, MinIO.
    S3 {
        /// Custom endpoint URL. `None` means AWS S3.
        #[serde(default)]
        endpoint: Option<String>,
        /// Bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Azure Blob Storage.
    AzureBlob {
        /// Storage account name.
        account: String,
        /// Storage access key.
        access_key: String,
        /// Container name.
        container: String,
    },
    /// Local filesystem (development only).
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Get the provider name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local_fs",
        }
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3 { bucket, .. } => bucket,
            Self::AzureBlob { container, .. } => container,
            Self::LocalFs { root } => root.to_str().unwrap_or("local"),
        }
    }
}

/// Object storage settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Provider and its credentials.
    pub provider: StorageProvider,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Prefix for public URLs, overriding the provider-derived one.
    #[serde(default)]
    pub public_base_url: Option<String>,
}

/// Default upload limit (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

fn default_max_file_size() -> u64 {
    DEFAULT_MAX_FILE_SIZE
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PETFILE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(src: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()
            .and_then(config::Config::try_deserialize)
            .expect("valid config")
    }

    #[test]
    fn test_defaults_applied() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/petfile"

            [storage.provider]
            type = "local_fs"
            root = "./storage"
            "#,
        );

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.shutdown_timeout_secs, 2);
        assert_eq!(config.database.max_connections, 10);
        assert!(!config.database.sql_logging);
        assert_eq!(config.storage.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert!(config.storage.public_base_url.is_none());
        assert_eq!(config.log.format, LogFormat::Pretty);
        assert_eq!(config.storage.provider.name(), "local_fs");
    }

    #[test]
    fn test_s3_provider() {
        let config = from_toml(
            r#"
            [database]
            url = "postgres://localhost/petfile"

            [storage]
            max_file_size = 1024

            [storage.provider]
            type = "s3"
            bucket = "pet-images"
            access_key_id = "key"
            secret_access_key = "secret"
            region = "ap-southeast-1"

            [log]
            format = "json"
            "#,
        );

        assert_eq!(config.storage.provider.name(), "s3");
        assert_eq!(config.storage.provider.bucket(), "pet-images");
        assert_eq!(config.storage.max_file_size, 1024);
        assert_eq!(config.log.format, LogFormat::Json);
        assert!(matches!(
            config.storage.provider,
            StorageProvider::S3 { endpoint: None, .. }
        ));
    }

    #[test]
    fn test_azure_provider_bucket_is_container() {
        let provider = StorageProvider::AzureBlob {
            account: "petfiledev".into(),
            access_key: "key".into(),
            container: "images".into(),
        };
        assert_eq!(provider.name(), "azure_blob");
        assert_eq!(provider.bucket(), "images");
    }

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("PETFILE__DATABASE__URL", Some("postgres://env/petfile")),
                ("PETFILE__SERVER__PORT", Some("4000")),
                ("PETFILE__STORAGE__PROVIDER__TYPE", Some("local_fs")),
                ("PETFILE__STORAGE__PROVIDER__ROOT", Some("/tmp/petfile")),
                ("RUN_MODE", Some("petfile-config-test")),
            ],
            || {
                let config = AppConfig::load().expect("config from env");
                assert_eq!(config.database.url, "postgres://env/petfile");
                assert_eq!(config.server.port, 4000);
                assert_eq!(
                    config.storage.provider,
                    StorageProvider::LocalFs {
                        root: PathBuf::from("/tmp/petfile")
                    }
                );
            },
        );
    }
}
