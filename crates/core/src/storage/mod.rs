//! Object storage for image binaries using Apache OpenDAL.
//!
//! One [`StorageService`] serves every supported provider:
//! - S3-compatible: AWS S3, Cloudflare R2, MinIO
//! - Azure Blob Storage
//! - Local filesystem (development only)
//!
//! The provider is chosen once from configuration. Callers only see the
//! [`ObjectStore`] contract, so tests substitute an in-memory store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      ObjectStore                                │
//! │      put(bytes, key) -> (public url, key)   delete(key)         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                      Apache OpenDAL                             │
//! │        op.write("key", data)        op.delete("key")            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod service;
mod store;

pub use config::StorageConfig;
pub use error::StorageError;
pub use petfile_shared::StorageProvider;
pub use service::StorageService;
pub use store::{ObjectStore, StoredObject};
