//! Shared identifiers, errors, and configuration for Petfile.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for images and the pets that own them
//! - Caller-facing error categories
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LogFormat, StorageProvider, StorageSettings};
pub use error::{AppError, StatusCode};
pub use types::{ImageId, PetId};
