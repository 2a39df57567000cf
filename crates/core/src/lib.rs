//! Core business logic for petfile.
//!
//! This crate contains the image orchestration logic with ZERO web or database
//! dependencies. Backends are reached through the [`storage::ObjectStore`] and
//! [`image::ImageRepository`] traits.
//!
//! # Modules
//!
//! - `image` - Upload, assignment, deletion and lookup of pet images
//! - `storage` - Object storage contract and the OpenDAL-backed provider
//! - `testing` - In-memory collaborators (tests and the `testing` feature)

pub mod image;
pub mod storage;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
