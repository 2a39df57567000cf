//! API route definitions.

use axum::Router;
use petfile_core::image::{ImageRepository, SuffixGenerator};
use petfile_core::storage::ObjectStore;

use crate::AppState;

pub mod health;
pub mod images;

/// Creates the API router with all routes.
pub fn api_routes<S, R, G>() -> Router<AppState<S, R, G>>
where
    S: ObjectStore + 'static,
    R: ImageRepository + 'static,
    G: SuffixGenerator + 'static,
{
    Router::new()
        .merge(health::routes())
        .merge(images::routes::<S, R, G>())
}
