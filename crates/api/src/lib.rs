//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes over [`ImageService`]
//! - JSON error responses
//! - Request tracing and CORS layers

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use petfile_core::image::{ImageRepository, ImageService, RandomSuffixGenerator, SuffixGenerator};
use petfile_core::storage::ObjectStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
pub struct AppState<S, R, G = RandomSuffixGenerator> {
    /// Image orchestration service.
    pub images: Arc<ImageService<S, R, G>>,
}

impl<S, R, G> AppState<S, R, G> {
    /// Create state around an image service.
    #[must_use]
    pub fn new(images: ImageService<S, R, G>) -> Self {
        Self {
            images: Arc::new(images),
        }
    }
}

// Derived Clone would require S, R and G to be Clone.
impl<S, R, G> Clone for AppState<S, R, G> {
    fn clone(&self) -> Self {
        Self {
            images: Arc::clone(&self.images),
        }
    }
}

/// Creates the main application router.
pub fn create_router<S, R, G>(state: AppState<S, R, G>) -> Router
where
    S: ObjectStore + 'static,
    R: ImageRepository + 'static,
    G: SuffixGenerator + 'static,
{
    let body_limit = usize::try_from(state.images.max_file_size()).unwrap_or(usize::MAX);

    Router::new()
        .nest("/api/v1", routes::api_routes::<S, R, G>())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
