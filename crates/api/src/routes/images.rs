//! Image routes.
//!
//! Thin adapters over [`ImageService`](petfile_core::image::ImageService).
//! Ids travel as strings so malformed ones are rejected by the service with
//! the same error as every other caller.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State, rejection::BytesRejection, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use petfile_core::image::{AssignPetInput, Image, ImageRepository, SuffixGenerator, UploadInput};
use petfile_core::storage::ObjectStore;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ApiError, AppState};

/// Creates the image routes.
pub fn routes<S, R, G>() -> Router<AppState<S, R, G>>
where
    S: ObjectStore + 'static,
    R: ImageRepository + 'static,
    G: SuffixGenerator + 'static,
{
    Router::new()
        .route("/images", post(upload_image::<S, R, G>))
        .route("/images/{id}", get(get_image::<S, R, G>).delete(delete_image::<S, R, G>))
        .route(
            "/pets/{pet_id}/images",
            get(list_pet_images::<S, R, G>)
                .put(assign_pet_images::<S, R, G>)
                .delete(delete_pet_images::<S, R, G>),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for upload.
#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    /// Filename the object key starts with.
    #[serde(default)]
    pub filename: String,
    /// Owning pet; absent or empty means unassigned.
    #[serde(default)]
    pub pet_id: String,
}

/// Body for assigning images to a pet.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    /// Images to assign, in order.
    pub ids: Vec<String>,
}

/// Image representation on the wire.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageResponse {
    /// Image id.
    pub id: String,
    /// Owning pet id, empty when unassigned.
    pub pet_id: String,
    /// Public URL of the binary.
    pub image_url: String,
    /// Object store key.
    pub object_key: String,
}

impl From<Image> for ImageResponse {
    fn from(image: Image) -> Self {
        Self {
            id: image.id.to_string(),
            pet_id: image.pet_id.map(|p| p.to_string()).unwrap_or_default(),
            image_url: image.image_url,
            object_key: image.object_key,
        }
    }
}

/// List of images.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageListResponse {
    /// Images in store order.
    pub images: Vec<ImageResponse>,
}

/// Acknowledgement without detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Always `true`.
    pub success: bool,
}

/// Result of deleting a pet's images.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    /// Number of images deleted.
    pub deleted: usize,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/images?filename=..&pet_id=..` with the raw image as body.
async fn upload_image<S, R, G>(
    State(state): State<AppState<S, R, G>>,
    Query(query): Query<UploadQuery>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    S: ObjectStore,
    R: ImageRepository,
    G: SuffixGenerator,
{
    let data = body.map_err(|e| ApiError::invalid_argument(e.body_text()))?;

    let image = state
        .images
        .upload(UploadInput {
            data,
            filename: query.filename,
            pet_id: query.pet_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ImageResponse::from(image))))
}

/// GET `/images/{id}`
async fn get_image<S, R, G>(
    State(state): State<AppState<S, R, G>>,
    Path(id): Path<String>,
) -> Result<Json<ImageResponse>, ApiError>
where
    S: ObjectStore,
    R: ImageRepository,
    G: SuffixGenerator,
{
    let image = state.images.find_by_id(&id).await?;
    Ok(Json(image.into()))
}

/// DELETE `/images/{id}`
async fn delete_image<S, R, G>(
    State(state): State<AppState<S, R, G>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError>
where
    S: ObjectStore,
    R: ImageRepository,
    G: SuffixGenerator,
{
    state.images.delete(&id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET `/pets/{pet_id}/images`
async fn list_pet_images<S, R, G>(
    State(state): State<AppState<S, R, G>>,
    Path(pet_id): Path<String>,
) -> Result<Json<ImageListResponse>, ApiError>
where
    S: ObjectStore,
    R: ImageRepository,
    G: SuffixGenerator,
{
    let images = state.images.find_by_pet(&pet_id).await?;
    Ok(Json(ImageListResponse {
        images: images.into_iter().map(ImageResponse::from).collect(),
    }))
}

/// PUT `/pets/{pet_id}/images` with `{"ids": [...]}`.
async fn assign_pet_images<S, R, G>(
    State(state): State<AppState<S, R, G>>,
    Path(pet_id): Path<String>,
    payload: Result<Json<AssignRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError>
where
    S: ObjectStore,
    R: ImageRepository,
    G: SuffixGenerator,
{
    let Json(payload) = payload.map_err(|e| ApiError::invalid_argument(e.body_text()))?;
    let count = payload.ids.len();

    state
        .images
        .assign_pet(AssignPetInput {
            pet_id: pet_id.clone(),
            ids: payload.ids,
        })
        .await?;

    info!(pet_id = %pet_id, count, "Images assigned to pet");
    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE `/pets/{pet_id}/images`
async fn delete_pet_images<S, R, G>(
    State(state): State<AppState<S, R, G>>,
    Path(pet_id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError>
where
    S: ObjectStore,
    R: ImageRepository,
    G: SuffixGenerator,
{
    let deleted = state.images.delete_by_pet(&pet_id).await?;
    Ok(Json(DeletedResponse { deleted }))
}
