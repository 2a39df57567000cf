//! Image repository for database operations.
//!
//! Implements the image metadata store using SeaORM.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr, Unchanged,
};
use tracing::debug;
use uuid::Uuid;

use crate::entities::images;
use petfile_core::image::{
    Image, ImagePatch, ImageRepository as ImageRepoTrait, NewImage, RepositoryError,
};
use petfile_shared::{ImageId, PetId};

/// Image repository implementation.
#[derive(Debug, Clone)]
pub struct ImageRepository {
    db: DatabaseConnection,
}

impl ImageRepository {
    /// Create a new image repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ImageRepoTrait for ImageRepository {
    async fn create(&self, input: NewImage) -> Result<Image, RepositoryError> {
        let now = Utc::now();
        let active_model = images::ActiveModel {
            id: Set(Uuid::now_v7()),
            pet_id: Set(input.pet_id.map(PetId::into_inner)),
            image_url: Set(input.image_url),
            object_key: Set(input.object_key),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;
        debug!(image_id = %model.id, "Image record inserted");

        Ok(to_domain(model))
    }

    async fn find_by_owner(&self, pet_id: PetId) -> Result<Vec<Image>, RepositoryError> {
        let models = images::Entity::find()
            .filter(images::Column::PetId.eq(pet_id.into_inner()))
            .order_by_asc(images::Column::CreatedAt)
            .order_by_asc(images::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn find_by_id(&self, id: ImageId) -> Result<Option<Image>, RepositoryError> {
        let model = images::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(model.map(to_domain))
    }

    async fn update(&self, id: ImageId, patch: ImagePatch) -> Result<Image, RepositoryError> {
        let mut active_model = images::ActiveModel {
            id: Unchanged(id.into_inner()),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };
        if let Some(pet_id) = patch.pet_id {
            active_model.pet_id = Set(Some(pet_id.into_inner()));
        }

        let model = active_model.update(&self.db).await.map_err(map_db_err)?;

        Ok(to_domain(model))
    }

    async fn delete(&self, id: ImageId) -> Result<bool, RepositoryError> {
        let result = images::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }
}

/// Classify a driver error for the orchestrator.
fn map_db_err(err: DbErr) -> RepositoryError {
    if let Some(SqlErr::ForeignKeyConstraintViolation(_)) = err.sql_err() {
        return RepositoryError::OwnerNotFound;
    }
    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepositoryError::NotFound,
        other => RepositoryError::database(other.to_string()),
    }
}

/// Convert database model to domain model.
fn to_domain(model: images::Model) -> Image {
    Image {
        id: ImageId::from_uuid(model.id),
        pet_id: model.pet_id.map(PetId::from_uuid),
        image_url: model.image_url,
        object_key: model.object_key,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
