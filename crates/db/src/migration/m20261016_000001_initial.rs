//! Initial database migration.
//!
//! Creates the pets catalog, the images table that points into object
//! storage, and the trigger keeping `updated_at` current.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: FUNCTIONS
        // ============================================================
        db.execute_unprepared(TOUCH_UPDATED_AT_SQL).await?;

        // ============================================================
        // PART 2: TABLES
        // ============================================================
        db.execute_unprepared(PETS_SQL).await?;
        db.execute_unprepared(IMAGES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const TOUCH_UPDATED_AT_SQL: &str = r"
CREATE OR REPLACE FUNCTION touch_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
";

const PETS_SQL: &str = r"
CREATE TABLE pets (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    type VARCHAR(255) NOT NULL DEFAULT '',
    species VARCHAR(255) NOT NULL DEFAULT '',
    name VARCHAR(255) NOT NULL DEFAULT '',
    birthdate VARCHAR(255) NOT NULL DEFAULT '',
    gender VARCHAR(32) NOT NULL DEFAULT '',
    color VARCHAR(255) NOT NULL DEFAULT '',
    pattern VARCHAR(255) NOT NULL DEFAULT '',
    habit TEXT NOT NULL DEFAULT '',
    caption TEXT NOT NULL DEFAULT '',
    status VARCHAR(32) NOT NULL DEFAULT '',
    is_sterile BOOLEAN NOT NULL DEFAULT false,
    is_vaccinated BOOLEAN NOT NULL DEFAULT false,
    is_visible BOOLEAN NOT NULL DEFAULT false,
    is_club_pet BOOLEAN NOT NULL DEFAULT false,
    origin VARCHAR(255) NOT NULL DEFAULT '',
    address VARCHAR(255) NOT NULL DEFAULT '',
    contact VARCHAR(255) NOT NULL DEFAULT '',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TRIGGER trg_pets_updated_at
    BEFORE UPDATE ON pets
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();
";

const IMAGES_SQL: &str = r"
CREATE TABLE images (
    id UUID PRIMARY KEY,
    pet_id UUID REFERENCES pets(id) ON UPDATE CASCADE ON DELETE SET NULL,
    image_url TEXT NOT NULL,
    object_key TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_image_url_not_empty CHECK (image_url <> ''),
    CONSTRAINT chk_object_key_not_empty CHECK (object_key <> '')
);

-- Listing a pet's images, in upload order
CREATE INDEX idx_images_pet ON images(pet_id, created_at, id);

CREATE TRIGGER trg_images_updated_at
    BEFORE UPDATE ON images
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TRIGGER IF EXISTS trg_images_updated_at ON images;
DROP TRIGGER IF EXISTS trg_pets_updated_at ON pets;

DROP TABLE IF EXISTS images CASCADE;
DROP TABLE IF EXISTS pets CASCADE;

DROP FUNCTION IF EXISTS touch_updated_at();
";
