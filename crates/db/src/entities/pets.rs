//! `SeaORM` Entity for pets table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "pets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "type")]
    pub pet_type: String,
    pub species: String,
    pub name: String,
    pub birthdate: String,
    pub gender: String,
    pub color: String,
    pub pattern: String,
    #[sea_orm(column_type = "Text")]
    pub habit: String,
    #[sea_orm(column_type = "Text")]
    pub caption: String,
    pub status: String,
    pub is_sterile: bool,
    pub is_vaccinated: bool,
    pub is_visible: bool,
    pub is_club_pet: bool,
    pub origin: String,
    pub address: String,
    pub contact: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::images::Entity")]
    Images,
}

impl Related<super::images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
