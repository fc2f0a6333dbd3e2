//! `SeaORM` Entity for upload_files table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "upload_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub hash: String,
    pub sha256: String,
    pub ext: String,
    pub mime: String,
    pub size: i64,
    pub url: String,
    pub provider: String,
    pub path: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::upload_file_morph::Entity")]
    UploadFileMorph,
}

impl Related<super::upload_file_morph::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UploadFileMorph.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
