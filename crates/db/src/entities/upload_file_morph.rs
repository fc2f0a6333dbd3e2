//! `SeaORM` Entity for upload_file_morph table.
//!
//! One row per record an uploaded file is attached to.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "upload_file_morph")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub upload_file_id: Uuid,
    pub related_id: String,
    pub related_type: String,
    pub source: Option<String>,
    pub field: String,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::upload_files::Entity",
        from = "Column::UploadFileId",
        to = "super::upload_files::Column::Id",
        on_delete = "Cascade"
    )]
    UploadFiles,
}

impl Related<super::upload_files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UploadFiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
