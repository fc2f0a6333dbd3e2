//! Migration to create the upload tables and the plugin settings store.
//!
//! Written with the schema builder so it runs on Postgres and SQLite alike.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UploadFiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UploadFiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UploadFiles::Name).string().not_null())
                    .col(ColumnDef::new(UploadFiles::Hash).string().not_null())
                    .col(ColumnDef::new(UploadFiles::Sha256).string_len(64).not_null())
                    .col(ColumnDef::new(UploadFiles::Ext).string().not_null())
                    .col(ColumnDef::new(UploadFiles::Mime).string().not_null())
                    .col(ColumnDef::new(UploadFiles::Size).big_integer().not_null())
                    .col(ColumnDef::new(UploadFiles::Url).text().not_null())
                    .col(ColumnDef::new(UploadFiles::Provider).string().not_null())
                    .col(ColumnDef::new(UploadFiles::Path).string().null())
                    .col(
                        ColumnDef::new(UploadFiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(UploadFiles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_upload_files_hash")
                    .table(UploadFiles::Table)
                    .col(UploadFiles::Hash)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UploadFileMorph::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UploadFileMorph::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UploadFileMorph::UploadFileId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UploadFileMorph::RelatedId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UploadFileMorph::RelatedType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(UploadFileMorph::Source).string().null())
                    .col(ColumnDef::new(UploadFileMorph::Field).string().not_null())
                    .col(
                        ColumnDef::new(UploadFileMorph::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_upload_file_morph_file")
                            .from(UploadFileMorph::Table, UploadFileMorph::UploadFileId)
                            .to(UploadFiles::Table, UploadFiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Relations are always loaded per file
        manager
            .create_index(
                Index::create()
                    .name("idx_upload_file_morph_file")
                    .table(UploadFileMorph::Table)
                    .col(UploadFileMorph::UploadFileId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CoreStore::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CoreStore::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CoreStore::Environment).string().not_null())
                    .col(ColumnDef::new(CoreStore::Plugin).string().not_null())
                    .col(ColumnDef::new(CoreStore::Key).string().not_null())
                    .col(ColumnDef::new(CoreStore::Value).text().not_null())
                    .col(
                        ColumnDef::new(CoreStore::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CoreStore::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Upserts conflict on this triple
        manager
            .create_index(
                Index::create()
                    .name("idx_core_store_entry")
                    .table(CoreStore::Table)
                    .col(CoreStore::Environment)
                    .col(CoreStore::Plugin)
                    .col(CoreStore::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CoreStore::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UploadFileMorph::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(UploadFiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum UploadFiles {
    Table,
    Id,
    Name,
    Hash,
    Sha256,
    Ext,
    Mime,
    Size,
    Url,
    Provider,
    Path,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UploadFileMorph {
    Table,
    Id,
    UploadFileId,
    RelatedId,
    RelatedType,
    Source,
    Field,
    Position,
}

#[derive(DeriveIden)]
enum CoreStore {
    Table,
    Id,
    Environment,
    Plugin,
    Key,
    Value,
    CreatedAt,
    UpdatedAt,
}
