//! File repository for database operations.
//!
//! Implements file metadata CRUD and search using SeaORM. Relations live in
//! `upload_file_morph` and are written in the same transaction as the file.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{upload_file_morph, upload_files};
use depot_core::upload::{
    CreateFileInput, FileQuery, FileRepository, RelationRef, SortField, SortOrder, StoredFile,
    UploadError,
};

/// SQL-backed file repository.
#[derive(Debug, Clone)]
pub struct SqlFileRepository {
    db: DatabaseConnection,
}

impl SqlFileRepository {
    /// Create a new file repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach relation rows to file models, keeping model order.
    async fn with_relations(
        &self,
        models: Vec<upload_files::Model>,
    ) -> Result<Vec<StoredFile>, UploadError> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let morphs = upload_file_morph::Entity::find()
            .filter(upload_file_morph::Column::UploadFileId.is_in(ids))
            .order_by_asc(upload_file_morph::Column::Position)
            .all(&self.db)
            .await
            .map_err(|e| UploadError::repository(e.to_string()))?;

        let mut related: HashMap<Uuid, Vec<RelationRef>> = HashMap::new();
        for morph in morphs {
            related
                .entry(morph.upload_file_id)
                .or_default()
                .push(to_relation(morph));
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let relations = related.remove(&model.id).unwrap_or_default();
                to_domain(model, relations)
            })
            .collect())
    }
}

#[async_trait]
impl FileRepository for SqlFileRepository {
    async fn create(&self, input: CreateFileInput) -> Result<StoredFile, UploadError> {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let size = i64::try_from(input.size)
            .map_err(|_| UploadError::repository(format!("file size {} too large", input.size)))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| UploadError::repository(e.to_string()))?;

        let model = upload_files::ActiveModel {
            id: Set(id),
            name: Set(input.name),
            hash: Set(input.hash),
            sha256: Set(input.sha256),
            ext: Set(input.ext),
            mime: Set(input.mime),
            size: Set(size),
            url: Set(input.url),
            provider: Set(input.provider),
            path: Set(input.path),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&txn)
        .await
        .map_err(|e| UploadError::repository(e.to_string()))?;

        for (position, relation) in input.related.iter().enumerate() {
            upload_file_morph::ActiveModel {
                id: Set(Uuid::new_v4()),
                upload_file_id: Set(id),
                related_id: Set(relation.ref_id.clone()),
                related_type: Set(relation.reference.clone()),
                source: Set(relation.source.clone()),
                field: Set(relation.field.clone()),
                position: Set(i32::try_from(position).unwrap_or(i32::MAX)),
            }
            .insert(&txn)
            .await
            .map_err(|e| UploadError::repository(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| UploadError::repository(e.to_string()))?;

        Ok(to_domain(model, input.related))
    }

    async fn fetch_all(&self, query: &FileQuery) -> Result<Vec<StoredFile>, UploadError> {
        let (field, order) = query.sort();
        let column = sort_column(field);
        let mut select = filtered(query);
        select = match order {
            SortOrder::Asc => select.order_by_asc(column),
            SortOrder::Desc => select.order_by_desc(column),
        };
        // Stable paging when the sort column has ties
        select = select.order_by_asc(upload_files::Column::Id);

        if let Some(start) = query.start {
            select = select.offset(start);
        }
        if let Some(limit) = query.limit {
            select = select.limit(limit);
        }

        let models = select
            .all(&self.db)
            .await
            .map_err(|e| UploadError::repository(e.to_string()))?;

        self.with_relations(models).await
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<StoredFile>, UploadError> {
        let model = upload_files::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| UploadError::repository(e.to_string()))?;

        match model {
            Some(model) => Ok(self.with_relations(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn count(&self, query: &FileQuery) -> Result<u64, UploadError> {
        filtered(query)
            .count(&self.db)
            .await
            .map_err(|e| UploadError::repository(e.to_string()))
    }

    async fn search(&self, term: &str) -> Result<Vec<StoredFile>, UploadError> {
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));

        let models = upload_files::Entity::find()
            .filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col(upload_files::Column::Hash)))
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col(upload_files::Column::Name)))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            )
            .order_by_desc(upload_files::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| UploadError::repository(e.to_string()))?;

        self.with_relations(models).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, UploadError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| UploadError::repository(e.to_string()))?;

        // SQLite only cascades with the foreign_keys pragma on
        upload_file_morph::Entity::delete_many()
            .filter(upload_file_morph::Column::UploadFileId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| UploadError::repository(e.to_string()))?;

        let result = upload_files::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| UploadError::repository(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| UploadError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

/// Base select with the exact-match filters of `query`.
fn filtered(query: &FileQuery) -> Select<upload_files::Entity> {
    let mut select = upload_files::Entity::find();
    if let Some(name) = &query.name {
        select = select.filter(upload_files::Column::Name.eq(name.as_str()));
    }
    if let Some(mime) = &query.mime {
        select = select.filter(upload_files::Column::Mime.eq(mime.as_str()));
    }
    if let Some(provider) = &query.provider {
        select = select.filter(upload_files::Column::Provider.eq(provider.as_str()));
    }
    if let Some(hash) = &query.hash {
        select = select.filter(upload_files::Column::Hash.eq(hash.as_str()));
    }
    select
}

fn sort_column(field: SortField) -> upload_files::Column {
    match field {
        SortField::Name => upload_files::Column::Name,
        SortField::Hash => upload_files::Column::Hash,
        SortField::Size => upload_files::Column::Size,
        SortField::Mime => upload_files::Column::Mime,
        SortField::CreatedAt => upload_files::Column::CreatedAt,
        SortField::UpdatedAt => upload_files::Column::UpdatedAt,
    }
}

/// Escape LIKE wildcards so the term matches literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn to_relation(model: upload_file_morph::Model) -> RelationRef {
    RelationRef {
        ref_id: model.related_id,
        reference: model.related_type,
        source: model.source,
        field: model.field,
    }
}

/// Convert database model to domain model.
fn to_domain(model: upload_files::Model, related: Vec<RelationRef>) -> StoredFile {
    StoredFile {
        id: model.id,
        name: model.name,
        hash: model.hash,
        sha256: model.sha256,
        ext: model.ext,
        mime: model.mime,
        size: u64::try_from(model.size).unwrap_or_default(),
        url: model.url,
        provider: model.provider,
        path: model.path,
        related,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
