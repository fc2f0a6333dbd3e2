//! Plugin settings store backed by the `core_store` table.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::core_store;
use depot_core::upload::{SettingsStore, UploadError};

/// SQL-backed settings store.
#[derive(Debug, Clone)]
pub struct SqlSettingsStore {
    db: DatabaseConnection,
}

impl SqlSettingsStore {
    /// Create a new settings store.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingsStore for SqlSettingsStore {
    async fn get(
        &self,
        environment: &str,
        plugin: &str,
        key: &str,
    ) -> Result<Option<Value>, UploadError> {
        let row = core_store::Entity::find()
            .filter(core_store::Column::Environment.eq(environment))
            .filter(core_store::Column::Plugin.eq(plugin))
            .filter(core_store::Column::Key.eq(key))
            .one(&self.db)
            .await
            .map_err(|e| UploadError::settings(e.to_string()))?;

        row.map(|r| serde_json::from_str(&r.value))
            .transpose()
            .map_err(|e| UploadError::settings(format!("{environment}/{plugin}/{key}: {e}")))
    }

    async fn set(
        &self,
        environment: &str,
        plugin: &str,
        key: &str,
        value: Value,
    ) -> Result<(), UploadError> {
        let now = Utc::now();
        let entry = core_store::ActiveModel {
            id: Set(Uuid::new_v4()),
            environment: Set(environment.to_string()),
            plugin: Set(plugin.to_string()),
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        core_store::Entity::insert(entry)
            .on_conflict(
                OnConflict::columns([
                    core_store::Column::Environment,
                    core_store::Column::Plugin,
                    core_store::Column::Key,
                ])
                .update_columns([core_store::Column::Value, core_store::Column::UpdatedAt])
                .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| UploadError::settings(e.to_string()))?;

        Ok(())
    }

    async fn environments(&self, plugin: &str) -> Result<Vec<String>, UploadError> {
        core_store::Entity::find()
            .select_only()
            .column(core_store::Column::Environment)
            .distinct()
            .filter(core_store::Column::Plugin.eq(plugin))
            .order_by_asc(core_store::Column::Environment)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| UploadError::settings(e.to_string()))
    }
}
