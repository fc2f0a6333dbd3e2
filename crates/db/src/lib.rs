//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - SQL and in-memory implementations of the upload collaborator traits
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    MemoryFileRepository, MemorySettingsStore, SqlFileRepository, SqlSettingsStore,
};

use std::sync::Arc;
use std::time::Duration;

use depot_core::upload::{FileRepository, SettingsStore};
use depot_shared::config::{DatabaseBackend, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use migration::Migrator;

/// File repository and settings store of the selected backend.
#[derive(Clone)]
pub struct Backend {
    /// File metadata persistence.
    pub files: Arc<dyn FileRepository>,
    /// Plugin settings persistence.
    pub settings: Arc<dyn SettingsStore>,
}

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    Database::connect(options).await
}

/// Open the backend selected by `config.backend`.
///
/// The SQL backend is connected and migrated before use.
///
/// # Errors
///
/// Returns an error if the database cannot be reached or migrated.
pub async fn open(config: &DatabaseConfig) -> Result<Backend, DbErr> {
    match config.backend {
        DatabaseBackend::Sql => {
            let db = connect(config).await?;
            Migrator::up(&db, None).await?;
            info!("Connected to database, migrations applied");
            Ok(Backend {
                files: Arc::new(SqlFileRepository::new(db.clone())),
                settings: Arc::new(SqlSettingsStore::new(db)),
            })
        }
        DatabaseBackend::Memory => {
            info!("Using in-memory backend");
            Ok(Backend {
                files: Arc::new(MemoryFileRepository::new()),
                settings: Arc::new(MemorySettingsStore::new()),
            })
        }
    }
}
