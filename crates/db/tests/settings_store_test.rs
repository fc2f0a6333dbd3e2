//! Integration tests for the SQL settings store on in-memory SQLite.

use depot_core::upload::SettingsStore;
use depot_db::{connect, migration::Migrator, SqlSettingsStore};
use depot_shared::config::{DatabaseBackend, DatabaseConfig};
use rstest::rstest;
use sea_orm_migration::MigratorTrait;
use serde_json::{Value, json};

async fn setup_store() -> SqlSettingsStore {
    let config = DatabaseConfig {
        backend: DatabaseBackend::Sql,
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    };
    let db = connect(&config).await.expect("Failed to connect to database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    SqlSettingsStore::new(db)
}

#[tokio::test]
async fn test_missing_entry_is_none() {
    let store = setup_store().await;
    let value = store.get("development", "upload", "provider").await.unwrap();
    assert!(value.is_none());
}

#[rstest]
#[case(json!({"provider": "local", "enabled": true, "sizeLimit": 1_000_000.0}))]
#[case(json!({"provider": "aws-s3", "enabled": false, "sizeLimit": 0.0, "bucket": "media"}))]
#[tokio::test]
async fn test_set_then_get_returns_value(#[case] value: Value) {
    let store = setup_store().await;

    store
        .set("development", "upload", "provider", value.clone())
        .await
        .unwrap();

    let read = store.get("development", "upload", "provider").await.unwrap();
    assert_eq!(read, Some(value));
}

#[tokio::test]
async fn test_set_overwrites_existing_entry() {
    let store = setup_store().await;

    store
        .set("development", "upload", "provider", json!({"sizeLimit": 1.0}))
        .await
        .unwrap();
    store
        .set("development", "upload", "provider", json!({"sizeLimit": 2.0}))
        .await
        .unwrap();

    let read = store.get("development", "upload", "provider").await.unwrap();
    assert_eq!(read, Some(json!({"sizeLimit": 2.0})));
    assert_eq!(store.environments("upload").await.unwrap(), vec!["development"]);
}

#[tokio::test]
async fn test_environments_are_per_plugin() {
    let store = setup_store().await;

    store.set("production", "upload", "provider", json!({})).await.unwrap();
    store.set("development", "upload", "provider", json!({})).await.unwrap();
    store.set("staging", "users", "grant", json!({})).await.unwrap();

    assert_eq!(
        store.environments("upload").await.unwrap(),
        vec!["development".to_string(), "production".to_string()]
    );
    assert!(
        store
            .get("production", "users", "grant")
            .await
            .unwrap()
            .is_none()
    );
}
