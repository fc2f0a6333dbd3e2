//! Depot API Server
//!
//! Main entry point for the Depot upload service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use depot_api::{AppState, create_router};
use depot_core::storage::{StorageConfig, StorageService};
use depot_shared::{AppConfig, env};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    // Load configuration
    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(host) = env::var("HOST", None) {
        config.server.host = host;
    }
    if let Some(port) = env::int("PORT", None).and_then(|p| u16::try_from(p).ok()) {
        config.server.port = port;
    }

    // Persistence backend
    let backend = depot_db::open(&config.database)
        .await
        .context("Failed to open database backend")?;

    // Object storage
    let storage_config = StorageConfig::from_settings(&config.storage);
    let storage = StorageService::from_config(storage_config, backend.files.clone())
        .context("Failed to initialize storage provider")?;
    info!(
        provider = %storage.config().descriptor().provider,
        public_url = %storage.config().public_url,
        "Storage provider mounted"
    );

    // Create application state
    let state = AppState::new(
        Arc::new(storage),
        backend.files,
        backend.settings,
        &config.upload,
    );
    if state.settings.seed(&state.environment).await? {
        info!(environment = %state.environment, "Seeded default upload settings");
    }
    info!(environment = %state.environment, "Upload environment");

    // Create router
    let app = create_router(state, config.server.max_body_bytes);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Install the tracing subscriber. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "depot=debug,tower_http=debug".into());

    let json = env::var("LOG_FORMAT", None).is_some_and(|f| f.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
