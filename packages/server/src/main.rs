use std::sync::Arc;

use anyhow::Context;
use common::storage::BlobStoreProvider;
use common::storage::filesystem::FilesystemBlobStoreProvider;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use facet_server::capture::SeaOrmFacetRepository;
use facet_server::config::AppConfig;
use facet_server::state::AppState;
use facet_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    seed::ensure_indexes(&db)
        .await
        .context("Failed to create database indexes")?;

    let blob_stores = Arc::new(FilesystemBlobStoreProvider::new(
        config.storage.location.clone(),
        config.storage.max_blob_size,
    ));
    // Uploads fail with StorageUnavailable until the location exists.
    if let Err(e) = blob_stores.open().await {
        warn!(
            location = %config.storage.location.display(),
            "Blob store is not available yet: {}",
            e
        );
    }

    let state = AppState::new(
        db.clone(),
        blob_stores,
        Arc::new(SeaOrmFacetRepository::new(db)),
    );
    let app = build_router(state, &config);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
