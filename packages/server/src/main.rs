use std::sync::Arc;

use anyhow::Context;
use common::storage::filesystem::FilesystemFileStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mhs_server::config::AppConfig;
use mhs_server::database::init_db;
use mhs_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = init_db(&config.database)
        .await
        .context("Failed to initialize database")?;
    info!(url = %config.database.url, "Database ready");

    let files = FilesystemFileStore::new(
        config.storage.data_dir.clone(),
        config.storage.max_upload_size,
    )
    .await
    .context("Failed to initialize file store")?;
    info!(data_dir = %config.storage.data_dir.display(), "File store ready");

    let addr = config.bind_addr();
    let state = AppState {
        db,
        files: Arc::new(files),
        config,
    };
    let app = mhs_server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
