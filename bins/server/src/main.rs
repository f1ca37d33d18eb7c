//! Files API Server
//!
//! Main entry point for the Files API service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use files_api::{AppState, RouterConfig, create_router};
use files_core::files::{FileService, FilesConfig};
use files_core::generation::{OpenAiConfig, OpenAiGenerator};
use files_core::storage::{OpendalStore, StorageConfig};
use files_shared::AppConfig;
use files_shared::config::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(config.log.format);

    // Object store
    let storage_config = StorageConfig::from(&config.storage);
    let store = OpendalStore::from_config(storage_config)
        .context("failed to initialize object store")?;
    info!(
        provider = store.provider_name(),
        bucket = store.bucket(),
        root = %store.config().root(),
        "Object store configured"
    );

    // File service, with generation when a provider key is present
    let files_config = FilesConfig::from_settings(&config.storage, &config.generation);
    let mut files = FileService::new(Arc::new(store), files_config);
    match OpenAiConfig::from_settings(&config.generation) {
        Some(openai) => {
            let base_url = openai.base_url.clone();
            let generator =
                OpenAiGenerator::new(openai).context("failed to build generation client")?;
            files = files.with_generator(Arc::new(generator));
            info!(base_url = %base_url, "AI generation enabled");
        }
        None => warn!("No generation API key configured, AI generation disabled"),
    }

    // Create router
    let router_config = RouterConfig {
        request_timeout: Duration::from_secs(config.server.request_timeout_secs),
    };
    let app = create_router(AppState::new(files), router_config);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "files=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
