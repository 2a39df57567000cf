//! Petfile API Server
//!
//! Main entry point for the pet image service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use petfile_api::{AppState, create_router};
use petfile_core::image::ImageService;
use petfile_core::storage::StorageService;
use petfile_db::{ImageRepository, connect_with};
use petfile_shared::{AppConfig, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(config.log.format);

    // Connect to database
    let db = connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    // Create object storage
    let storage = StorageService::from_config(config.storage.clone().into())
        .context("Failed to initialize object storage")?;
    info!(
        provider = storage.provider_name(),
        bucket = storage.bucket(),
        "Object storage configured"
    );

    // Create image service
    let images = ImageService::new(Arc::new(storage), Arc::new(ImageRepository::new(db.clone())))
        .with_max_file_size(config.storage.max_file_size);

    // Create router
    let app = create_router(AppState::new(images));

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = stop_tx.send(true);
    });

    // In-flight requests get a bounded grace period once a signal arrives.
    let grace = Duration::from_secs(config.server.shutdown_timeout_secs);
    let drain_deadline = async move {
        let _ = stop_rx.wait_for(|stopping| *stopping).await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        res = async { server.await } => res?,
        () = drain_deadline => warn!(
            timeout_secs = grace.as_secs(),
            "Shutdown grace period elapsed with requests in flight"
        ),
    }

    db.close().await.context("Failed to close database")?;
    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "petfile=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
