use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{
    services::{camera_files, files_index, health, index, list_cameras, snap},
    state::AppState,
};
use crate::config::Config;
use crate::snapshot::{MotionEyeFetcher, SystemClock};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// All gateway routes over the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/cameras", get(list_cameras))
        .route("/snap", get(snap))
        .route("/files", get(files_index))
        .route("/files/{camera}", get(camera_files))
        .route("/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn run(config: Config) -> Result<(), AnyError> {
    let registry = config.camera_registry()?;
    info!(cameras = registry.len(), "Camera registry loaded");

    let fetcher = MotionEyeFetcher::new(
        &config.backend,
        config.storage.output_root.clone(),
        Arc::new(SystemClock),
    )?;

    let address = config.server.bind_addr;
    let state = AppState::new(config, registry, Arc::new(fetcher));
    info!(output_root = %state.resolver.output_root().display(), "Serving snapshots");

    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "camgate listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
