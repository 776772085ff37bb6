mod routes;

use crate::{
    config::Config,
    media::{spawn_sweeper, Extractor, YtDlpExtractor},
};
use anyhow::{Context, Result};
use routes::{router, AppState};
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

pub async fn run(config: Config) -> Result<()> {
    let extractor = YtDlpExtractor::new(&config.extractor.binary, config.extractor.timeout());

    // Keep serving the page even when the tools are missing; requests will
    // report the extractor's error.
    if !extractor.test_availability().await {
        warn!(
            "{} is not available; format listing and downloads will fail",
            extractor.name()
        );
    }

    let output_dir = config.downloads.output_dir.clone();
    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    if let Some(max_age) = config.downloads.retention() {
        spawn_sweeper(output_dir.clone(), max_age, config.downloads.sweep_interval());
    } else {
        info!("Download retention disabled; files in {} are kept", output_dir.display());
    }

    let state = AppState {
        extractor: Arc::new(extractor),
        output_dir: Arc::new(output_dir),
    };

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", e);
    }
}
