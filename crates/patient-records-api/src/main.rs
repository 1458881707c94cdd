use std::future::Future;
use std::io;

use anyhow::{Context, Result};
use patient_records_api::{app, ServerConfig};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let store = config
        .store
        .open()
        .with_context(|| format!("failed to open patient store at {}", config.store.path.display()))?;
    info!(
        path = %config.store.path.display(),
        backend = ?config.store.backend,
        "patient store ready"
    );

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "patient API listening");

    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("patient API stopped");
    Ok(())
}

async fn shutdown_signal() {
    shutdown_on(signal::ctrl_c()).await
}

/// Resolve once `signal` fires. If listening fails, log it and never resolve,
/// so the server keeps running until the process is killed.
async fn shutdown_on(signal: impl Future<Output = io::Result<()>>) {
    if let Err(err) = signal.await {
        error!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
