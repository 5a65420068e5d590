mod config;
mod detect;
mod error;
mod registry;
mod routes;
mod state;
mod translate;
mod types;

use anyhow::{Context, Result};
use std::future::Future;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use registry::ModelRegistry;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("universal_translator=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Loaded configuration (port={}, debug={}, model={})",
        config.port, config.debug, config.models.translation_model
    );

    // Weights are loaded once, off the async workers.
    let model_config = config.models.clone();
    let models = tokio::task::spawn_blocking(move || ModelRegistry::load(&model_config))
        .await
        .context("model loading task failed")?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;

    let app = routes::create_app(AppState::new(config, models));

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down - cleaning up resources");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM. The SIGTERM handler is installed when this
/// is called, not on first poll.
fn shutdown_signal() -> impl Future<Output = ()> {
    #[cfg(unix)]
    let terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate());

    async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async move {
            match terminate {
                Ok(mut stream) => {
                    stream.recv().await;
                }
                Err(e) => {
                    tracing::error!("Failed to listen for SIGTERM: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl-C"),
            _ = terminate => info!("Received SIGTERM"),
        }
    }
}
