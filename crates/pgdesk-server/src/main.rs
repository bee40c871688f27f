//! pgdesk API Server
//!
//! Local HTTP service the pgdesk desktop UI talks to. It listens on
//! loopback by default and proxies each request to the database the request
//! names.

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pgdesk_server::{
    config::{AppConfig, PoolConfig},
    router::build_router,
    state::AppState,
};

/// Initialize tracing/logging.
fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,pgdesk_server=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    // Logging settings live in the app config, so read it before tracing is up
    let app_config = AppConfig::from_env();
    init_tracing(app_config.as_ref().map(|c| c.log_json).unwrap_or(false));

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting pgdesk API"
    );

    let app_config = app_config.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load app config, using defaults");
        AppConfig::default()
    });

    let pool_config = PoolConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load pool config, using defaults");
        PoolConfig::default()
    });

    tracing::info!(
        host = %app_config.host,
        port = app_config.port,
        data_dir = %app_config.data_dir().display(),
        row_limit = app_config.row_limit,
        max_connections = pool_config.max_connections,
        "Configuration loaded"
    );

    let addr: SocketAddr = app_config.bind_address().parse()?;
    let app = build_router(AppState::new(app_config, pool_config));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Server listening");

    // Run the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
