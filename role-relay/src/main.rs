//! Role Relay Web Server.
//!
//! This binary provides a thin web server that:
//! - Receives Discord interaction webhooks and verifies their signatures
//! - Runs the OAuth2 Linked Roles flow and pushes role-connection metadata
//!
//! No state survives a request.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rolerelay::{router, AppState, Config, PlatformClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("web_server_starting");

    // Load configuration
    let config = Config::from_env();
    info!(
        port = config.port,
        api_base_url = %config.api_base_url,
        platform_name = %config.platform_name,
        public_key_configured = !config.public_key.is_empty(),
        client_id_configured = !config.client_id.is_empty(),
        client_secret_configured = !config.client_secret.is_empty(),
        redirect_uri_configured = !config.redirect_uri.is_empty(),
        "config_loaded"
    );

    // Shared HTTP client for the platform API
    let http = Client::builder()
        .build()
        .context("Failed to create HTTP client")?;
    let platform = PlatformClient::new(http, &config.api_base_url)
        .context("Invalid API_BASE_URL")?;

    let port = config.port;
    let app = router(AppState::new(config, platform));

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "web_server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("web_server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "ctrl_c_handler_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "sigterm_handler_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("web_server_shutting_down");
}
