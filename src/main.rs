use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use roomgate::api;
use roomgate::auth::TokenIssuer;
use roomgate::config::Config;
use roomgate::platform::{RoomService, TwirpRoomService};
use roomgate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }

    tracing::info!("Starting roomgate...");
    tracing::info!(
        host = %config.server_host,
        port = %config.server_port,
        production = config.production,
        password = if config.app_password.is_some() { "set" } else { "missing" },
        api_key = if config.platform_api_key.is_some() { "set" } else { "missing" },
        api_secret = if config.platform_api_secret.is_some() { "set" } else { "missing" },
        platform_url = config.platform_url.as_deref().unwrap_or("missing"),
        "Configuration loaded"
    );

    let (issuer, room_service) = match config.platform() {
        Some(platform) => {
            let service = TwirpRoomService::new(&config, &platform)?;
            tracing::info!(url = %service.base_url(), "Room service client created");
            let service: Arc<dyn RoomService> = Arc::new(service);
            (Some(TokenIssuer::new(&platform)), Some(service))
        }
        None => {
            tracing::warn!("Platform configuration missing; token and room endpoints will fail");
            (None, None)
        }
    };

    let state = AppState::new(config.clone(), issuer, room_service);

    // Build router
    let app = api::create_router(state).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    // Start server
    let addr: SocketAddr = config.server_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Handle shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down...");
        },
    }
}
