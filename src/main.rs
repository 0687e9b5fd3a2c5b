//! anvil - a satellite convection frame viewer server
//!
//! This is the main entry point for the anvil application.

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use anvil::handlers::{
    frame_handler, heartbeat_handler, legend_handler, overlay_handler, viewer_handler,
};
use anvil::{create_http_trace_layer, AppState, Config, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        e
    })?;

    anvil::init_tracing(&config.log_level);

    info!("Starting anvil v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let data_dir = config.data_dir().clone();
    if data_dir.is_dir() {
        info!("Serving frames from {:?}", data_dir);
    } else {
        // Frames load per request, so a missing archive is not fatal: every
        // timestamp simply resolves to "no data" until the mount appears.
        warn!(
            "Data directory {:?} does not exist; all frames will report no data",
            data_dir
        );
    }

    let state = AppState::new_shared(config.clone());

    // Build the router
    let app = Router::new()
        .route("/", get(viewer_handler))
        .route("/frame", get(frame_handler))
        .route("/overlay", get(overlay_handler))
        .route("/legend", get(legend_handler))
        .route("/heartbeat", get(heartbeat_handler))
        .layer(create_http_trace_layer())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Create the server address
    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .map_err(|e| anvil::AnvilError::Config {
                message: format!("Invalid host address: {}", e),
            })?,
        config.server.port,
    ));

    info!("Server listening on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anvil::AnvilError::Server {
            message: format!("Failed to bind to address: {}", e),
        })?;

    info!("Server is ready to accept connections");

    // Start the server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anvil::AnvilError::Server {
            message: format!("Server error: {}", e),
        })?;

    info!("Server has been gracefully shut down");
    Ok(())
}

/// Wait for a shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
