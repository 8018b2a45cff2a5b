//! Vehicle Combat relay server
//!
//! Entry point for the multiplayer room relay. It handles:
//! - WebSocket connections carrying pose, shot, hit and reload messages
//! - HTTP endpoints for health and the vehicle catalog

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vehicle_combat::app::AppState;
use vehicle_combat::config::Config;
use vehicle_combat::game::VehicleCatalog;
use vehicle_combat::http::build_router;
use vehicle_combat::util::time::init_server_time;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    init_tracing(&config.log_level);
    init_server_time();

    info!(
        addr = %config.server_addr,
        room_max_clients = config.room_max_clients,
        "Starting Vehicle Combat relay server"
    );

    // A bad catalog never reaches a room
    let catalog = load_catalog(&config)?;
    info!(vehicles = catalog.len(), "Vehicle catalog loaded");

    let addr = config.server_addr;
    let router = build_router(AppState::new(config, catalog));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    info!("Relay listening on ws://{}/ws (health at http://{}/health)", addr, addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn load_catalog(config: &Config) -> anyhow::Result<VehicleCatalog> {
    match &config.vehicle_catalog {
        Some(path) => VehicleCatalog::load(path)
            .with_context(|| format!("loading vehicle catalog from {}", path.display())),
        None => VehicleCatalog::builtin().context("validating built-in vehicle roster"),
    }
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "ctrl_c",
        _ = terminate => "terminate",
    };
    info!(signal, "Shutdown requested, draining connections");
}
