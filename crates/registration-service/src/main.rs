//! Registration service - Entry point.

use anyhow::{Context, Result};
use registration_service::{
    api::{create_router, AppState},
    config::Config,
    registry::Registry,
};
use snapshot_store::Store;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    init_logging(&config.log.level);

    info!("Starting registration service");

    let store = Store::open(&config.store.url).context("Failed to open identity store")?;
    if !store.is_persistent() {
        warn!("Using in-memory storage (data will be lost on restart)");
    }

    // Refuse to start on an unreadable snapshot rather than overwrite it
    let registry: Registry = store
        .load()
        .await
        .with_context(|| format!("Failed to load identity registry from {}", store))?;
    info!(
        "Loaded registry with {} records ({} verified)",
        registry.count(),
        registry.count_verified()
    );

    if config.verification.require_code {
        info!(ttl = ?config.verification.code_ttl, "One-time verification codes required");
    } else {
        warn!("Verification accepts a bare identifier; set VERIFICATION__REQUIRE_CODE=true to require a code");
    }

    let state = AppState::new(registry, store).with_verification(config.verification.clone());
    let app = create_router(state);

    let addr = SocketAddr::new(
        config
            .server
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid listen address: {}", config.server.listen_addr))?,
        config.server.port,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Registration service stopped");
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
