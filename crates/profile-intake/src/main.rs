//! Profile intake API - Entry point.

use anyhow::{Context, Result};
use profile_intake::{
    api::{create_router, AppState},
    config::Config,
    profiles::ProfileBook,
};
use snapshot_store::Store;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting profile intake API");

    let store = Store::open(&config.store.url).context("Failed to open profile store")?;
    if !store.is_persistent() {
        warn!("Using in-memory storage (data will be lost on restart)");
    }

    let book: ProfileBook = store
        .load()
        .await
        .with_context(|| format!("Failed to load profiles from {}", store))?;
    info!("Loaded {} student profiles", book.count());

    let state = AppState::new(book, store).with_unique_email(config.profiles.unique_email);
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
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
            } else {
                std::future::pending::<()>().await;
            }
        })
        .await
        .context("Server error")?;

    Ok(())
}
