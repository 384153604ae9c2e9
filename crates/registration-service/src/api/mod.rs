//! HTTP API for the registration service.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::logging_middleware;
pub use types::*;

use crate::config::VerificationConfig;
use crate::registry::Registry;
use crate::verification::{LoggingDispatcher, VerificationDispatcher};
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use snapshot_store::Store;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Identity registry
    pub registry: Arc<RwLock<Registry>>,
    /// Persistent storage backend
    pub store: Arc<Store>,
    /// Verification notice delivery
    pub dispatcher: Arc<dyn VerificationDispatcher>,
    /// Verification policy
    pub verification: VerificationConfig,
}

impl AppState {
    /// Create new application state with tokenless verification and a
    /// logging-only dispatcher.
    pub fn new(registry: Registry, store: Store) -> Self {
        Self {
            registry: Arc::new(RwLock::new(registry)),
            store: Arc::new(store),
            dispatcher: Arc::new(LoggingDispatcher),
            verification: VerificationConfig::default(),
        }
    }

    /// Replace the verification notice dispatcher.
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn VerificationDispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Replace the verification policy.
    pub fn with_verification(mut self, verification: VerificationConfig) -> Self {
        self.verification = verification;
        self
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/register", post(handlers::register))
        .route("/api/verify", post(handlers::verify))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
