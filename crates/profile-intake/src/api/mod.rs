//! HTTP API for the profile intake service.

mod handlers;

pub use handlers::*;

use crate::profiles::ProfileBook;
use axum::{routing::get, Router};
use snapshot_store::Store;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Stored profiles
    pub book: Arc<RwLock<ProfileBook>>,
    /// Persistent storage backend
    pub store: Arc<Store>,
    /// Reject profiles whose email is already on file
    pub unique_email: bool,
}

impl AppState {
    pub fn new(book: ProfileBook, store: Store) -> Self {
        Self {
            book: Arc::new(RwLock::new(book)),
            store: Arc::new(store),
            unique_email: false,
        }
    }

    pub fn with_unique_email(mut self, unique_email: bool) -> Self {
        self.unique_email = unique_email;
        self
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/students",
            get(handlers::list_students).post(handlers::create_student),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
