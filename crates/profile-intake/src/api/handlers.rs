//! HTTP request handlers.

use super::AppState;
use crate::error::ProfileError;
use crate::profiles::{NewStudentProfile, StudentProfile};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub record_count: usize,
    pub persistent: bool,
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        record_count: state.book.read().await.count(),
        persistent: state.store.is_persistent(),
    })
}

/// Validate and store a new student profile.
pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<NewStudentProfile>, JsonRejection>,
) -> Result<(StatusCode, Json<StudentProfile>), ProfileError> {
    let Json(request) = payload?;

    let profile = request.validate(Utc::now().date_naive()).map_err(|errors| {
        debug!(
            fields = ?errors.fields().collect::<Vec<_>>(),
            "Profile rejected by validation"
        );
        ProfileError::from(errors)
    })?;

    let mut book = state.book.write().await;

    if let Some(existing) = book.find_by_email(&profile.email) {
        if state.unique_email {
            warn!(existing_id = existing.id, "Profile email already on file");
            return Err(ProfileError::DuplicateEmail);
        }
        debug!(existing_id = existing.id, "Storing profile with an email already on file");
    }

    let stored = book.add(profile)?;

    if let Err(e) = state.store.save(&*book).await {
        book.remove(stored.id);
        return Err(e.into());
    }

    info!(id = stored.id, "Student profile created");

    Ok((StatusCode::CREATED, Json(stored)))
}

/// List every stored profile in creation order.
pub async fn list_students(State(state): State<AppState>) -> Json<Vec<StudentProfile>> {
    Json(state.book.read().await.list().to_vec())
}
