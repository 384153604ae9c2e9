//! HTTP request handlers.

use super::types::{HealthResponse, MessageResponse, RegisterRequest, VerifyRequest};
use super::AppState;
use crate::error::RegistrationError;
use crate::registry::{hash_password, normalize_identifier, IdentityRecord};
use crate::verification::{generate_code, VerificationNotice};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use chrono::Utc;
use secrecy::ExposeSecret;
use tracing::{info, warn};

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let registry = state.registry.read().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        record_count: registry.count(),
        verified_count: registry.count_verified(),
        persistent: state.store.is_persistent(),
    })
}

/// Register a new identity.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), RegistrationError> {
    let Json(request) = payload?;

    let email = normalize_identifier(request.email);
    let phone = normalize_identifier(request.phone);
    if email.is_none() && phone.is_none() {
        return Err(RegistrationError::MissingIdentifier);
    }

    let password = request
        .password
        .filter(|p| !p.expose_secret().is_empty())
        .ok_or(RegistrationError::MissingPassword)?;

    info!(email = ?email, phone = ?phone, "Registration request received");

    // Early exit for obvious duplicates before paying for the hash;
    // `Registry::insert` re-checks under the write lock.
    state
        .registry
        .read()
        .await
        .check_available(email.as_deref(), phone.as_deref())?;

    let credential_hash =
        tokio::task::spawn_blocking(move || hash_password(password.expose_secret())).await??;

    let mut record = IdentityRecord::new_pending(email, phone, credential_hash);
    let code = state.verification.require_code.then(|| {
        let code = generate_code();
        record.issue_code(&code, state.verification.code_ttl);
        code
    });
    let notice = VerificationNotice::for_record(&record, code);
    let id = record.id;

    {
        let mut registry = state.registry.write().await;
        if let Err(e) = registry.insert(record) {
            warn!(error = %e, "Registration rejected at insert");
            return Err(e);
        }

        if let Err(e) = state.store.save(&*registry).await {
            registry.remove(id);
            return Err(e.into());
        }
    }

    info!(%id, "Identity registered, verification pending");

    if let Some(notice) = notice {
        if let Err(e) = state.dispatcher.dispatch(&notice).await {
            warn!(%id, error = %e, "Failed to dispatch verification notice");
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Registered (verification pending).")),
    ))
}

/// Mark an identity as verified.
pub async fn verify(
    State(state): State<AppState>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, RegistrationError> {
    let Json(request) = payload?;

    let identifier =
        normalize_identifier(request.identifier()).ok_or(RegistrationError::NotFound)?;
    info!(identifier = %identifier, "Verification request received");

    let mut registry = state.registry.write().await;
    let record = registry
        .find_mut(&identifier)
        .ok_or(RegistrationError::NotFound)?;

    if record.verified {
        info!(id = %record.id, "Identity already verified");
        return Ok(Json(MessageResponse::new("User verified")));
    }

    let now = Utc::now();
    if state.verification.require_code && !record.code_matches(request.code(), now) {
        warn!(id = %record.id, "Verification code rejected");

        if !record.code_expired(now) {
            return Err(RegistrationError::InvalidCode);
        }

        // Replace a stale or missing code so the identity can still be verified
        let previous = record.clone();
        let code = generate_code();
        record.issue_code(&code, state.verification.code_ttl);
        let notice = VerificationNotice::for_record(record, Some(code));

        if let Err(e) = state.store.save(&*registry).await {
            registry.restore(previous);
            return Err(e.into());
        }
        drop(registry);

        info!(id = %previous.id, "Verification code re-issued");
        if let Some(notice) = notice {
            if let Err(e) = state.dispatcher.dispatch(&notice).await {
                warn!(id = %previous.id, error = %e, "Failed to dispatch verification notice");
            }
        }
        return Err(RegistrationError::InvalidCode);
    }

    let previous = record.clone();
    record.mark_verified(now);

    if let Err(e) = state.store.save(&*registry).await {
        registry.restore(previous);
        return Err(e.into());
    }

    info!(id = %previous.id, "Identity verified");

    Ok(Json(MessageResponse::new("User verified")))
}
