//! Registration, login, and token refresh handlers

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::auth::cache::LIVENESS_MARKER;
use crate::auth::jwt::{decode_token, issue_token_pair, rotate_token_pair};
use crate::auth::models::{LoginRequest, NewUser, RefreshRequest, RegisterRequest};
use crate::auth::password::hash_password;
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// Register a new user account.
///
/// Registration activates the account immediately; no separate confirmation
/// step is enforced at login.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if body.password != body.password2 {
        return Err(AppError::PasswordsDontMatch(
            "Fields password and password2 don't match".to_string(),
        ));
    }

    let user = state
        .users()
        .create(NewUser {
            password: hash_password(&body.password, &state.jwt.secret),
            email: body.email,
            is_active: true,
            is_superuser: false,
            confirmed: false,
        })
        .await?;

    tracing::info!(user_id = user.id, "registered new user");

    Ok(Json(user.to_public()))
}

/// Log in with email and password.
///
/// An unknown email and a wrong password yield the same `RecordNotFound`
/// failure, so the two cases cannot be told apart from the outside.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.users().find_by_email(&body.email).await?;

    if user.password != hash_password(&body.password, &state.jwt.secret) {
        return Err(AppError::RecordNotFound(format!(
            "User with email={} is not found",
            body.email
        )));
    }

    if !user.is_active {
        return Err(AppError::UserIsNotActivated(format!(
            "User with email={} is not activated",
            body.email
        )));
    }

    let pair = issue_token_pair(&state.jwt, &user)?;

    // The refresh token must be registered before the pair is returned,
    // otherwise it is unusable for refresh.
    state
        .cache
        .put(&pair.refresh_token, LIVENESS_MARKER, state.jwt.refresh_ttl_secs)
        .await?;

    tracing::debug!(user_id = user.id, "issued token pair");

    Ok(Json(pair))
}

/// Exchange a live refresh token for a new token pair.
///
/// Liveness is gated solely on the cache key. The old entry is left to
/// lapse by TTL and the rotated refresh token is not registered; rotation
/// neither evicts nor writes cache state.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<RefreshRequest>,
) -> Result<impl IntoResponse, AppError> {
    let live = state.cache.get(&body.refresh_token).await?;
    if live.is_none() {
        return Err(AppError::RefreshTokenNotFound(
            "Refresh token not found".to_string(),
        ));
    }

    let claims = decode_token(&state.jwt, &body.refresh_token)?;
    let pair = rotate_token_pair(&state.jwt, &claims)?;

    Ok(Json(pair))
}
