//! Admin user management handlers
//!
//! Every route here sits behind the admin scope requirement applied in the
//! router.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::auth::models::{
    CreateUserRequest, NewUser, ReplaceUserRequest, UpdateUserRequest, UserPatch, UserPublic,
};
use crate::auth::password::hash_password;
use crate::error::AppError;
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// List every user's public projection.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.users().list().await?;
    let result: Vec<UserPublic> = users.iter().map(|u| u.to_public()).collect();

    Ok(Json(result))
}

/// Create a user with explicit account flags.
///
/// Integrity violations, duplicate email included, are reported generically
/// on this path, unlike the register endpoint's dedicated failure kind.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidatedJson(body): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .users()
        .create(NewUser {
            password: hash_password(&body.password, &state.jwt.secret),
            email: body.email,
            is_active: body.is_active,
            is_superuser: body.is_superuser,
            confirmed: body.confirmed,
        })
        .await
        .map_err(|err| AppError::BadRequest(err.to_string()))?;

    Ok((StatusCode::CREATED, Json(user.to_public())))
}

/// Fetch a user by id.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.users().find_by_id(id).await?;

    Ok(Json(user.to_public()))
}

/// Replace every mutable field of a user.
pub async fn replace_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<ReplaceUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .users()
        .replace(
            id,
            NewUser {
                password: hash_password(&body.password, &state.jwt.secret),
                email: body.email,
                is_active: body.is_active,
                is_superuser: body.is_superuser,
                confirmed: body.confirmed,
            },
        )
        .await?;

    Ok(Json(user.to_public()))
}

/// Update a subset of a user's fields.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let patch = UserPatch {
        email: body.email,
        password: body
            .password
            .map(|p| hash_password(&p, &state.jwt.secret)),
        is_active: body.is_active,
        is_superuser: body.is_superuser,
        confirmed: body.confirmed,
    };

    let user = state.users().update_partial(id, patch).await?;

    Ok(Json(user.to_public()))
}

/// Delete a user by id.
///
/// Deleting the same id twice fails the second time with `RecordNotFound`.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.users().delete(id).await?;

    Ok(Json(user.to_public()))
}
