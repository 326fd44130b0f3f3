//! API error handling
//!
//! The closed error taxonomy raised by handlers and middleware stages, and
//! the outermost mapping of each kind onto an HTTP status code. No handler
//! catches and suppresses; everything propagates here and renders as
//! `{"message": "<KindName>: <detail>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::cache::CacheError;
use crate::auth::jwt::TokenError;
use crate::auth::repository::RepositoryError;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Validation(String),
    PasswordsDontMatch(String),
    UserAlreadyExists(String),
    TokenInvalid(String),
    TokenExpired(String),
    Unauthorized(String),
    Forbidden(String),
    UserIsNotActivated(String),
    RecordNotFound(String),
    RefreshTokenNotFound(String),
    Internal(String),
}

impl AppError {
    /// Kind name rendered into the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BadRequest",
            AppError::Validation(_) => "ValidationError",
            AppError::PasswordsDontMatch(_) => "PasswordsDontMatch",
            AppError::UserAlreadyExists(_) => "UserAlreadyExists",
            AppError::TokenInvalid(_) => "TokenInvalid",
            AppError::TokenExpired(_) => "TokenExpired",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::UserIsNotActivated(_) => "UserIsNotActivated",
            AppError::RecordNotFound(_) => "RecordNotFound",
            AppError::RefreshTokenNotFound(_) => "RefreshTokenNotFound",
            AppError::Internal(_) => "InternalServerError",
        }
    }

    /// HTTP status for this kind.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_)
            | AppError::Validation(_)
            | AppError::PasswordsDontMatch(_)
            | AppError::UserAlreadyExists(_)
            | AppError::TokenInvalid(_)
            | AppError::TokenExpired(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) | AppError::UserIsNotActivated(_) => StatusCode::FORBIDDEN,
            AppError::RecordNotFound(_) | AppError::RefreshTokenNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::Validation(msg)
            | AppError::PasswordsDontMatch(msg)
            | AppError::UserAlreadyExists(msg)
            | AppError::TokenInvalid(msg)
            | AppError::TokenExpired(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::UserIsNotActivated(msg)
            | AppError::RecordNotFound(msg)
            | AppError::RefreshTokenNotFound(msg)
            | AppError::Internal(msg) => msg,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}: {}", self.kind(), self.detail());
        }

        let body = json!({
            "message": format!("{}: {}", self.kind(), self.detail()),
        });

        (status, Json(body)).into_response()
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AppError::TokenExpired("Signature has expired".to_string()),
            TokenError::InvalidSignature | TokenError::Invalid => {
                AppError::TokenInvalid(err.to_string())
            }
            TokenError::Encoding(_) | TokenError::SystemTime(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UserNotFound(msg) => AppError::RecordNotFound(msg),
            RepositoryError::EmailAlreadyExists => {
                AppError::UserAlreadyExists("User with this email already exists".to_string())
            }
            RepositoryError::Database(msg) => AppError::Internal(msg),
        }
    }
}

impl From<CacheError> for AppError {
    fn from(err: CacheError) -> Self {
        AppError::Internal(err.to_string())
    }
}
