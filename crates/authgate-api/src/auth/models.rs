//! User records, public projections, and request schemas
//!
//! The `User` row maps to the `users` table. Request bodies are validated
//! with `validator` derives; responses go through the explicit `UserPublic`
//! projection so the password hash can never leak into a serialized body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// User account row from the `users` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Store-assigned identifier, immutable.
    pub id: i32,

    /// Unique email address, used for login.
    pub email: String,

    /// Opaque password hash; never serialized in API responses.
    #[serde(skip_serializing)]
    pub password: String,

    pub is_active: bool,
    pub is_superuser: bool,
    pub confirmed: bool,

    /// Set once by the store at creation.
    pub created: DateTime<Utc>,

    /// Modeled but not written by any handler.
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Convert to the public representation safe for API responses.
    pub fn to_public(&self) -> UserPublic {
        UserPublic {
            id: self.id,
            email: self.email.clone(),
            is_active: self.is_active,
            is_superuser: self.is_superuser,
            confirmed: self.confirmed,
            created: self.created,
            last_login: self.last_login,
        }
    }
}

/// Public user representation (safe for API responses).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: i32,
    pub email: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub confirmed: bool,
    pub created: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Values for a user insert; `id` and `created` are store-assigned.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub confirmed: bool,
}

/// Partial update values; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
    pub confirmed: Option<bool>,
}

/// Registration request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 100))]
    pub password: String,
    #[validate(length(max = 100))]
    pub password2: String,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 100))]
    pub password: String,
}

/// Refresh request body; the refresh token itself is the credential.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Admin user-creation body; unset flags default to false.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 100))]
    pub password: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub confirmed: bool,
}

/// Full-update body; every field is required.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReplaceUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 100))]
    pub password: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub confirmed: bool,
}

/// Partial-update body over the same field subset.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 100))]
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
    pub confirmed: Option<bool>,
}
