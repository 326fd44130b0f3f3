//! User store over Postgres
//!
//! Data access for the `users` table (id serial, email unique, password,
//! is_active, is_superuser, confirmed, created timestamptz default now(),
//! last_login timestamptz null). Uniqueness violations surface as
//! `RepositoryError::EmailAlreadyExists`; callers translate them into the
//! endpoint-specific failure kind.

use sqlx::PgPool;
use thiserror::Error;

use super::models::{NewUser, User, UserPatch};

const USER_COLUMNS: &str = "id, email, password, is_active, is_superuser, confirmed, created, last_login";

/// Repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0}")]
    UserNotFound(String),

    #[error("User with this email already exists")]
    EmailAlreadyExists,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return RepositoryError::EmailAlreadyExists;
            }
        }
        RepositoryError::Database(err.to_string())
    }
}

/// User repository over the shared connection pool
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user; `id` and `created` are assigned by the store.
    pub async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password, is_active, is_superuser, confirmed) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.is_active)
        .bind(user.is_superuser)
        .bind(user.confirmed)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            RepositoryError::UserNotFound(format!("User with email={email} is not found"))
        })
    }

    /// Find a user by id.
    pub async fn find_by_id(&self, id: i32) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                RepositoryError::UserNotFound(format!("User with id={id} is not found"))
            })
    }

    /// List all users.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(&self.pool)
                .await?,
        )
    }

    /// Replace every mutable field of a user.
    pub async fn replace(&self, id: i32, user: NewUser) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET email = $2, password = $3, is_active = $4, is_superuser = $5, confirmed = $6 \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.is_active)
        .bind(user.is_superuser)
        .bind(user.confirmed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::UserNotFound(format!("User with id={id} is not found")))
    }

    /// Update the provided fields of a user, leaving the rest untouched.
    pub async fn update_partial(&self, id: i32, patch: UserPatch) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users \
             SET email = COALESCE($2, email), \
                 password = COALESCE($3, password), \
                 is_active = COALESCE($4, is_active), \
                 is_superuser = COALESCE($5, is_superuser), \
                 confirmed = COALESCE($6, confirmed) \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.email)
        .bind(patch.password)
        .bind(patch.is_active)
        .bind(patch.is_superuser)
        .bind(patch.confirmed)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::UserNotFound(format!("User with id={id} is not found")))
    }

    /// Delete a user and return the removed row. A second delete on the
    /// same id fails with `UserNotFound`.
    pub async fn delete(&self, id: i32) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::UserNotFound(format!("User with id={id} is not found")))
    }
}
