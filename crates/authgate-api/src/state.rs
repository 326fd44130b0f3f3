//! Application state management

use authgate_core::AppConfig;
use sqlx::PgPool;

use crate::auth::cache::TokenCache;
use crate::auth::jwt::JwtConfig;
use crate::auth::repository::UserRepository;

/// Application state shared across handlers
///
/// Built once at startup from the loaded configuration; nothing in here is
/// mutable after construction.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Token signing configuration; its secret also keys the password hasher
    pub jwt: JwtConfig,
    /// User store connection pool
    pub db: PgPool,
    /// Refresh-token liveness cache
    pub cache: TokenCache,
}

impl AppState {
    pub fn new(config: AppConfig, jwt: JwtConfig, db: PgPool, cache: TokenCache) -> Self {
        Self {
            config,
            jwt,
            db,
            cache,
        }
    }

    /// Per-request repository over the shared pool.
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.clone())
    }
}
