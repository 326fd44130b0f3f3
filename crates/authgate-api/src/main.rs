//! Authgate API server
//!
//! Authentication REST service: registration, login, token refresh, and
//! admin user management.

use authgate_api::auth::cache::TokenCache;
use authgate_api::auth::jwt::JwtConfig;
use authgate_api::{create_router, AppState};
use authgate_core::AppConfig;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authgate_api=debug,tower_http=debug".into()),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    let jwt = JwtConfig::from_env();

    // Connect backends
    let db = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    let cache = TokenCache::from_url(&config.cache.url)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state and router
    let state = Arc::new(AppState::new(config, jwt, db, cache));
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("authgate API server starting on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
