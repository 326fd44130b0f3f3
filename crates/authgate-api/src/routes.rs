//! API route definitions
//!
//! The pipeline order is fixed: the error mapping renders any failure, the
//! optional authentication stage wraps every route, and the scope check is
//! applied per admin route group.

use crate::auth::middleware::{attach_claims, require_scope};
use crate::handlers::{auth, health, users};
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the full application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Public routes (no credentials required; the refresh token is its own
    // credential)
    let public_routes = Router::new()
        .route("/auth/v1/register", post(auth::register))
        .route("/auth/v1/login", post(auth::login))
        .route("/auth/v1/refresh", post(auth::refresh));

    // Admin routes (bearer token carrying the admin scope)
    let admin_routes = Router::new()
        .route(
            "/auth/v1/users",
            get(users::list_users).post(users::create_user),
        )
        .route(
            "/auth/v1/users/:id",
            get(users::get_user)
                .put(users::replace_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route_layer(middleware::from_fn(require_scope("admin")));

    Router::new()
        .route("/health", get(health::health))
        .merge(public_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.clone(), attach_claims))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
