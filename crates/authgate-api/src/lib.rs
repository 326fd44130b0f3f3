//! Authgate API - authentication REST service
//!
//! User registration, login, access/refresh token issuance and rotation,
//! and admin-gated user management.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
