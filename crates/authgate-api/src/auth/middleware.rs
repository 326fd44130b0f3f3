//! Request authentication and authorization stages
//!
//! Stage A (`attach_claims`) optionally decodes a bearer token and attaches
//! the claim set to the request; it never rejects on its own. Stage B
//! (`require_scope`) fails closed for routes that declare a scope
//! requirement. Failures from either stage propagate untouched to the
//! uniform error mapping.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::jwt::{decode_token, Claims};
use crate::error::AppError;
use crate::state::AppState;

/// Optional bearer authentication.
///
/// A missing header, malformed header, bad signature, or expired token all
/// leave the request unauthenticated; endpoints that require credentials
/// fail closed in `require_scope`.
pub async fn attach_claims(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(header_value) = request.headers().get(header::AUTHORIZATION) {
        if let Ok(value) = header_value.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                match decode_token(&state.jwt, token) {
                    Ok(claims) => {
                        request.extensions_mut().insert(claims);
                    }
                    Err(err) => {
                        tracing::debug!("discarding bearer token: {err}");
                    }
                }
            }
        }
    }

    next.run(request).await
}

type ScopeMiddlewareFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>;

/// Route-layer factory requiring `scope` to appear in the attached claims.
///
/// Requests with no attached claims are rejected as unauthorized; requests
/// whose claims do not satisfy the scope are rejected as forbidden.
pub fn require_scope(
    scope: &'static str,
) -> impl Fn(Request<Body>, Next) -> ScopeMiddlewareFuture + Clone {
    move |request: Request<Body>, next: Next| {
        Box::pin(async move {
            let claims = request
                .extensions()
                .get::<Claims>()
                .ok_or_else(|| AppError::Unauthorized("Authorization required".to_string()))?;

            if !claims.has_scope(scope) {
                return Err(AppError::Forbidden("Insufficient scope".to_string()));
            }

            Ok(next.run(request).await)
        })
    }
}
