//! Authentication and authorization module
//!
//! This module provides the token lifecycle and request pipeline:
//! - Signed access/refresh token issuance, validation, and rotation
//! - Deterministic password hashing keyed with the server secret
//! - Middleware for optional bearer authentication and scope checks
//! - User store repository and refresh-token liveness cache

pub mod cache;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;

pub use cache::{CacheError, TokenCache, LIVENESS_MARKER};
pub use jwt::{
    decode_token, issue_token_pair, rotate_token_pair, Claims, JwtConfig, TokenError, TokenPair,
    TokenType,
};
pub use middleware::{attach_claims, require_scope};
pub use models::{
    CreateUserRequest, LoginRequest, NewUser, RefreshRequest, RegisterRequest, ReplaceUserRequest,
    UpdateUserRequest, User, UserPatch, UserPublic,
};
pub use password::hash_password;
pub use repository::{RepositoryError, UserRepository};
