//! Token issuance, validation, and rotation
//!
//! Signs access/refresh token pairs with a symmetric HMAC key. The two
//! tokens of a pair share their base claims and jti and differ only in
//! `token_type` and expiry.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::models::User;

/// Token type discriminator embedded in every claim set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    AccessToken,
    RefreshToken,
}

/// Claim set carried by both tokens of a pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Store-assigned user id.
    pub user_id: i32,
    /// User's email address at issuance time.
    pub email: String,
    /// Fresh random identifier minted at every issuance, never reused.
    pub jti: String,
    /// "admin" iff the issuing user was a superuser at issuance time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    pub token_type: TokenType,
    /// Absolute expiry timestamp; absent on rotated refresh tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

impl Claims {
    /// Match-any scope check over whitespace-separated scope values.
    pub fn has_scope(&self, required: &str) -> bool {
        self.scope
            .as_deref()
            .map(|s| s.split_whitespace().any(|v| v == required))
            .unwrap_or(false)
    }
}

/// Signed access/refresh token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token generation and validation errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid token")]
    Invalid,

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("System time error: {0}")]
    SystemTime(#[from] std::time::SystemTimeError),
}

/// Signing configuration
///
/// The secret doubles as keying material for the password hasher, so
/// rotating it invalidates stored passwords as well as outstanding tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing
    pub secret: String,
    /// Signing algorithm
    pub algorithm: Algorithm,
    /// Access token lifetime in seconds
    pub access_ttl_secs: u64,
    /// Refresh token lifetime in seconds; also the cache entry TTL
    pub refresh_ttl_secs: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "test-secret-key-for-testing".to_string(),
            algorithm: Algorithm::HS256,
            access_ttl_secs: 300,
            refresh_ttl_secs: 86_400,
        }
    }
}

impl JwtConfig {
    /// Create a new signing configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            secret: std::env::var("SECRET_KEY")
                .unwrap_or_else(|_| "test-secret-key-for-testing".to_string()),
            algorithm: std::env::var("JWT_ALGORITHM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(Algorithm::HS256),
            access_ttl_secs: std::env::var("JWT_EXP_ACCESS_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            refresh_ttl_secs: std::env::var("JWT_EXP_REFRESH_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400),
        }
    }
}

fn now_secs() -> Result<u64, TokenError> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

fn sign(config: &JwtConfig, claims: &Claims) -> Result<String, TokenError> {
    encode(
        &Header::new(config.algorithm),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(TokenError::Encoding)
}

/// Issue a signed token pair for an authenticated user.
///
/// Both tokens share a freshly minted jti and base claims; the access token
/// gets the short TTL, the refresh token the long one. Registering the
/// refresh token in the liveness cache is the caller's responsibility.
pub fn issue_token_pair(config: &JwtConfig, user: &User) -> Result<TokenPair, TokenError> {
    let now = now_secs()?;
    let base = Claims {
        user_id: user.id,
        email: user.email.clone(),
        jti: Uuid::new_v4().simple().to_string(),
        scope: user.is_superuser.then(|| "admin".to_string()),
        token_type: TokenType::AccessToken,
        exp: None,
    };

    let access = Claims {
        exp: Some(now + config.access_ttl_secs),
        ..base.clone()
    };
    let refresh = Claims {
        token_type: TokenType::RefreshToken,
        exp: Some(now + config.refresh_ttl_secs),
        ..base
    };

    Ok(TokenPair {
        access_token: sign(config, &access)?,
        refresh_token: sign(config, &refresh)?,
    })
}

/// Verify a token's signature and expiry and extract its claims.
///
/// Expiry is enforced whenever the claim is present; rotated refresh tokens
/// carry no exp claim and decode at any age.
pub fn decode_token(config: &JwtConfig, token: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(config.algorithm);
    validation.required_spec_claims.clear();

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Invalid,
    })?;

    Ok(token_data.claims)
}

/// Rotate a validated, still-cached refresh token into a new pair.
///
/// A new jti is minted for the pair. The access token gets a fresh short
/// expiry; the refresh token carries the old claims verbatim with no exp
/// claim at all.
pub fn rotate_token_pair(config: &JwtConfig, old: &Claims) -> Result<TokenPair, TokenError> {
    let now = now_secs()?;
    let jti = Uuid::new_v4().simple().to_string();

    let access = Claims {
        jti: jti.clone(),
        token_type: TokenType::AccessToken,
        exp: Some(now + config.access_ttl_secs),
        ..old.clone()
    };
    let refresh = Claims {
        jti,
        token_type: TokenType::RefreshToken,
        exp: None,
        ..old.clone()
    };

    Ok(TokenPair {
        access_token: sign(config, &access)?,
        refresh_token: sign(config, &refresh)?,
    })
}
