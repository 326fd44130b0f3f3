//! Refresh-token liveness cache
//!
//! Key-value store mapping an issued refresh token's signed string to a
//! liveness marker with a TTL. Presence of the key is the sole proof of
//! refresh-token validity; entries are never deleted explicitly and lapse
//! by TTL alone.

use redis::AsyncCommands;
use thiserror::Error;

/// Value stored for every live refresh token; only the key's existence
/// matters.
pub const LIVENESS_MARKER: &str = "1";

/// Cache access errors
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache error: {0}")]
    Backend(#[from] redis::RedisError),
}

/// Client for the refresh-token liveness store.
///
/// Connections are acquired per operation; pooling and reconnection are the
/// client library's concern.
#[derive(Clone)]
pub struct TokenCache {
    client: redis::Client,
}

impl TokenCache {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    pub fn from_url(url: &str) -> Result<Self, CacheError> {
        Ok(Self {
            client: redis::Client::open(url)?,
        })
    }

    /// Unconditional upsert with expiry.
    pub async fn put(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;
        Ok(())
    }

    /// Look up a key; absence is a normal outcome signaling token
    /// invalidity, not an error.
    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn.get(key).await?)
    }
}
