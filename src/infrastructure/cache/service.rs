//! Cache service trait, error type and typed helpers.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Key of a cached job detail payload.
pub fn job_key(job_id: i64) -> String {
    format!("job:{job_id}")
}

/// Key of the cached industry list used by search filters.
pub const INDUSTRIES_KEY: &str = "industries";

/// Trait for caching serialized read models.
///
/// Implementations must be thread-safe and degrade gracefully: a failing
/// backend behaves like an empty cache so requests fall back to the database.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached value for `key`.
    ///
    /// `Ok(None)` on cache miss or backend error (fail-open).
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`. `ttl_seconds = None` applies the
    /// implementation's default TTL.
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Removes a cached entry. Used when the underlying record changes.
    async fn invalidate(&self, key: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;
}

/// Reads and deserializes a JSON value. Undecodable entries count as misses.
pub async fn get_json<T: DeserializeOwned>(cache: &dyn CacheService, key: &str) -> Option<T> {
    let raw = cache.get(key).await.ok().flatten()?;

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "Discarding undecodable cache entry");
            None
        }
    }
}

/// Serializes and stores a JSON value, logging instead of failing.
pub async fn set_json<T: Serialize + ?Sized>(
    cache: &dyn CacheService,
    key: &str,
    value: &T,
    ttl_seconds: Option<u64>,
) {
    match serde_json::to_string(value) {
        Ok(raw) => {
            if let Err(e) = cache.set(key, &raw, ttl_seconds).await {
                warn!(key, error = %e, "Cache write failed");
            }
        }
        Err(e) => warn!(key, error = %e, "Failed to serialize cache entry"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::NullCache;

    #[test]
    fn test_job_key() {
        assert_eq!(job_key(42), "job:42");
    }

    #[tokio::test]
    async fn test_null_cache_always_misses() {
        let cache = NullCache::new();
        set_json(&cache, "k", &vec![1, 2, 3], None).await;
        let value: Option<Vec<i32>> = get_json(&cache, "k").await;
        assert!(value.is_none());
    }
}
