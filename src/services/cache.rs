use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::CacheSettings;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Two-tier cache for match responses
///
/// L1 is an in-process moka cache, L2 is Redis shared across instances.
/// Both tiers expire entries after the configured TTL. Values are stored
/// as JSON so either tier can serve any response type.
pub struct CacheManager {
    redis: Arc<Mutex<ConnectionManager>>,
    local: moka::future::Cache<String, Arc<str>>,
    ttl: Duration,
}

impl CacheManager {
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;
        let ttl = Duration::from_secs(ttl_secs);

        let local = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(ttl)
            .build();

        Ok(Self {
            redis: Arc::new(Mutex::new(redis)),
            local,
            ttl,
        })
    }

    pub async fn from_settings(settings: &CacheSettings) -> Result<Self, CacheError> {
        tracing::info!(
            "Connecting to Redis cache (L1 size {}, TTL {}s)",
            settings.l1_cache_size,
            settings.ttl_secs
        );
        Self::new(&settings.redis_url, settings.l1_cache_size, settings.ttl_secs).await
    }

    /// Look a key up in L1, then L2. An L2 hit is promoted into L1.
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: DeserializeOwned,
    {
        if let Some(json) = self.local.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_str(&json)?);
        }

        let remote: Option<String> = {
            let mut conn = self.redis.lock().await;
            redis::cmd("GET").arg(key).query_async(&mut *conn).await?
        };

        match remote {
            Some(json) => {
                tracing::trace!("L2 cache hit: {}", key);
                let value = serde_json::from_str(&json)?;
                self.local.insert(key.to_string(), Arc::from(json)).await;
                Ok(value)
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Err(CacheError::CacheMiss(key.to_string()))
            }
        }
    }

    /// Like `get`, but a miss is `None` rather than an error
    pub async fn lookup<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned,
    {
        match self.get(key).await {
            Ok(value) => Ok(Some(value)),
            Err(CacheError::CacheMiss(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Store a value in both tiers
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;

        {
            let mut conn = self.redis.lock().await;
            redis::cmd("SETEX")
                .arg(key)
                .arg(self.ttl.as_secs())
                .arg(&json)
                .query_async::<()>(&mut *conn)
                .await?;
        }

        self.local.insert(key.to_string(), Arc::from(json)).await;
        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.local.invalidate(key).await;
        let mut conn = self.redis.lock().await;
        redis::cmd("DEL").arg(key).query_async::<()>(&mut *conn).await?;
        Ok(())
    }

    /// Drop cached match lists touched by a property/buyer pair
    pub async fn invalidate_matches(&self, property_id: i64, buyer_id: i64) -> Result<(), CacheError> {
        self.delete(&CacheKey::property_matches(property_id)).await?;
        self.delete(&CacheKey::buyer_matches(buyer_id)).await?;

        tracing::debug!(
            "Invalidated cached matches for property {} and buyer {}",
            property_id,
            buyer_id
        );
        Ok(())
    }

    /// Drop every cached buyer view in both tiers.
    ///
    /// Needed when a property leaves (or re-enters) the matchable pool, since
    /// any buyer's list may include it.
    pub async fn invalidate_buyer_views(&self) -> Result<usize, CacheError> {
        let local_keys: Vec<Arc<String>> = self
            .local
            .iter()
            .filter(|(key, _)| key.starts_with(CacheKey::BUYER_MATCHES_PREFIX))
            .map(|(key, _)| key)
            .collect();
        for key in &local_keys {
            self.local.invalidate(key.as_str()).await;
        }

        let pattern = format!("{}*", CacheKey::BUYER_MATCHES_PREFIX);
        let mut removed = 0;
        let mut conn = self.redis.lock().await;
        let mut cursor: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut *conn)
                .await?;

            if !keys.is_empty() {
                removed += keys.len();
                redis::cmd("DEL").arg(&keys).query_async::<()>(&mut *conn).await?;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        tracing::debug!(
            "Invalidated cached buyer views ({} local, {} remote)",
            local_keys.len(),
            removed
        );
        Ok(removed)
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    pub const BUYER_MATCHES_PREFIX: &'static str = "matches:buyer:";

    /// Admin view: buyers matched to a property
    pub fn property_matches(property_id: i64) -> String {
        format!("matches:property:{}", property_id)
    }

    /// Buyer view: properties matched to a buy box
    pub fn buyer_matches(buyer_id: i64) -> String {
        format!("{}{}", Self::BUYER_MATCHES_PREFIX, buyer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_cache_set_get() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");

        let key = CacheKey::property_matches(99);
        let value = "cached payload".to_string();

        cache.set(&key, &value).await.unwrap();
        let result: String = cache.get(&key).await.unwrap();
        assert_eq!(result, value);

        cache.delete(&key).await.unwrap();
        assert!(cache.lookup::<String>(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_invalidate_matches() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");

        cache.set(&CacheKey::property_matches(1), &vec![1, 2, 3]).await.unwrap();
        cache.set(&CacheKey::buyer_matches(2), &vec![4]).await.unwrap();

        cache.invalidate_matches(1, 2).await.unwrap();

        assert!(matches!(
            cache.get::<Vec<i32>>(&CacheKey::property_matches(1)).await,
            Err(CacheError::CacheMiss(_))
        ));
        assert!(cache.lookup::<Vec<i32>>(&CacheKey::buyer_matches(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_invalidate_buyer_views_keeps_property_views() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 1000, 60)
            .await
            .expect("Failed to create cache");

        cache.set(&CacheKey::buyer_matches(1), &vec![10]).await.unwrap();
        cache.set(&CacheKey::buyer_matches(2), &vec![10, 11]).await.unwrap();
        cache.set(&CacheKey::property_matches(3), &vec![1, 2]).await.unwrap();

        let removed = cache.invalidate_buyer_views().await.unwrap();
        assert!(removed >= 2);

        assert!(cache.lookup::<Vec<i32>>(&CacheKey::buyer_matches(1)).await.unwrap().is_none());
        assert!(cache.lookup::<Vec<i32>>(&CacheKey::buyer_matches(2)).await.unwrap().is_none());
        assert_eq!(
            cache.get::<Vec<i32>>(&CacheKey::property_matches(3)).await.unwrap(),
            vec![1, 2]
        );

        cache.delete(&CacheKey::property_matches(3)).await.unwrap();
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::property_matches(42), "matches:property:42");
        assert_eq!(CacheKey::buyer_matches(7), "matches:buyer:7");
        assert_ne!(CacheKey::property_matches(7), CacheKey::buyer_matches(7));
        assert!(CacheKey::buyer_matches(7).starts_with(CacheKey::BUYER_MATCHES_PREFIX));
        assert!(!CacheKey::property_matches(7).starts_with(CacheKey::BUYER_MATCHES_PREFIX));
    }
}
