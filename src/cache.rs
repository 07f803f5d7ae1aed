// src/cache.rs

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::errors::AppError;

/// Key-value store with per-key expiration.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns `None` for missing or expired keys.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;

    /// Overwrites any previous value and restarts its TTL.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), AppError>;

    async fn clear_all(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
struct CachedValue {
    bytes: Arc<[u8]>,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, CachedValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache backed by moka.
pub struct MokaCacheStore {
    entries: Cache<String, CachedValue>,
}

impl MokaCacheStore {
    pub fn new(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(PerEntryTtl)
            .build();
        MokaCacheStore { entries }
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self.entries.get(key).await.map(|v| v.bytes.to_vec()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), AppError> {
        let cached = CachedValue {
            bytes: Arc::from(value),
            ttl,
        };
        self.entries.insert(key.to_string(), cached).await;
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), AppError> {
        self.entries.invalidate_all();
        tracing::info!("Cache cleared successfully");
        Ok(())
    }
}
