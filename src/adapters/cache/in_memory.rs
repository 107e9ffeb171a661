//! In-memory plan cache with TTL expiry and a bounded entry count.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;

use crate::config::CacheConfig;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{PlanCache, PlanCacheKey};

#[derive(Debug, Clone)]
struct CacheEntry {
    value: JsonValue,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: JsonValue, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Per-process cache keyed by [`PlanCacheKey`].
///
/// When full, expired entries are purged first; if none expired, the entry
/// closest to expiry is evicted.
#[derive(Debug)]
pub struct InMemoryPlanCache {
    store: RwLock<HashMap<PlanCacheKey, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
    enabled: bool,
}

impl InMemoryPlanCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
            enabled: true,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        if config.enabled {
            Self::new(config.ttl(), config.max_entries)
        } else {
            Self::disabled()
        }
    }

    /// A cache that never stores anything; every read is a miss.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(Duration::ZERO, 1)
        }
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn make_room(store: &mut HashMap<PlanCacheKey, CacheEntry>, max_entries: usize) {
        if store.len() < max_entries {
            return;
        }
        store.retain(|_, entry| !entry.is_expired());
        while store.len() >= max_entries {
            let victim = store
                .iter()
                .min_by_key(|(_, entry)| entry.expires_at)
                .map(|(key, _)| key.clone());
            match victim {
                Some(key) => {
                    store.remove(&key);
                }
                None => break,
            }
        }
    }
}

#[async_trait]
impl PlanCache for InMemoryPlanCache {
    async fn get(&self, key: &PlanCacheKey) -> Result<Option<JsonValue>, DomainError> {
        if !self.enabled {
            return Ok(None);
        }
        let mut store = self.store.write().await;
        match store.get(key) {
            Some(entry) if entry.is_expired() => {
                store.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn put(&self, key: PlanCacheKey, value: JsonValue) -> Result<(), DomainError> {
        if !self.enabled {
            return Ok(());
        }
        let mut store = self.store.write().await;
        if !store.contains_key(&key) {
            Self::make_room(&mut store, self.max_entries);
        }
        store.insert(key, CacheEntry::new(value, self.ttl));
        Ok(())
    }

    async fn invalidate_student(&self, student_id: &UserId) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|key, _| key.student_id != *student_id);
        let removed = before - store.len();
        drop(store);
        if removed > 0 {
            tracing::debug!(student_id = %student_id, removed, "Invalidated plan cache entries");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::MicrocycleId;
    use serde_json::json;

    fn student(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn stores_and_returns_values() {
        let cache = InMemoryPlanCache::new(Duration::from_secs(60), 10);
        let key = PlanCacheKey::visible_mesocycles(student("s-1"));

        cache.put(key.clone(), json!(["a"])).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(json!(["a"])));
    }

    #[tokio::test]
    async fn expired_entries_are_misses() {
        let cache = InMemoryPlanCache::new(Duration::ZERO, 10);
        let key = PlanCacheKey::visible_mesocycles(student("s-1"));

        cache.put(key.clone(), json!(1)).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn invalidate_student_drops_only_that_student() {
        let cache = InMemoryPlanCache::new(Duration::from_secs(60), 10);
        let week = MicrocycleId::new();
        cache
            .put(PlanCacheKey::visible_mesocycles(student("s-1")), json!(1))
            .await
            .unwrap();
        cache
            .put(PlanCacheKey::microcycle_metrics(student("s-1"), week), json!(2))
            .await
            .unwrap();
        let other = PlanCacheKey::visible_mesocycles(student("s-2"));
        cache.put(other.clone(), json!(3)).await.unwrap();

        cache.invalidate_student(&student("s-1")).await.unwrap();

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get(&other).await.unwrap(), Some(json!(3)));
    }

    #[tokio::test]
    async fn bounded_by_max_entries() {
        let cache = InMemoryPlanCache::new(Duration::from_secs(60), 2);
        for i in 0..5 {
            let key = PlanCacheKey::visible_mesocycles(student(&format!("s-{}", i)));
            cache.put(key, json!(i)).await.unwrap();
        }
        assert_eq!(cache.len().await, 2);
        let newest = PlanCacheKey::visible_mesocycles(student("s-4"));
        assert_eq!(cache.get(&newest).await.unwrap(), Some(json!(4)));
    }

    #[tokio::test]
    async fn disabled_cache_never_hits() {
        let cache = InMemoryPlanCache::disabled();
        let key = PlanCacheKey::visible_mesocycles(student("s-1"));
        cache.put(key.clone(), json!(1)).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), None);
    }
}
