//! Read-query cache
//!
//! Each query key owns a slot holding at most one in-flight fetch and its
//! outcome. Callers asking for the same key while a fetch is running wait on
//! that fetch instead of issuing their own request, and all of them receive
//! its outcome, success or failure. A successful result is served from the
//! slot until it goes stale; a failed slot is dropped so the next caller
//! starts a fresh fetch.

use super::error::ClientError;
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::trace;

/// Cache key: endpoint path plus its query parameters in sorted order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    path: String,
    params: BTreeMap<String, String>,
}

impl QueryKey {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    pub fn params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        for (name, value) in params {
            self.params.insert(name.into(), value.to_string());
        }
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{name}={value}")?;
        }
        Ok(())
    }
}

struct Cached {
    value: Value,
    fetched_at: DateTime<Utc>,
}

impl Cached {
    fn is_fresh(&self, stale_time: Duration) -> bool {
        let stale_time = TimeDelta::from_std(stale_time).unwrap_or(TimeDelta::MAX);
        Utc::now().signed_duration_since(self.fetched_at) < stale_time
    }
}

#[derive(Default)]
struct Slot {
    cell: OnceCell<Result<Cached, ClientError>>,
}

impl Slot {
    fn completed(&self) -> Option<&Cached> {
        self.cell.get().and_then(|outcome| outcome.as_ref().ok())
    }
}

/// Shared cache of read-query results
#[derive(Default)]
pub struct QueryCache {
    slots: Mutex<HashMap<QueryKey, Arc<Slot>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, or run `fetch` to produce it
    ///
    /// Concurrent calls for the same key share one `fetch` and its outcome.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &QueryKey,
        stale_time: Duration,
        fetch: F,
    ) -> Result<Value, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ClientError>>,
    {
        let slot = self.slot_for(key, stale_time);
        let outcome = slot
            .cell
            .get_or_init(|| async move {
                trace!(%key, "Query cache miss");
                fetch().await.map(|value| Cached {
                    value,
                    fetched_at: Utc::now(),
                })
            })
            .await;

        match outcome {
            Ok(cached) => Ok(cached.value.clone()),
            Err(err) => {
                self.discard(key, &slot);
                Err(err.clone())
            }
        }
    }

    /// Remove `slot` if it still backs `key`
    fn discard(&self, key: &QueryKey, slot: &Arc<Slot>) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot))
        {
            slots.remove(key);
        }
    }

    fn slot_for(&self, key: &QueryKey, stale_time: Duration) -> Arc<Slot> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = slots.get(key) {
            match slot.cell.get() {
                // In flight
                None => return slot.clone(),
                Some(Ok(cached)) if cached.is_fresh(stale_time) => return slot.clone(),
                Some(_) => {}
            }
        }
        let slot = Arc::new(Slot::default());
        slots.insert(key.clone(), slot.clone());
        slot
    }

    /// Drop every cached query whose path starts with `prefix`
    pub fn invalidate(&self, prefix: &str) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.retain(|key, _| !key.path.starts_with(prefix));
    }

    pub fn clear(&self) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of keys holding a completed result
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|slot| slot.completed().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const FRESH: Duration = Duration::from_secs(300);

    #[test]
    fn key_params_are_order_independent() {
        let a = QueryKey::new("/products").param("page", 2).param("q", "rust");
        let b = QueryKey::new("/products").param("q", "rust").param("page", 2);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "/products?page=2&q=rust");
    }

    #[tokio::test]
    async fn fresh_value_is_reused() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let key = QueryKey::new("/categories");

        for _ in 0..3 {
            let value = cache
                .get_or_fetch(&key, FRESH, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({"items": [], "total": 0}))
                })
                .await
                .unwrap();
            assert_eq!(value["total"], 0);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn stale_value_is_refetched() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let key = QueryKey::new("/categories");

        for _ in 0..2 {
            cache
                .get_or_fetch(&key, Duration::ZERO, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!(null))
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let cache = QueryCache::new();
        let key = QueryKey::new("/admin/stats");

        let first = cache
            .get_or_fetch(&key, FRESH, || async {
                Err(ClientError::Configuration("offline".into()))
            })
            .await;
        assert!(first.is_err());
        assert!(cache.is_empty());

        let second = cache
            .get_or_fetch(&key, FRESH, || async { Ok(json!({"users": 1})) })
            .await
            .unwrap();
        assert_eq!(second["users"], 1);
    }

    #[tokio::test]
    async fn concurrent_callers_share_a_failure() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let key = QueryKey::new("/categories");

        let counter = &calls;
        let fetch = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Err::<Value, _>(ClientError::Configuration("offline".into()))
        };
        let (a, b, c) = tokio::join!(
            cache.get_or_fetch(&key, FRESH, fetch),
            cache.get_or_fetch(&key, FRESH, fetch),
            cache.get_or_fetch(&key, FRESH, fetch),
        );

        assert!(a.is_err() && b.is_err() && c.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_empty());

        // The failed slot is gone, so the next caller fetches again
        let value = cache
            .get_or_fetch(&key, FRESH, || async { Ok(json!({"total": 0})) })
            .await
            .unwrap();
        assert_eq!(value["total"], 0);
    }

    #[tokio::test]
    async fn invalidate_by_prefix() {
        let cache = QueryCache::new();
        for path in ["/products", "/products/1", "/categories"] {
            cache
                .get_or_fetch(&QueryKey::new(path), FRESH, || async { Ok(json!(1)) })
                .await
                .unwrap();
        }
        cache.invalidate("/products");
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
