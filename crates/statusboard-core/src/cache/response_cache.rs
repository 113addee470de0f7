//! Keyed response cache with per-call expiry
//!
//! A pass-through memoizer: the producer's errors propagate untouched and are
//! never stored, a forced refresh always runs the producer, and an expiry of
//! zero disables caching. There is no eviction and no request coalescing; two
//! concurrent misses for one key both run the producer.

use super::clock::{Clock, SystemClock};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default lifetime of a cached response
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(60);

/// Per-call cache behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Skip the lookup and always run the producer
    pub force_refresh: bool,
    /// Maximum age of an entry that may still be served
    pub expiry: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            force_refresh: false,
            expiry: DEFAULT_EXPIRY,
        }
    }
}

impl CacheOptions {
    pub fn new(expiry: Duration) -> Self {
        Self {
            force_refresh: false,
            expiry,
        }
    }

    pub fn with_force_refresh(mut self, force_refresh: bool) -> Self {
        self.force_refresh = force_refresh;
        self
    }
}

/// One stored response, replaced wholesale on refresh
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub key: String,
    pub value: V,
    pub fetched_at: DateTime<Utc>,
    pub expiry: Duration,
}

impl<V> CacheEntry<V> {
    /// Age at `now`; an entry stamped in the future counts as brand new
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// Whether the entry may be served under `expiry`
    pub fn is_fresh_for(&self, now: DateTime<Utc>, expiry: Duration) -> bool {
        !expiry.is_zero() && self.age(now) < expiry
    }
}

/// Process-wide response cache
///
/// Construct once at startup and share through `Arc`.
pub struct ResponseCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    clock: Arc<dyn Clock>,
}

impl<V> fmt::Debug for ResponseCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("entries", &self.entries.read().len())
            .field("clock", &self.clock)
            .finish()
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> ResponseCache<V> {
    /// Cache driven by the wall clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Return the cached value for `key`, or run `producer` and store its result
    ///
    /// The producer runs when `force_refresh` is set, when there is no entry,
    /// or when the entry is at least `expiry` old. Only `Ok` results are
    /// stored.
    pub async fn fetch_with_cache<F, Fut, E>(
        &self,
        key: &str,
        producer: F,
        options: CacheOptions,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if !options.force_refresh {
            if let Some(value) = self.lookup(key, options.expiry) {
                debug!(key, "Response cache hit");
                return Ok(value);
            }
        }

        debug!(
            key,
            force_refresh = options.force_refresh,
            "Response cache miss, running producer"
        );

        // Lock is not held across the await
        let value = producer().await?;
        self.insert(key, value.clone(), options.expiry);

        Ok(value)
    }

    /// Fresh value under the entry's own expiry
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| entry.is_fresh_for(now, entry.expiry))
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, stamped with the current time
    pub fn insert(&self, key: &str, value: V, expiry: Duration) {
        let entry = CacheEntry {
            key: key.to_string(),
            value,
            fetched_at: self.clock.now(),
            expiry,
        };
        self.entries.write().insert(key.to_string(), entry);
    }

    /// Drop one entry; returns whether it existed
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
        debug!("Response cache cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Age of the entry for `key`, stale or not
    pub fn entry_age(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now();
        self.entries.read().get(key).map(|entry| entry.age(now))
    }

    fn lookup(&self, key: &str, expiry: Duration) -> Option<V> {
        let now = self.clock.now();
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| entry.is_fresh_for(now, expiry))
            .map(|entry| entry.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache_with_clock() -> (ResponseCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        (ResponseCache::with_clock(clock.clone()), clock)
    }

    async fn counted(calls: &AtomicUsize, value: &str) -> Result<String, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(value.to_string())
    }

    #[tokio::test]
    async fn test_second_call_within_expiry_is_served_from_cache() {
        let (cache, clock) = cache_with_clock();
        let calls = AtomicUsize::new(0);
        let options = CacheOptions::new(Duration::from_secs(60));

        let first = cache
            .fetch_with_cache("k", || counted(&calls, "v1"), options)
            .await
            .unwrap();
        clock.advance(Duration::from_secs(30));
        let second = cache
            .fetch_with_cache("k", || counted(&calls, "v2"), options)
            .await
            .unwrap();

        assert_eq!(first, "v1");
        assert_eq!(second, "v1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_always_runs_producer() {
        let (cache, _clock) = cache_with_clock();
        let calls = AtomicUsize::new(0);
        let options = CacheOptions::new(Duration::from_secs(60)).with_force_refresh(true);

        for _ in 0..3 {
            cache
                .fetch_with_cache("k", || counted(&calls, "v"), options)
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let (cache, clock) = cache_with_clock();
        let calls = AtomicUsize::new(0);
        let options = CacheOptions::new(Duration::from_secs(60));

        cache
            .fetch_with_cache("k", || counted(&calls, "old"), options)
            .await
            .unwrap();
        clock.advance(Duration::from_secs(60));
        let value = cache
            .fetch_with_cache("k", || counted(&calls, "new"), options)
            .await
            .unwrap();

        assert_eq!(value, "new");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.get("k").as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_zero_expiry_disables_caching() {
        let (cache, _clock) = cache_with_clock();
        let calls = AtomicUsize::new(0);
        let options = CacheOptions::new(Duration::ZERO);

        cache
            .fetch_with_cache("k", || counted(&calls, "a"), options)
            .await
            .unwrap();
        cache
            .fetch_with_cache("k", || counted(&calls, "b"), options)
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.get("k").is_none());
    }

    #[tokio::test]
    async fn test_producer_error_is_not_stored() {
        let (cache, _clock) = cache_with_clock();
        let calls = AtomicUsize::new(0);
        let options = CacheOptions::new(Duration::from_secs(60));

        let err = cache
            .fetch_with_cache(
                "k",
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<String, _>("boom".to_string())
                },
                options,
            )
            .await
            .unwrap_err();
        assert_eq!(err, "boom");
        assert!(cache.is_empty());

        let value = cache
            .fetch_with_cache("k", || counted(&calls, "ok"), options)
            .await
            .unwrap();
        assert_eq!(value, "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_producer_error_keeps_previous_entry() {
        let (cache, clock) = cache_with_clock();
        let options = CacheOptions::new(Duration::from_secs(60));

        cache
            .fetch_with_cache("k", || async { Ok::<_, String>("good".to_string()) }, options)
            .await
            .unwrap();
        clock.advance(Duration::from_secs(5));

        let result = cache
            .fetch_with_cache(
                "k",
                || async { Err::<String, _>("down".to_string()) },
                options.with_force_refresh(true),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(cache.get("k").as_deref(), Some("good"));
        assert_eq!(cache.entry_age("k"), Some(Duration::from_secs(5)));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let (cache, _clock) = cache_with_clock();
        let calls = AtomicUsize::new(0);
        let options = CacheOptions::default();

        cache
            .fetch_with_cache("notion-data-a", || counted(&calls, "a"), options)
            .await
            .unwrap();
        let b = cache
            .fetch_with_cache("notion-data-b", || counted(&calls, "b"), options)
            .await
            .unwrap();

        assert_eq!(b, "b");
        assert_eq!(cache.len(), 2);
        assert!(cache.invalidate("notion-data-a"));
        assert!(!cache.invalidate("notion-data-a"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
