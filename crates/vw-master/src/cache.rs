//! In-process TTL cache with single-flight loading.
//!
//! Concurrent readers of a missing key share one fetch. A failed fetch is
//! handed to every waiter and nothing is stored, so the next caller retries.

use std::{
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};

use moka::{Expiry, future::Cache};

#[derive(Clone)]
struct Timed<V> {
    value: V,
    ttl: Duration,
}

/// Each entry lives for the TTL it was stored with.
struct PerEntryTtl;

impl<V> Expiry<String, Timed<V>> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Timed<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Timed<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

#[derive(Clone)]
pub struct TtlCache<V: Clone + Send + Sync + 'static> {
    inner: Cache<String, Timed<V>>,
}

impl<V: Clone + Send + Sync + 'static> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().expire_after(PerEntryTtl).build(),
        }
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result for `ttl`.
    ///
    /// With `refresh` set the cached value is ignored and replaced by a fresh fetch.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        refresh: bool,
        fetch: F,
    ) -> Result<V, Arc<E>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<V, E>> + Send,
        E: Send + Sync + 'static,
    {
        if refresh {
            let value = fetch().await.map_err(Arc::new)?;
            self.inner
                .insert(
                    key.to_owned(),
                    Timed {
                        value: value.clone(),
                        ttl,
                    },
                )
                .await;
            return Ok(value);
        }

        self.inner
            .try_get_with(key.to_owned(), async move {
                fetch().await.map(|value| Timed { value, ttl })
            })
            .await
            .map(|timed| timed.value)
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        self.inner.get(key).await.map(|timed| timed.value)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let cache: TtlCache<u32> = TtlCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks = (0..8).map(|_| {
            let cache = cache.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                cache
                    .get_or_fetch("vaults:list:base", TTL, false, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, String>(42)
                    })
                    .await
            })
        });

        for result in futures::future::join_all(tasks).await {
            assert_eq!(result.unwrap().unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cached_value_is_reused_until_refresh() {
        let cache: TtlCache<u32> = TtlCache::new();

        let first = cache
            .get_or_fetch("k", TTL, false, || async { Ok::<_, String>(1) })
            .await
            .unwrap();
        let second = cache
            .get_or_fetch("k", TTL, false, || async { Ok::<_, String>(2) })
            .await
            .unwrap();
        assert_eq!((first, second), (1, 1));

        let forced = cache
            .get_or_fetch("k", TTL, true, || async { Ok::<_, String>(3) })
            .await
            .unwrap();
        assert_eq!(forced, 3);
        assert_eq!(cache.get("k").await, Some(3));
    }

    #[tokio::test]
    async fn test_entries_expire_after_their_ttl() {
        let cache: TtlCache<u32> = TtlCache::new();
        let short = Duration::from_millis(50);

        cache
            .get_or_fetch("k", short, false, || async { Ok::<_, String>(1) })
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        let value = cache
            .get_or_fetch("k", short, false, || async { Ok::<_, String>(2) })
            .await
            .unwrap();
        assert_eq!(value, 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new();

        let err = cache
            .get_or_fetch("k", TTL, false, || async {
                Err::<u32, _>("upstream down".to_string())
            })
            .await
            .unwrap_err();
        assert_eq!(err.as_str(), "upstream down");
        assert_eq!(cache.get("k").await, None);

        let value = cache
            .get_or_fetch("k", TTL, false, || async { Ok::<_, String>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_value() {
        let cache: TtlCache<u32> = TtlCache::new();
        cache
            .get_or_fetch("k", TTL, false, || async { Ok::<_, String>(1) })
            .await
            .unwrap();

        let refreshed = cache
            .get_or_fetch("k", TTL, true, || async { Err::<u32, _>("boom".to_string()) })
            .await;
        assert!(refreshed.is_err());
        assert_eq!(cache.get("k").await, Some(1));
    }
}
