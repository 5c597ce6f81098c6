//! Single-slot value cache with query-time expiry.
//!
//! The cache holds at most one value. An entry older than the TTL is
//! reported as stale by [`ExpiringValueCache::is_fresh`] but is still
//! returned by [`ExpiringValueCache::get`], so callers can fall back to it
//! when every upstream source is down. Nothing is ever evicted.

use parking_lot::Mutex;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Clone, Debug)]
struct CacheEntry<T> {
    value: T,
    inserted_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() < ttl
    }
}

/// Thread-safe cache for one value of type `T`.
///
/// The value and its insertion time live in one record behind one lock, so a
/// reader never sees a value paired with another write's timestamp.
#[derive(Debug)]
pub struct ExpiringValueCache<T> {
    entry: Mutex<Option<CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> ExpiringValueCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: Mutex::new(None),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replaces any existing value and restarts its freshness window.
    pub fn put(&self, value: T) {
        let entry = CacheEntry {
            value,
            inserted_at: Instant::now(),
        };
        *self.entry.lock() = Some(entry);
    }

    /// Returns the stored value whether it is fresh or stale.
    pub fn get(&self) -> Option<T> {
        self.entry.lock().as_ref().map(|entry| entry.value.clone())
    }

    /// Returns the stored value only while it is younger than the TTL.
    pub fn get_fresh(&self) -> Option<T> {
        self.entry
            .lock()
            .as_ref()
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.value.clone())
    }

    pub fn is_fresh(&self) -> bool {
        self.entry
            .lock()
            .as_ref()
            .is_some_and(|entry| entry.is_fresh(self.ttl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const TTL: Duration = Duration::from_millis(100);

    #[test]
    fn test_empty_cache_is_not_present_or_fresh() {
        let cache = ExpiringValueCache::<String>::new(TTL);

        assert!(cache.get().is_none());
        assert!(cache.get_fresh().is_none());
        assert!(!cache.is_fresh());
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_is_fresh_until_ttl_elapses() {
        let cache = ExpiringValueCache::new(TTL);
        cache.put("some-val".to_string());

        assert!(cache.is_fresh());
        assert_eq!(cache.get_fresh().as_deref(), Some("some-val"));

        tokio::time::advance(TTL - Duration::from_millis(1)).await;
        assert!(cache.is_fresh());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(!cache.is_fresh());
        assert!(cache.get_fresh().is_none());
        // Stale values stay readable
        assert_eq!(cache.get().as_deref(), Some("some-val"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_replaces_previous_value_and_resets_clock() {
        let cache = ExpiringValueCache::new(TTL);
        cache.put(1_u32);

        tokio::time::advance(TTL * 2).await;
        assert!(!cache.is_fresh());

        cache.put(2_u32);
        assert!(cache.is_fresh());
        assert_eq!(cache.get(), Some(2));
    }

    #[test]
    fn test_sequential_puts_keep_only_last_value() {
        let cache = ExpiringValueCache::new(TTL);
        cache.put("first");
        cache.put("second");

        assert_eq!(cache.get(), Some("second"));
        assert_eq!(cache.get(), Some("second"));
    }

    #[test]
    fn test_ttl_is_reported() {
        let cache = ExpiringValueCache::<u8>::new(Duration::from_secs(3));
        assert_eq!(cache.ttl(), Duration::from_secs(3));
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        let cache = Arc::new(ExpiringValueCache::new(Duration::from_secs(60)));
        cache.put((0_u64, 0_u64));

        let handles: Vec<_> = (0..8_u64)
            .map(|worker| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..1_000_u64 {
                        if worker % 2 == 0 {
                            cache.put((i, i * 2));
                        } else if let Some((a, b)) = cache.get() {
                            // Both halves always come from the same write
                            assert_eq!(b, a * 2);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.is_fresh());
    }
}
