//! In-memory cache with per-entry expiry
//!
//! Shared process-wide by all in-flight requests. Expiry is lazy: an entry
//! past its deadline is treated as absent at read time and removed then, so
//! no background sweep is needed for correctness.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// String-keyed store where every entry carries its own time-to-live
///
/// Safe for concurrent `get`/`insert` from arbitrary tasks; callers take no
/// lock of their own. Entries are immutable once stored and are replaced
/// wholesale on re-insert (the last insert for a key wins).
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the value stored under `key`, or `None` if the key was never
    /// set or its entry expired. Expired entries are removed on the spot.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.lock_entries();

        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                debug!(key, "cache entry expired");
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value` under `key`, expiring `ttl` from now. Replaces any
    /// previous entry for the key along with its deadline.
    pub fn insert(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };

        self.lock_entries().insert(key.into(), entry);
    }

    // A poisoned lock only means another thread panicked mid-operation; the
    // map itself is still consistent, so recover the guard.
    fn lock_entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn get_returns_inserted_value_within_ttl() {
        let cache = TtlCache::new();
        cache.insert("versionManifest", 42, Duration::from_secs(3600));

        assert_eq!(cache.get("versionManifest"), Some(42));
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let cache: TtlCache<u32> = TtlCache::new();

        assert_eq!(cache.get("version:1.20.1"), None);
    }

    #[test]
    fn expired_entry_behaves_as_if_never_set() {
        let cache = TtlCache::new();
        cache.insert("versionManifest", 42, Duration::ZERO);

        assert_eq!(cache.get("versionManifest"), None);
        // Removed on read, not just hidden
        assert_eq!(cache.get("versionManifest"), None);
    }

    #[test]
    fn reinsert_replaces_value_and_deadline() {
        let cache = TtlCache::new();
        cache.insert("key", 1, Duration::ZERO);
        cache.insert("key", 2, Duration::from_secs(3600));

        assert_eq!(cache.get("key"), Some(2));
    }

    #[test]
    fn prefixed_key_spaces_do_not_collide() {
        let cache = TtlCache::new();
        cache.insert("versionManifest", 1, Duration::from_secs(3600));
        cache.insert("version:versionManifest", 2, Duration::from_secs(3600));

        assert_eq!(cache.get("versionManifest"), Some(1));
        assert_eq!(cache.get("version:versionManifest"), Some(2));
    }

    #[test]
    fn concurrent_readers_and_writers_do_not_panic() {
        let cache = Arc::new(TtlCache::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for n in 0..100 {
                        cache.insert(format!("version:{i}"), n, Duration::from_secs(60));
                        let _ = cache.get(&format!("version:{}", (i + 1) % 8));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.get("version:0"), Some(99));
    }
}
