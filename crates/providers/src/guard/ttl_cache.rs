//! Key/value cache with a fixed time-to-live per entry.
//!
//! Expiry is enforced lazily: an expired entry is evicted by the `get` that
//! observes it. There is no size bound and no background sweeper.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    /// `None` when the TTL reaches past the representable range of `Instant`.
    expires_at: Option<Instant>,
}

/// Thread-safe TTL cache keyed by caller-chosen strings.
///
/// Keys are opaque; callers typically use versioned, colon-delimited
/// composites such as `detail:v1:movie:496243:ko-KR`.
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Lock the entries mutex, recovering from poison if necessary.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("TTL cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Return the live value for `key`.
    ///
    /// An entry whose expiry is at or before now counts as absent and is
    /// removed.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let mut entries = self.lock_entries();

        let expired = match entries.get(key) {
            None => {
                debug!("Cache miss for '{}'", key);
                return None;
            }
            Some(entry) => entry.expires_at.is_some_and(|at| at <= now),
        };

        if expired {
            debug!("Cache entry for '{}' expired, evicting", key);
            entries.remove(key);
            return None;
        }

        debug!("Cache hit for '{}'", key);
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, replacing any previous entry and
    /// restarting its TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_at(key, value, Instant::now());
    }

    fn set_at(&self, key: impl Into<String>, value: V, now: Instant) {
        let entry = CacheEntry {
            value,
            expires_at: now.checked_add(self.ttl),
        };
        self.lock_entries().insert(key.into(), entry);
    }

    pub fn remove(&self, key: &str) -> Option<V> {
        self.lock_entries().remove(key).map(|entry| entry.value)
    }

    /// Number of stored entries, including expired ones not yet observed.
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
