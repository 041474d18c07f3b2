//! TTL-based memoization for lookup results.
//!
//! Caches here are plain values owned by whoever runs a batch. Nothing is
//! process-global, and a disabled cache behaves exactly like an empty one,
//! so turning caching off only costs latency.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::dns::{AddressLookup, MxAddresses};
use crate::expiry::ExpiryRecord;

/// Default time-to-live for memoized lookups (24 hours).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A cache entry with TTL tracking.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
            ttl,
        }
    }

    /// Returns true if the entry has expired.
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() > self.ttl
    }

    fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }
}

/// Thread-safe key → (value, insertion time) map with TTL checked on read.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use dashboard_core::cache::TtlCache;
///
/// let cache: TtlCache<String, String> = TtlCache::new(Duration::from_secs(3600));
/// cache.insert("example.com".to_string(), "93.184.216.34".to_string());
/// assert_eq!(
///     cache.get(&"example.com".to_string()),
///     Some("93.184.216.34".to_string())
/// );
/// ```
pub struct TtlCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    default_ttl: Duration,
    enabled: bool,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone,
{
    /// Creates a new cache with the specified default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
            enabled: true,
        }
    }

    /// Creates a cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl: Duration::ZERO,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Gets a value from the cache if it exists and is not expired.
    ///
    /// Returns `None` if the key doesn't exist, the entry has expired,
    /// or the cache is disabled.
    pub fn get(&self, key: &K) -> Option<V> {
        if !self.enabled {
            return None;
        }

        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Cache read lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        let entry = entries.get(key)?;

        if entry.is_expired() {
            debug!(?key, age_secs = entry.age().as_secs(), "Cache entry expired");
            None
        } else {
            Some(entry.value.clone())
        }
    }

    /// Inserts a value into the cache with the default TTL.
    pub fn insert(&self, key: K, value: V) {
        if !self.enabled {
            return;
        }

        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Cache write lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        debug!(?key, ttl_secs = self.default_ttl.as_secs(), "Inserting cache entry");
        entries.insert(key, CacheEntry::new(value, self.default_ttl));
    }

    /// Removes all expired entries from the cache.
    pub fn cleanup(&self) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Cache write lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, remaining = entries.len(), "Cache cleanup complete");
        }
    }

    /// Returns the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(entries) => entries.len(),
            Err(poisoned) => {
                warn!("Cache read lock poisoned, recovering");
                poisoned.into_inner().len()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Cache write lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        entries.clear();
    }
}

/// A single-value cache with TTL, used for the RDAP bootstrap table.
pub struct SingleValueCache<V> {
    entry: RwLock<Option<CacheEntry<V>>>,
    ttl: Duration,
}

impl<V: Clone> SingleValueCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entry: RwLock::new(None),
            ttl,
        }
    }

    /// Gets the cached value if it exists and is not expired.
    pub fn get(&self) -> Option<V> {
        let guard = match self.entry.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("SingleValueCache read lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        let entry = guard.as_ref()?;

        if entry.is_expired() {
            None
        } else {
            Some(entry.value.clone())
        }
    }

    pub fn set(&self, value: V) {
        let mut guard = match self.entry.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("SingleValueCache write lock poisoned, recovering");
                poisoned.into_inner()
            }
        };
        *guard = Some(CacheEntry::new(value, self.ttl));
    }
}

/// The memo tables one batch context owns: addresses per host, MX slots per
/// domain and expiry records per main domain. Expiry bands are never cached.
pub struct LookupCache {
    pub addresses: TtlCache<String, AddressLookup>,
    pub mx: TtlCache<String, MxAddresses>,
    pub expiry: TtlCache<String, ExpiryRecord>,
}

impl LookupCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            addresses: TtlCache::new(ttl),
            mx: TtlCache::new(ttl),
            expiry: TtlCache::new(ttl),
        }
    }

    pub fn disabled() -> Self {
        Self {
            addresses: TtlCache::disabled(),
            mx: TtlCache::disabled(),
            expiry: TtlCache::disabled(),
        }
    }

    pub fn clear(&self) {
        self.addresses.clear();
        self.mx.clear();
        self.expiry.clear();
    }

    pub fn cleanup(&self) {
        self.addresses.cleanup();
        self.mx.cleanup();
        self.expiry.cleanup();
    }

    /// Total number of memoized entries across all tables.
    pub fn len(&self) -> usize {
        self.addresses.len() + self.mx.len() + self.expiry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LookupCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}

/// Normalizes a hostname into a cache key.
pub(crate) fn cache_key(host: &str) -> String {
    host.trim().trim_end_matches('.').to_lowercase()
}
