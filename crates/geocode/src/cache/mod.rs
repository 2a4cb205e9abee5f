//! Response cache for resolution results.
//!
//! Avoids redundant remote calls for recently-seen keys. Expiry is
//! time-based and evaluated lazily on read: an expired entry behaves as a
//! miss and stays in place until overwritten or displaced by the capacity
//! bound. The cache is in-memory and resets on application restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::models::Resolution;

/// Default time after which an entry is treated as stale.
const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Default maximum number of entries held at once.
const DEFAULT_CAPACITY: usize = 4096;

/// A single cached resolution with its bookkeeping timestamps.
#[derive(Debug, Clone)]
struct CacheEntry {
    result: Resolution,
    inserted_at: Instant,
    last_access: Instant,
}

/// Cache configuration.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Entries older than this are treated as misses.
    pub ttl: Duration,
    /// Maximum number of entries; inserting beyond this evicts the
    /// least-recently-used entry.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Counters exposed for observability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub evictions: u64,
    /// Entries currently held, expired ones included.
    pub entries: usize,
}

/// Thread-safe TTL + LRU-capped cache from resolution keys to results.
///
/// Entries are immutable value snapshots, so last-writer-wins on a
/// simultaneous `put` to the same key is acceptable. Locks are held only
/// for map operations, never across I/O.
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    config: CacheConfig,
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
    evictions: AtomicU64,
}

impl ResponseCache {
    /// Create a cache with default TTL (1 hour) and capacity.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            insertions: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Lock the entries mutex, recovering from poison if necessary.
    ///
    /// Recovering is safe here: the worst case is a slightly stale cache
    /// view, which is better than panicking.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Response cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Look up a key. A hit requires the entry to exist and to be younger
    /// than the TTL; an expired entry behaves as a miss but is not removed.
    pub fn get(&self, key: &str) -> Option<Resolution> {
        let mut entries = self.lock_entries();

        match entries.get_mut(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.config.ttl => {
                entry.last_access = Instant::now();
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.result.clone())
            }
            Some(_) => {
                debug!("Cache entry for '{}' expired, treating as miss", key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Unconditionally upsert a result, timestamped at insertion.
    ///
    /// When the cache is full and the key is new, expired entries are
    /// dropped first; if none were expired, the least-recently-used entry
    /// is evicted.
    pub fn put(&self, key: &str, result: Resolution) {
        let now = Instant::now();
        let mut entries = self.lock_entries();

        if !entries.contains_key(key) && entries.len() >= self.config.capacity {
            self.evict(&mut entries);
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                result,
                inserted_at: now,
                last_access: now,
            },
        );
        self.insertions.fetch_add(1, Ordering::Relaxed);
    }

    fn evict(&self, entries: &mut HashMap<String, CacheEntry>) {
        let before = entries.len();
        entries.retain(|_, entry| entry.inserted_at.elapsed() < self.config.ttl);
        let expired = before - entries.len();
        if expired > 0 {
            debug!("Evicted {} expired cache entries", expired);
            self.evictions.fetch_add(expired as u64, Ordering::Relaxed);
            return;
        }

        // Nothing expired: drop the least-recently-used entry.
        if let Some(oldest) = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone())
        {
            debug!("Cache full, evicting least-recently-used entry '{}'", oldest);
            entries.remove(&oldest);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            insertions: self.insertions.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
