//! DayCache: memoization valid until midnight

use std::collections::HashMap;

use ahash::RandomState;
use chrono::NaiveDate;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::CacheConfig;
use crate::key::{Args, CacheKey};
use crate::memo::Memoized;
use crate::stats::CacheStats;

type Store<V> = HashMap<CacheKey, V, RandomState>;

/// Results of named computations, kept for the calendar day they were
/// produced on
///
/// Construct one per application and hand out references (or an `Arc`)
/// to the call sites that cache through it. Every read, write and sweep of
/// the store happens under a single lock.
pub struct DayCache<V> {
    /// Stored results, all from `today` after any miss resolves
    store: Mutex<Store<V>>,

    /// Where date-stamps come from
    clock: Box<dyn Clock>,

    config: CacheConfig,

    /// Cache statistics
    stats: CacheStats,
}

impl<V: Clone> DayCache<V> {
    /// Create a cache with default settings on the local clock
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a cache using the system clock of the configured time zone
    pub fn with_config(config: CacheConfig) -> Self {
        let clock = config.time_zone().clock();
        Self::from_parts(config, clock)
    }

    /// Create a cache reading dates from `clock`; the configured time zone
    /// is not consulted
    pub fn with_clock<C: Clock + 'static>(config: CacheConfig, clock: C) -> Self {
        Self::from_parts(config, Box::new(clock))
    }

    fn from_parts(config: CacheConfig, clock: Box<dyn Clock>) -> Self {
        debug!(
            key_policy = ?config.key_policy(),
            time_zone = ?config.time_zone(),
            dedupe_misses = config.dedupe_misses(),
            "Creating new DayCache"
        );

        Self {
            store: Mutex::new(HashMap::with_hasher(RandomState::new())),
            clock,
            config,
            stats: CacheStats::new(),
        }
    }

    /// Return today's result for `identity`, computing it on a miss
    ///
    /// On a hit `compute` is not called. On a miss it is called once; an
    /// `Ok` value is stored and every entry from another day is removed,
    /// an `Err` is returned unchanged and nothing is stored.
    ///
    /// With [`CacheConfig::with_dedupe_misses`] the store stays locked
    /// while `compute` runs: every other call on this cache, hits on other
    /// identities and `len`/`keys` included, waits for it, and `compute`
    /// must not call back into this cache.
    ///
    /// # Arguments
    /// * `identity` - Stable name of the computation
    /// * `args` - Arguments of the call; part of the key only under
    ///   [`KeyPolicy::WithArgs`](crate::KeyPolicy::WithArgs)
    /// * `compute` - Produces the result on a miss
    pub fn get_or_compute<E, F>(&self, identity: &str, args: &Args, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let today = self.clock.today();
        let key = CacheKey::new(identity, args, today, self.config.key_policy());

        if self.config.dedupe_misses() {
            let mut store = self.store.lock();
            if let Some(value) = self.lookup(&store, &key) {
                return Ok(value);
            }
            let value = self.compute(&key, compute)?;
            self.commit(&mut store, key, value.clone(), today);
            return Ok(value);
        }

        if let Some(value) = self.lookup(&self.store.lock(), &key) {
            return Ok(value);
        }

        // Compute without holding the lock; a concurrent miss on the same
        // key may also compute, and the later write wins.
        let value = self.compute(&key, compute)?;
        self.commit(&mut self.store.lock(), key, value.clone(), today);
        Ok(value)
    }

    /// Today's stored result for `identity`, without computing or sweeping
    pub fn get(&self, identity: &str, args: &Args) -> Option<V> {
        let key = CacheKey::new(identity, args, self.clock.today(), self.config.key_policy());
        self.store.lock().get(&key).cloned()
    }

    /// Bind `func` to `identity` so it can be called through the cache
    pub fn memoize<E, F>(&self, identity: impl Into<String>, func: F) -> Memoized<'_, V, F>
    where
        F: Fn(&Args) -> Result<V, E>,
    {
        Memoized::new(self, identity.into(), func)
    }

    fn lookup(&self, store: &Store<V>, key: &CacheKey) -> Option<V> {
        let value = store.get(key).cloned()?;
        self.stats.record_hit();
        debug!(key = %key, "Returning cached result");
        Some(value)
    }

    fn compute<E, F>(&self, key: &CacheKey, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        self.stats.record_miss();
        debug!(key = %key, "Cache miss, computing fresh result");

        compute().inspect_err(|_| {
            self.stats.record_failure();
            debug!(key = %key, "Computation failed, nothing cached");
        })
    }

    /// Store `value` under `key`, then drop every entry not from `today`
    fn commit(&self, store: &mut Store<V>, key: CacheKey, value: V, today: NaiveDate) {
        store.insert(key, value);
        self.stats.record_insert();

        let before = store.len();
        store.retain(|k, _| k.is_current(today));

        let removed = before - store.len();
        if removed > 0 {
            self.stats.record_swept(removed as u64);
            info!(removed, remaining = store.len(), "Swept stale cache entries");
        }
    }
}

impl<V> DayCache<V> {
    /// Snapshot of the stored keys
    pub fn keys(&self) -> Vec<CacheKey> {
        self.store.lock().keys().cloned().collect()
    }

    /// Get number of stored results
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }

    /// Today's date according to the cache's clock
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get cache configuration
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

impl<V: Clone> Default for DayCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
