//! Time-limited memoisation of generated regions.
//!
//! Generation is a pure function of `(world, seed, region)`, so the cache is
//! purely a latency optimisation: a miss always falls through to generation,
//! and a hit returns the grid generation would have produced.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::generator::TileSource;
use crate::viewport::{Region, WorldConfig};
use crate::Grid;

/// Default lifetime of a cache entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Longest gap between two expiry sweeps triggered by writes.
pub const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Identifies one generated region.
///
/// The world extent is part of the key because the island mask depends on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// World the region belongs to.
    pub world: WorldConfig,
    /// Generation seed.
    pub seed: i64,
    /// The generated rectangle.
    pub region: Region,
}

impl CacheKey {
    /// Build a key.
    pub fn new(world: WorldConfig, seed: i64, region: Region) -> Self {
        Self {
            world,
            seed,
            region,
        }
    }
}

struct CacheEntry {
    grid: Arc<Grid>,
    created: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_live(&self) -> bool {
        self.created.elapsed() < self.ttl
    }
}

/// Hit and miss counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that fell through to generation.
    pub misses: u64,
}

/// Concurrent region cache with per-entry expiry.
///
/// Entries live in a sharded [`DashMap`]; [`ChunkCache::get_or_generate`]
/// additionally serialises computation per key so a region is generated at
/// most once while it is in flight.
///
/// Expired entries are dropped when their key is looked up and by a sweep
/// that writes run at most once per sweep interval (the TTL, capped at
/// [`MAX_SWEEP_INTERVAL`]), so keys that are never requested again still
/// leave the map.
pub struct ChunkCache {
    entries: DashMap<CacheKey, CacheEntry>,
    in_flight: DashMap<CacheKey, Arc<Mutex<()>>>,
    ttl: Duration,
    sweep_interval: Duration,
    last_sweep: Mutex<Instant>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ChunkCache {
    /// Create a cache whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            in_flight: DashMap::new(),
            ttl,
            sweep_interval: ttl.min(MAX_SWEEP_INTERVAL),
            last_sweep: Mutex::new(Instant::now()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Default entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live entry. Expired entries are evicted and reported as misses.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Grid>> {
        let found = self.lookup(key);
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(seed = key.seed, region = ?key.region, "chunk cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(seed = key.seed, region = ?key.region, "chunk cache miss");
        }
        found
    }

    fn lookup(&self, key: &CacheKey) -> Option<Arc<Grid>> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_live() => return Some(Arc::clone(&entry.grid)),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove_if(key, |_, entry| !entry.is_live());
        }
        None
    }

    /// Store `grid` under `key` with the default lifetime.
    pub fn put(&self, key: CacheKey, grid: Arc<Grid>) {
        self.put_with_ttl(key, grid, self.ttl);
    }

    /// Store `grid` under `key`, expiring after `ttl`.
    pub fn put_with_ttl(&self, key: CacheKey, grid: Arc<Grid>, ttl: Duration) {
        self.entries.insert(
            key,
            CacheEntry {
                grid,
                created: Instant::now(),
                ttl,
            },
        );
        self.sweep_if_due();
    }

    fn sweep_if_due(&self) {
        // A writer already sweeping covers this call.
        let Ok(mut last) = self.last_sweep.try_lock() else {
            return;
        };
        if last.elapsed() < self.sweep_interval {
            return;
        }
        *last = Instant::now();
        drop(last);

        let removed = self.purge_expired();
        if removed > 0 {
            tracing::debug!(removed, remaining = self.entries.len(), "swept expired regions");
        }
    }

    /// Return the cached grid for `key`, generating it with `generate` on a miss.
    ///
    /// Concurrent callers for the same key wait for the first one instead of
    /// generating again.
    pub fn get_or_generate<F>(&self, key: CacheKey, generate: F) -> Arc<Grid>
    where
        F: FnOnce() -> Arc<Grid>,
    {
        if let Some(grid) = self.get(&key) {
            return grid;
        }

        let lock = Arc::clone(
            self.in_flight
                .entry(key)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .value(),
        );
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        // Dropped before `_guard`, also when `generate` unwinds.
        let _release = InFlightRelease {
            in_flight: &self.in_flight,
            key,
            lock: &lock,
        };

        // Another caller may have finished while we waited.
        if let Some(grid) = self.lookup(&key) {
            return grid;
        }

        let grid = generate();
        self.put(key, Arc::clone(&grid));
        grid
    }

    /// Drop the entry for `key`. Returns `true` if one was present.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Evict all expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live());
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hit/miss counters since creation.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Removes a key's in-flight lock once its holder is done with it.
struct InFlightRelease<'a> {
    in_flight: &'a DashMap<CacheKey, Arc<Mutex<()>>>,
    key: CacheKey,
    lock: &'a Arc<Mutex<()>>,
}

impl Drop for InFlightRelease<'_> {
    fn drop(&mut self) {
        // Only our own lock: a later caller may already have installed a new one.
        self.in_flight
            .remove_if(&self.key, |_, lock| Arc::ptr_eq(lock, self.lock));
    }
}

impl Default for ChunkCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

/// A [`TileSource`] that consults a shared [`ChunkCache`] before delegating.
pub struct CachedGenerator<S> {
    inner: S,
    cache: Arc<ChunkCache>,
}

impl<S: TileSource> CachedGenerator<S> {
    /// Wrap `inner` with `cache`.
    pub fn new(inner: S, cache: Arc<ChunkCache>) -> Self {
        Self { inner, cache }
    }

    /// The wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// The shared cache.
    pub fn cache(&self) -> &Arc<ChunkCache> {
        &self.cache
    }
}

impl<S: TileSource> TileSource for CachedGenerator<S> {
    fn world(&self) -> WorldConfig {
        self.inner.world()
    }

    fn seed(&self) -> i64 {
        self.inner.seed()
    }

    fn generate(&self, region: &Region) -> Arc<Grid> {
        let key = CacheKey::new(self.inner.world(), self.inner.seed(), *region);
        self.cache
            .get_or_generate(key, || self.inner.generate(region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GenerationSettings, TerrainGenerator, generate_region};
    use std::sync::atomic::AtomicUsize;

    fn world() -> WorldConfig {
        WorldConfig::new(100, 100).unwrap()
    }

    fn key(seed: i64) -> CacheKey {
        CacheKey::new(world(), seed, Region::new(0, 0, 8, 8))
    }

    fn grid(seed: i64) -> Arc<Grid> {
        Arc::new(generate_region(
            &world(),
            seed,
            &Region::new(0, 0, 8, 8),
            &GenerationSettings::default(),
        ))
    }

    #[test]
    fn test_put_then_get() {
        let cache = ChunkCache::default();
        assert!(cache.get(&key(1)).is_none());
        cache.put(key(1), grid(1));
        assert_eq!(cache.get(&key(1)), Some(grid(1)));
        assert!(cache.get(&key(2)).is_none(), "different seed must miss");
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 2 });
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = ChunkCache::new(Duration::from_millis(20));
        cache.put(key(1), grid(1));
        std::thread::sleep(Duration::from_millis(40));
        assert!(cache.get(&key(1)).is_none());
        assert!(cache.is_empty(), "expired entry should be evicted on lookup");
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let cache = ChunkCache::default();
        cache.put_with_ttl(key(1), grid(1), Duration::ZERO);
        assert!(cache.get(&key(1)).is_none());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = ChunkCache::default();
        cache.put(key(1), grid(1));
        cache.put(key(2), grid(2));
        assert!(cache.invalidate(&key(1)));
        assert!(!cache.invalidate(&key(1)));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let cache = ChunkCache::default();
        cache.put_with_ttl(key(1), grid(1), Duration::ZERO);
        cache.put(key(2), grid(2));
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_writes_sweep_keys_never_requested_again() {
        let cache = ChunkCache::new(Duration::from_millis(10));
        for seed in 0..50 {
            cache.put(key(seed), grid(1));
        }
        assert_eq!(cache.len(), 50);
        std::thread::sleep(Duration::from_millis(50));

        for seed in 100..110 {
            cache.get_or_generate(key(seed), || grid(1));
        }
        assert!(
            cache.len() <= 10,
            "expired entries survived new traffic: {} stored",
            cache.len()
        );
    }

    #[test]
    fn test_long_ttl_entries_survive_sweep() {
        let cache = ChunkCache::new(Duration::from_millis(30));
        cache.put_with_ttl(key(1), grid(1), Duration::from_secs(3600));
        std::thread::sleep(Duration::from_millis(60));
        cache.put(key(2), grid(2));
        assert!(cache.get(&key(1)).is_some(), "live entry must not be swept");
    }

    #[test]
    fn test_panicking_generation_releases_in_flight_lock() {
        let cache = ChunkCache::default();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            cache.get_or_generate(key(3), || panic!("generation failed"))
        }));
        assert!(outcome.is_err());
        assert!(cache.in_flight.is_empty(), "in-flight lock leaked after panic");
        assert!(cache.is_empty());

        assert_eq!(cache.get_or_generate(key(3), || grid(3)), grid(3));
        assert!(cache.in_flight.is_empty());
    }

    #[test]
    fn test_get_or_generate_computes_once() {
        let cache = Arc::new(ChunkCache::default());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    cache.get_or_generate(key(5), || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(Duration::from_millis(50));
                        grid(5)
                    })
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), grid(5));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1, "region generated more than once");
    }

    #[test]
    fn test_cached_generator_matches_fresh_generation() {
        let settings = GenerationSettings::default();
        let cache = Arc::new(ChunkCache::default());
        let cached = CachedGenerator::new(
            TerrainGenerator::new(world(), Some(42), settings),
            Arc::clone(&cache),
        );
        let plain = TerrainGenerator::new(world(), Some(42), settings);
        let region = Region::new(40, 40, 12, 9);

        let first = cached.generate(&region);
        let second = cached.generate(&region);
        assert_eq!(first, second);
        assert_eq!(first, plain.generate(&region));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_world_extent_is_part_of_key() {
        let settings = GenerationSettings::default();
        let cache = Arc::new(ChunkCache::default());
        let small = CachedGenerator::new(
            TerrainGenerator::new(WorldConfig::new(50, 50).unwrap(), Some(1), settings),
            Arc::clone(&cache),
        );
        let large = CachedGenerator::new(
            TerrainGenerator::new(WorldConfig::new(500, 500).unwrap(), Some(1), settings),
            Arc::clone(&cache),
        );
        let region = Region::new(0, 0, 10, 10);
        small.generate(&region);
        large.generate(&region);
        assert_eq!(cache.len(), 2);
    }
}
