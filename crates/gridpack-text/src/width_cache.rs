#![forbid(unsafe_code)]

//! Bounded memo of measured widths.
//!
//! The packer measures every cell once per candidate group count, so a
//! listing of a few hundred names turns into thousands of width queries
//! over the same strings. [`WidthCache`] remembers each distinct string's
//! width and drops the least recently queried one when full.
//!
//! ```
//! use gridpack_text::WidthCache;
//!
//! let mut cache = WidthCache::new(2);
//! assert_eq!(cache.get_or_compute("\x1b[1mさの\x1b[0m.png"), 8);
//! assert_eq!(cache.get_or_compute("\x1b[1mさの\x1b[0m.png"), 8);
//! cache.get_or_compute("a");
//! cache.get_or_compute("bb");
//!
//! let stats = cache.stats();
//! assert_eq!((stats.hits, stats.misses, stats.evictions), (1, 3, 1));
//! ```

use std::fmt;
use std::num::NonZeroUsize;

use lru::LruCache;
use rustc_hash::FxBuildHasher;

use crate::width::measure_uncached;

/// Entry limit used by [`crate::WidthEngine::default`].
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Counters describing how well a [`WidthCache`] is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries pushed out to make room for new ones.
    pub evictions: u64,
    /// Entries currently held.
    pub size: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Share of lookups answered from the cache, `0.0` before any lookup.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }
}

/// Width memo keyed by the exact string.
///
/// A string's width never changes, so entries are never invalidated; they
/// only leave through eviction or [`WidthCache::clear`]. Not synchronized:
/// [`crate::WidthEngine`] puts one behind a mutex.
pub struct WidthCache {
    entries: LruCache<String, usize, FxBuildHasher>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl WidthCache {
    /// Cache holding at most `capacity` strings (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::with_hasher(entry_limit(capacity), FxBuildHasher),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Width of `text` with escape sequences ignored, measured on a miss.
    pub fn get_or_compute(&mut self, text: &str) -> usize {
        self.get_or_compute_with(text, measure_uncached)
    }

    /// Width of `text`, calling `measure` only when it is not cached.
    pub fn get_or_compute_with<F>(&mut self, text: &str, measure: F) -> usize
    where
        F: FnOnce(&str) -> usize,
    {
        if let Some(&width) = self.entries.get(text) {
            self.hits += 1;
            return width;
        }
        self.misses += 1;
        let width = measure(text);
        self.insert(text, width);
        width
    }

    /// Cached width of `text`, without touching recency or counters.
    #[must_use]
    pub fn peek(&self, text: &str) -> Option<usize> {
        self.entries.peek(text).copied()
    }

    /// Measure and store every string not cached yet. Counts neither hits
    /// nor misses.
    pub fn preload_many<'a, I>(&mut self, texts: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for text in texts {
            if !self.entries.contains(text) {
                self.insert(text, measure_uncached(text));
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            size: self.entries.len(),
            capacity: self.capacity(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Change the entry limit, evicting the least recently used entries if
    /// the cache is now over it.
    pub fn resize(&mut self, capacity: usize) {
        let before = self.entries.len();
        self.entries.resize(entry_limit(capacity));
        self.evictions += (before - self.entries.len()) as u64;
    }

    // Only called for keys that are not present, so anything `push` hands
    // back was evicted.
    fn insert(&mut self, text: &str, width: usize) {
        if self.entries.push(text.to_owned(), width).is_some() {
            self.evictions += 1;
        }
    }
}

impl Default for WidthCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl fmt::Debug for WidthCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidthCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

fn entry_limit(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}
