#![forbid(unsafe_code)]

//! Visual width of strings as printed on a terminal.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::ansi::escape_tail_len;
use crate::grapheme::string_width;
use crate::width_cache::{CacheStats, DEFAULT_CACHE_CAPACITY, WidthCache};

/// Width of `text` in terminal cells, ignoring escape sequences, without
/// consulting any cache.
///
/// Never fails: malformed or unusual input degrades to a best-effort
/// width.
///
/// ```
/// use gridpack_text::measure_uncached;
///
/// assert_eq!(measure_uncached("\x1b[38;5;1mAB\x1b[0m"), 2);
/// assert_eq!(measure_uncached("さの.png"), 8);
/// ```
#[must_use]
pub fn measure_uncached(text: &str) -> usize {
    string_width(text).saturating_sub(escape_tail_len(text))
}

/// Memoizing visual width engine.
///
/// Owns a bounded [`WidthCache`] behind a mutex so one engine can be
/// shared (by reference or `Arc`) between every table that renders in a
/// process. A lookup, the computation on a miss, and the insert all happen
/// under a single lock acquisition.
#[derive(Debug)]
pub struct WidthEngine {
    cache: Mutex<WidthCache>,
}

impl WidthEngine {
    /// Create an engine whose cache holds at most `capacity` strings.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        tracing::debug!(capacity, "width engine created");
        Self {
            cache: Mutex::new(WidthCache::new(capacity)),
        }
    }

    /// Number of terminal cells `text` occupies when printed.
    ///
    /// Identical input always yields identical output, whether it is served
    /// from the cache or computed.
    pub fn visual_width(&self, text: &str) -> usize {
        self.lock().get_or_compute_with(text, measure_uncached)
    }

    /// Snapshot of the cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.lock().stats()
    }

    /// Maximum number of cached strings.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    // Entries are only ever inserted or evicted, never modified, so a cache
    // left behind by a panicking holder is still consistent.
    fn lock(&self) -> MutexGuard<'_, WidthCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for WidthEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn fg(code: u8) -> String {
        format!("\x1b[38;5;{code}m")
    }

    fn bg(code: u8) -> String {
        format!("\x1b[48;5;{code}m")
    }

    const RESET: &str = "\x1b[0m";

    #[test]
    fn kana_file_names() {
        let engine = WidthEngine::default();
        let cases: &[(usize, String)] = &[
            (8, "さの.png".into()),
            (8, format!("{}さの{}.png{RESET}", fg(1), fg(2))),
            (8, "たき.png".into()),
            (10, "いざわ.png".into()),
            (10, format!("{}いざわ.png{RESET}", fg(15))),
            (10, "みすぎ.png".into()),
            (12, "いしざき.png".into()),
            (12, format!("{}いしざき{}.png{RESET}", fg(3), bg(4))),
            (12, "もリさき.png".into()),
            (14, "わかしまづ.png".into()),
            (14, "わかばやし.png".into()),
        ];
        for (width, text) in cases {
            assert_eq!(engine.visual_width(text), *width, "text={text:?}");
        }
    }

    #[test]
    fn colored_text_matches_plain() {
        let engine = WidthEngine::new(16);
        let colored = format!("{}AB{RESET}", fg(196));
        assert_eq!(engine.visual_width(&colored), 2);
        assert_eq!(engine.visual_width(&colored), engine.visual_width("AB"));
    }

    #[test]
    fn cached_and_fresh_agree() {
        let engine = WidthEngine::new(4);
        let text = "日本\u{1F1EF}\u{1F1F5}";
        let fresh = measure_uncached(text);
        assert_eq!(engine.visual_width(text), fresh);
        assert_eq!(engine.visual_width(text), fresh);
        let stats = engine.cache_stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn never_underflows() {
        // A selector glued to the final byte widens that cluster; the
        // subtraction must still not wrap.
        assert_eq!(measure_uncached("\x1b[m\u{FE0F}"), 1);
        assert_eq!(measure_uncached("\x1b[0m"), 0);
    }

    #[test]
    fn shared_between_threads() {
        let engine = Arc::new(WidthEngine::new(64));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    (0..50)
                        .map(|j| engine.visual_width(&format!("{}{j}", "さ".repeat(i))))
                        .sum::<usize>()
                })
            })
            .collect();
        let totals: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(totals[0], 10 + 2 * 40);
        assert_eq!(totals[1], totals[0] + 100);
        assert!(engine.cache_stats().size <= 64);
    }
}
