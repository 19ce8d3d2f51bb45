// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use core::hash::Hash;
use std::sync::{OnceLock, PoisonError, RwLock};

use hashbrown::HashMap;

use super::{ShapeKey, ShapeResult};
use crate::font::Typeface;
use crate::style::FontStyle;

/// Insert-if-absent map shared between threads.
///
/// Lookups take the read lock. A miss inserts an empty cell under the write
/// lock and fills it after the lock is released, so only callers waiting on
/// the same key block on the fill.
#[derive(Debug)]
struct SharedCache<K, V> {
    map: RwLock<HashMap<K, Arc<OnceLock<V>>>>,
}

impl<K: Hash + Eq, V: Clone> SharedCache<K, V> {
    fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        let map = self.map.read().unwrap_or_else(PoisonError::into_inner);
        map.get(key).and_then(|cell| cell.get().cloned())
    }

    /// Returns the value for `key` and whether it was already present.
    fn get_or_insert_with(&self, key: K, make: impl FnOnce() -> V) -> (V, bool) {
        let cell = {
            let map = self.map.read().unwrap_or_else(PoisonError::into_inner);
            map.get(&key).cloned()
        };
        let cell = match cell {
            Some(cell) => cell,
            None => {
                let mut map = self.map.write().unwrap_or_else(PoisonError::into_inner);
                map.entry(key)
                    .or_insert_with(|| Arc::new(OnceLock::new()))
                    .clone()
            }
        };
        let mut hit = true;
        let value = cell.get_or_init(|| {
            hit = false;
            make()
        });
        (value.clone(), hit)
    }

    fn len(&self) -> usize {
        let map = self.map.read().unwrap_or_else(PoisonError::into_inner);
        map.values().filter(|cell| cell.get().is_some()).count()
    }

    fn clear(&self) {
        self.map
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Shaped spans keyed by text and shaping style.
///
/// Face choices are not part of the key; share one cache only between
/// contexts whose font collections hold the same faces.
#[derive(Debug)]
pub struct ShapeCache {
    inner: SharedCache<ShapeKey, Arc<ShapeResult>>,
}

impl Default for ShapeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            inner: SharedCache::new(),
        }
    }

    /// Returns the cached result for `key`.
    pub fn get(&self, key: &ShapeKey) -> Option<Arc<ShapeResult>> {
        self.inner.get(key)
    }

    /// Returns the cached result for `key`, shaping it with `shape` on a miss.
    pub fn get_or_insert_with(
        &self,
        key: ShapeKey,
        shape: impl FnOnce() -> Arc<ShapeResult>,
    ) -> Arc<ShapeResult> {
        let chars = key.text.chars().count();
        let (result, hit) = self.inner.get_or_insert_with(key, shape);
        if hit {
            log::trace!("shape cache hit for {chars} chars");
        } else {
            log::debug!("shape cache miss for {chars} chars");
        }
        result
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached result.
    pub fn clear(&self) {
        self.inner.clear();
    }
}

/// Key of a fallback lookup.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FallbackKey {
    /// [`FontCollection::id`](crate::FontCollection::id) of the searched collection.
    pub collection: u64,
    /// The char that needs a face.
    pub ch: char,
    /// Requested style.
    pub style: FontStyle,
    /// Language tag.
    pub locale: Option<Arc<str>>,
}

/// Fallback faces keyed by font collection, codepoint, style and locale.
///
/// Negative answers are cached too.
#[derive(Debug)]
pub struct FallbackCache {
    inner: SharedCache<FallbackKey, Option<Typeface>>,
}

impl Default for FallbackCache {
    fn default() -> Self {
        Self::new()
    }
}

impl FallbackCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            inner: SharedCache::new(),
        }
    }

    /// Returns the face for `key`, asking `find` on a miss.
    pub fn get_or_insert_with(
        &self,
        key: FallbackKey,
        find: impl FnOnce() -> Option<Typeface>,
    ) -> Option<Typeface> {
        let ch = key.ch;
        let (face, hit) = self.inner.get_or_insert_with(key, find);
        if !hit {
            log::debug!(
                "fallback for U+{:04X}: {}",
                u32::from(ch),
                face.as_ref().map_or("none", |face| face.family_name())
            );
        }
        face
    }

    /// Number of cached lookups.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached lookup.
    pub fn clear(&self) {
        self.inner.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn fills_each_key_once() {
        let cache: Arc<SharedCache<u32, u32>> = Arc::new(SharedCache::new());
        let fills = Arc::new(core::sync::atomic::AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = cache.clone();
                let fills = fills.clone();
                thread::spawn(move || {
                    cache
                        .get_or_insert_with(7, || {
                            fills.fetch_add(1, core::sync::atomic::Ordering::SeqCst);
                            49
                        })
                        .0
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 49);
        }
        assert_eq!(fills.load(core::sync::atomic::Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&7), Some(49));
        assert_eq!(cache.get(&8), None);
    }
}
