// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small least-recently-used cache.

use alloc::vec::Vec;

#[derive(Debug)]
struct Entry<K, T> {
    epoch: u64,
    key: K,
    data: T,
}

/// A least-recently-used cache with a linear scan over its entries.
///
/// Meant for a handful of entries, such as per-typeface shaping tables.
#[derive(Debug)]
pub(crate) struct LruCache<K, T> {
    entries: Vec<Entry<K, T>>,
    epoch: u64,
    max_entries: usize,
}

impl<K: PartialEq + Copy, T> LruCache<K, T> {
    pub(crate) fn new(max_entries: usize) -> Self {
        Self {
            entries: Vec::new(),
            epoch: 0,
            max_entries: max_entries.max(1),
        }
    }

    /// Returns the entry for `key`, creating it with `make_data` if absent.
    /// Evicts the least recently used entry when full.
    pub(crate) fn entry(&mut self, key: K, make_data: impl FnOnce() -> T) -> &T {
        self.epoch += 1;
        let epoch = self.epoch;
        if let Some(index) = self.entries.iter().position(|e| e.key == key) {
            let entry = &mut self.entries[index];
            entry.epoch = epoch;
            return &entry.data;
        }
        let entry = Entry {
            epoch,
            key,
            data: make_data(),
        };
        let index = if self.entries.len() < self.max_entries {
            self.entries.push(entry);
            self.entries.len() - 1
        } else {
            let oldest = self
                .entries
                .iter()
                .enumerate()
                .min_by_key(|(_, e)| e.epoch)
                .map_or(0, |(i, _)| i);
            self.entries[oldest] = entry;
            oldest
        };
        &self.entries[index].data
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}
