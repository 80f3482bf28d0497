// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Memoized search results with TTL expiry and access-ranked pruning.
//!
//! Keys combine the raw query with a crc32 of the serialized filters, so the
//! same text under different filters never collides. Entries expire after the
//! TTL (lazily, on lookup) and the map is pruned whenever it outgrows its
//! capacity: expired entries go first, then everything but the most-accessed
//! survivors.
//!
//! Every entry remembers the index fingerprint of the snapshot it was computed
//! from. A lookup made against a different snapshot is a miss, so a result never
//! outlives the endpoint set it describes, even when an older in-flight search
//! stores its result after the index has moved on.
//!
//! All times are `tokio::time::Instant` and are passed in by the caller, which
//! keeps the cache deterministic under a paused test clock.

use crate::filter::FilterState;
use crate::types::SearchResult;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Entries older than this are misses.
pub const DEFAULT_TTL: Duration = Duration::from_millis(60_000);
/// Pruning starts once the map holds more than this many entries.
pub const DEFAULT_MAX_ENTRIES: usize = 100;
/// Pruning keeps at most this many entries, ranked by access count.
pub const DEFAULT_RETAIN_ENTRIES: usize = 50;

/// Deterministic cache key (and search id) for a query under a filter set.
pub fn cache_key(query: &str, filters: &FilterState) -> String {
    let serialized = serde_json::to_string(filters).unwrap_or_default();
    format!("{}:{:08x}", query, crc32fast::hash(serialized.as_bytes()))
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: SearchResult,
    /// Index fingerprint of the endpoint snapshot behind `result`.
    pub snapshot: Option<u32>,
    pub timestamp: Instant,
    pub access_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub total_entries: usize,
    /// Hits over lookups since the cache was created or cleared.
    pub hit_rate: f64,
    pub oldest_entry_timestamp: Option<Instant>,
    pub max_access_count: u64,
}

#[derive(Debug)]
pub struct ResultCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
    max_entries: usize,
    retain_entries: usize,
    hits: u64,
    lookups: u64,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_MAX_ENTRIES, DEFAULT_RETAIN_ENTRIES)
    }
}

impl ResultCache {
    pub fn new(ttl: Duration, max_entries: usize, retain_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            max_entries,
            retain_entries: retain_entries.min(max_entries),
            hits: 0,
            lookups: 0,
        }
    }

    /// Look up `key` for the endpoint set fingerprinted as `snapshot`.
    ///
    /// Expired entries, and entries computed from another snapshot, are
    /// deleted and reported as a miss.
    pub fn get(&mut self, key: &str, snapshot: Option<u32>, now: Instant) -> Option<SearchResult> {
        self.lookups += 1;

        let stale = match self.entries.get(key) {
            None => return None,
            Some(entry) => {
                entry.snapshot != snapshot
                    || now.saturating_duration_since(entry.timestamp) > self.ttl
            }
        };
        if stale {
            self.entries.remove(key);
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.access_count += 1;
        self.hits += 1;
        tracing::trace!(key, access_count = entry.access_count, "cache hit");
        Some(entry.result.clone())
    }

    /// Store `result`, computed from `snapshot`, under `key`. Prunes if the
    /// map grew past capacity.
    pub fn put(&mut self, key: String, result: SearchResult, snapshot: Option<u32>, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                result,
                snapshot,
                timestamp: now,
                access_count: 1,
            },
        );
        if self.entries.len() > self.max_entries {
            self.prune(now);
        }
    }

    /// Drop expired entries, then keep only the most-accessed survivors.
    ///
    /// Ties on access count keep the newer entry.
    pub fn prune(&mut self, now: Instant) {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.timestamp) <= ttl);

        if self.entries.len() > self.retain_entries {
            let mut ranked: Vec<(String, CacheEntry)> = self.entries.drain().collect();
            ranked.sort_by_key(|(_, entry)| (Reverse(entry.access_count), Reverse(entry.timestamp)));
            ranked.truncate(self.retain_entries);
            self.entries.extend(ranked);
        }

        tracing::debug!(before, after = self.entries.len(), "pruned result cache");
    }

    /// Drop every entry computed from a snapshot other than `snapshot`.
    /// Hit statistics are kept. Returns how many entries went.
    pub fn retain_snapshot(&mut self, snapshot: Option<u32>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.snapshot == snapshot);
        let dropped = before - self.entries.len();
        if dropped > 0 {
            tracing::debug!(dropped, "evicted results of a previous snapshot");
        }
        dropped
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.lookups = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            hit_rate: if self.lookups == 0 {
                0.0
            } else {
                self.hits as f64 / self.lookups as f64
            },
            oldest_entry_timestamp: self.entries.values().map(|e| e.timestamp).min(),
            max_access_count: self
                .entries
                .values()
                .map(|e| e.access_count)
                .max()
                .unwrap_or(0),
        }
    }
}
