// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Running search metrics.
//!
//! Averages are updated incrementally, `new = (old * (n - 1) + sample) / n`,
//! so recording is O(1) and nothing is retained per search.

use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Point-in-time copy of the recorder. Mutating it changes nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetrics {
    pub total_searches: u64,
    /// Fraction of searches answered from the cache, in `[0, 1]`.
    pub cache_hit_rate: f64,
    /// Mean search time in milliseconds.
    pub average_search_time: f64,
    /// Duration of the last index rebuild in milliseconds.
    pub index_build_time: f64,
    #[serde(skip)]
    pub last_index_build: Option<Instant>,
}

#[derive(Debug, Default)]
pub struct MetricsRecorder {
    current: SearchMetrics,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_search(&mut self, time_ms: f64, from_cache: bool) {
        let m = &mut self.current;
        m.total_searches += 1;
        let n = m.total_searches as f64;
        m.average_search_time = running_mean(m.average_search_time, time_ms, n);
        m.cache_hit_rate = running_mean(m.cache_hit_rate, if from_cache { 1.0 } else { 0.0 }, n);
    }

    /// Only real rebuilds are recorded; a skipped build leaves these untouched.
    pub fn record_index_build(&mut self, elapsed: Duration, at: Instant) {
        self.current.index_build_time = elapsed.as_secs_f64() * 1000.0;
        self.current.last_index_build = Some(at);
    }

    pub fn snapshot(&self) -> SearchMetrics {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = SearchMetrics::default();
    }
}

#[inline]
fn running_mean(old: f64, sample: f64, n: f64) -> f64 {
    (old * (n - 1.0) + sample) / n
}
