// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search engine: one explicitly owned instance holding the index, the
//! result cache, the metrics, the debounce timers and the progressive sessions.
//!
//! Lifecycle is `new → use → destroy`. Nothing is global; two engines never
//! share state.
//!
//! ```text
//! search(query, endpoints, filters)
//!   │
//!   ├─ compile filters ─────────────── bad pattern? → Err(InvalidPathPattern)
//!   ├─ ┌ build index (skipped if the snapshot fingerprint is unchanged)
//!   │  │ cache lookup by search id ──── hit for this snapshot? → fresh searchTime
//!   │  └ resolve candidates             (one index lock, write then downgraded)
//!   ├─ direct:       filter the whole slice
//!   │  progressive:  resolve once, prioritize, batch, yield, check token
//!   ├─ cache put (unless the progressive run was cancelled)
//!   └─ record metrics
//! ```
//!
//! All locks are `parking_lot` and none is held across an `.await`: each step
//! above is a synchronous critical section, so no caller ever observes a
//! half-built index or a half-written cache entry. Building the index and
//! reading candidates out of it happen under one lock, so a concurrent search
//! over another snapshot cannot rebuild the index in between. The only
//! suspension points are the debounce timer and the inter-batch yield.
//!
//! Lock order is index, then cache, then metrics.

use crate::cache::{cache_key, CacheStats, ResultCache};
use crate::config::EngineConfig;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::filter::FilterState;
use crate::index::{BuildOutcome, IndexStats, InvertedIndex};
use crate::metrics::{MetricsRecorder, SearchMetrics};
use crate::search::{prioritize, run_batches, Candidates, ProgressiveOptions, SessionRegistry};
use crate::types::{EndpointRecord, SearchResult};
use parking_lot::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Debounce channel used when the caller does not name one.
pub const DEFAULT_SEARCH_CHANNEL: &str = "default";

/// Per-call search options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    /// Consult and populate the result cache (default: true).
    pub use_cache: bool,
    /// Run progressively with these options. `None` searches directly unless
    /// the snapshot reaches the configured progressive threshold.
    pub progressive: Option<ProgressiveOptions>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            progressive: None,
        }
    }
}

impl SearchOptions {
    pub fn progressive(options: ProgressiveOptions) -> Self {
        Self {
            progressive: Some(options),
            ..Self::default()
        }
    }

    pub fn uncached() -> Self {
        Self {
            use_cache: false,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct SearchEngine {
    config: EngineConfig,
    index: RwLock<InvertedIndex>,
    cache: Mutex<ResultCache>,
    metrics: Mutex<MetricsRecorder>,
    debouncer: Debouncer,
    sessions: SessionRegistry,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SearchEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            index: RwLock::new(InvertedIndex::new()),
            cache: Mutex::new(ResultCache::new(
                config.cache_ttl(),
                config.cache_max_entries,
                config.cache_retain_entries,
            )),
            metrics: Mutex::new(MetricsRecorder::new()),
            debouncer: Debouncer::new(config.debounce_delay()),
            sessions: SessionRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The id a search for `query` under `filters` is cached and tracked under.
    pub fn search_id(query: &str, filters: &FilterState) -> String {
        cache_key(query, filters)
    }

    // =========================================================================
    // INDEX
    // =========================================================================

    /// Bring the index up to date with `endpoints`.
    ///
    /// A no-op (and no metrics update) when the snapshot's method+path set is
    /// unchanged since the last build.
    pub fn build_search_index(&self, endpoints: &[Arc<EndpointRecord>]) -> BuildOutcome {
        self.refresh_index(endpoints).1
    }

    /// Build for `endpoints` and hand back the index, still locked for reading.
    ///
    /// On a rebuild, cached results of the previous snapshot are evicted.
    fn refresh_index(
        &self,
        endpoints: &[Arc<EndpointRecord>],
    ) -> (RwLockReadGuard<'_, InvertedIndex>, BuildOutcome) {
        let mut index = self.index.write();
        let outcome = index.build(endpoints);
        if let BuildOutcome::Rebuilt { elapsed, .. } = outcome {
            self.cache.lock().retain_snapshot(index.fingerprint());
            self.metrics.lock().record_index_build(elapsed, Instant::now());
        }
        (RwLockWriteGuard::downgrade(index), outcome)
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    /// Search `endpoints` for `query` under `filters`.
    ///
    /// Fails only when the path pattern does not compile. A progressive run
    /// superseded by a newer one with the same search id returns what it had
    /// found so far.
    pub async fn search(
        &self,
        query: &str,
        endpoints: &[Arc<EndpointRecord>],
        filters: &FilterState,
        options: SearchOptions,
    ) -> Result<SearchResult> {
        let started = std::time::Instant::now();
        let filter = filters.compile()?;
        let search_id = cache_key(query, filters);

        // The guard must be gone before the first `.await`.
        let (snapshot, candidates) = {
            let (index, _) = self.refresh_index(endpoints);
            let snapshot = index.fingerprint();

            if options.use_cache {
                let cached = self.cache.lock().get(&search_id, snapshot, Instant::now());
                if let Some(mut hit) = cached {
                    hit.search_time = elapsed_ms(started);
                    hit.from_cache = true;
                    self.metrics.lock().record_search(hit.search_time, true);
                    return Ok(hit);
                }
            }

            (snapshot, Candidates::resolve(&index, query))
        };

        let progressive = options.progressive.or(match self.config.progressive_threshold {
            Some(threshold) if endpoints.len() >= threshold => Some(self.config.progressive),
            _ => None,
        });

        let (found, cancelled) = match progressive {
            None => (candidates.select(endpoints, &filter), false),
            Some(progressive) => {
                let session = self.sessions.begin(&search_id);
                let ordered = prioritize(endpoints, &progressive, filters);
                let outcome = run_batches(
                    &candidates,
                    &ordered,
                    &filter,
                    &progressive,
                    session.token(),
                    |progress| {
                        tracing::trace!(
                            batch = progress.batch,
                            matched = progress.matched,
                            total = progress.total,
                            "progressive batch done"
                        )
                    },
                )
                .await;
                drop(session);

                if outcome.cancelled {
                    tracing::debug!(
                        search_id = search_id.as_str(),
                        batches = outcome.batches_run,
                        "progressive search cancelled"
                    );
                }
                (outcome.endpoints, outcome.cancelled)
            }
        };

        let search_time = elapsed_ms(started);
        let result = SearchResult {
            total_results: found.len(),
            endpoints: found.into(),
            search_time,
            search_id,
            from_cache: false,
        };

        if options.use_cache && !cancelled {
            self.cache
                .lock()
                .put(result.search_id.clone(), result.clone(), snapshot, Instant::now());
        }
        self.metrics.lock().record_search(search_time, false);

        Ok(result)
    }

    /// Debounced [`search`](Self::search) on the channel `search_id`
    /// (default [`DEFAULT_SEARCH_CHANNEL`]).
    ///
    /// Out of a burst of calls on one channel, only the last one inside the
    /// delay window runs, and its result reaches `callback` only if no newer
    /// call was scheduled while it ran. The filters are validated up front, so
    /// a bad path pattern fails here instead of inside the timer.
    pub fn debounced_search<F>(
        self: &Arc<Self>,
        query: impl Into<String>,
        endpoints: Vec<Arc<EndpointRecord>>,
        filters: FilterState,
        callback: F,
        delay: Option<Duration>,
        search_id: Option<&str>,
    ) -> Result<()>
    where
        F: FnOnce(SearchResult) + Send + 'static,
    {
        filters.compile()?;

        let query = query.into();
        let channel = search_id.unwrap_or(DEFAULT_SEARCH_CHANNEL).to_string();
        let engine = Arc::clone(self);
        let task_channel = channel.clone();

        self.debouncer.schedule(&channel, delay, move |generation| async move {
            let outcome = engine
                .search(&query, &endpoints, &filters, SearchOptions::default())
                .await;

            if !engine.debouncer.is_current(&task_channel, generation) {
                tracing::debug!(channel = task_channel.as_str(), "dropping superseded debounced result");
                return;
            }
            match outcome {
                Ok(result) => callback(result),
                Err(error) => tracing::warn!(%error, "debounced search failed"),
            }
        })?;
        Ok(())
    }

    // =========================================================================
    // INTROSPECTION
    // =========================================================================

    pub fn get_search_metrics(&self) -> SearchMetrics {
        self.metrics.lock().snapshot()
    }

    pub fn get_index_stats(&self) -> IndexStats {
        self.index.read().stats()
    }

    pub fn get_cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    pub fn pending_debounced(&self) -> usize {
        self.debouncer.pending()
    }

    pub fn active_progressive_sessions(&self) -> usize {
        self.sessions.active()
    }

    // =========================================================================
    // TEARDOWN
    // =========================================================================

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    /// Abort every pending debounced search. Returns how many were pending.
    pub fn clear_debounce_timers(&self) -> usize {
        self.debouncer.cancel_all()
    }

    /// Cancel one progressive session.
    pub fn cancel_progressive_search(&self, search_id: &str) -> bool {
        self.sessions.cancel(search_id)
    }

    /// Cancel every progressive session. Returns how many were live.
    pub fn cancel_progressive_searches(&self) -> usize {
        self.sessions.cancel_all()
    }

    /// Clear the cache, the timers, the sessions and the index.
    ///
    /// Metrics survive; the engine stays usable and rebuilds on the next search.
    pub fn destroy(&self) {
        self.clear_cache();
        let timers = self.clear_debounce_timers();
        let sessions = self.cancel_progressive_searches();
        self.index.write().clear();
        tracing::debug!(timers, sessions, "search engine torn down");
    }
}

#[inline]
fn elapsed_ms(started: std::time::Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
