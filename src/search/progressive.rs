// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Progressive search: bounded batches with a yield in between.
//!
//! A spec with ten thousand operations should not freeze the input box while
//! we filter it. Instead of one pass over everything, the endpoints are sorted
//! so the likely-interesting ones come first (GETs, then POSTs, then anything
//! carrying a tag the user filtered on), cut into batches, and processed one
//! batch at a time. After each batch we hand control back to the runtime.
//!
//! Cancellation is cooperative. Each session owns a [`CancellationToken`]
//! that is checked before a batch starts, never in the middle of one. A
//! cancelled run does not fail: it returns whatever the finished batches found.
//!
//! ```text
//! endpoints ──prioritize──▶ [b0][b1][b2]...[b(max-1)] ✂ rest dropped
//!                             │   │   │
//!                        select+filter, yield, check token, next
//! ```
//!
//! At most one session is live per search id. Starting a new one for the same
//! id cancels the old one first.

use super::query::Candidates;
use crate::filter::{CompiledFilter, FilterState};
use crate::types::{EndpointRecord, HttpMethod};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Priority bonus for GET endpoints.
pub const GET_PRIORITY: u32 = 10;
/// Priority bonus for POST endpoints.
pub const POST_PRIORITY: u32 = 5;
/// Priority bonus per endpoint tag that is also in the active tag filter.
pub const TAG_PRIORITY: u32 = 20;

/// Batch shape and ordering for a progressive run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressiveOptions {
    /// Endpoints per batch (default: 100). Zero is treated as one.
    pub batch_size: usize,
    /// Batches processed before the run stops (default: 10).
    pub max_batches: usize,
    /// Rank GET and POST endpoints ahead of the rest (default: true).
    pub prioritize_by_method: bool,
    /// Rank endpoints carrying filtered tags ahead of the rest (default: true).
    pub prioritize_by_tag: bool,
}

impl Default for ProgressiveOptions {
    fn default() -> Self {
        Self {
            batch_size: 100,
            max_batches: 10,
            prioritize_by_method: true,
            prioritize_by_tag: true,
        }
    }
}

// =============================================================================
// PRIORITIZATION
// =============================================================================

/// Heuristic relevance of an endpoint before any text matching.
///
/// Method and tag bonuses are additive: a GET carrying two filtered tags
/// scores `10 + 2 * 20`.
pub fn priority_score(
    endpoint: &EndpointRecord,
    options: &ProgressiveOptions,
    filters: &FilterState,
) -> u32 {
    let mut score = 0;
    if options.prioritize_by_method {
        score += match endpoint.method {
            HttpMethod::Get => GET_PRIORITY,
            HttpMethod::Post => POST_PRIORITY,
            _ => 0,
        };
    }
    if options.prioritize_by_tag && !filters.tags.is_empty() {
        let shared = endpoint
            .tags
            .iter()
            .filter(|tag| filters.tags.contains(tag))
            .count() as u32;
        score += shared * TAG_PRIORITY;
    }
    score
}

/// A copy of `endpoints`, highest priority first. Ties keep their input order.
pub fn prioritize(
    endpoints: &[Arc<EndpointRecord>],
    options: &ProgressiveOptions,
    filters: &FilterState,
) -> Vec<Arc<EndpointRecord>> {
    let mut sorted = endpoints.to_vec();
    if options.prioritize_by_method || options.prioritize_by_tag {
        // sort_by_cached_key is stable, which is what keeps ties in order.
        sorted.sort_by_cached_key(|endpoint| Reverse(priority_score(endpoint, options, filters)));
    }
    sorted
}

// =============================================================================
// SESSIONS
// =============================================================================

#[derive(Debug)]
struct Session {
    id: u64,
    token: CancellationToken,
}

/// Live progressive sessions, one slot per search id.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, Session>>,
    next_id: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `search_id`, cancelling any session already using it.
    ///
    /// The session deregisters itself when the returned guard drops.
    pub fn begin(&self, search_id: &str) -> SessionGuard<'_> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        let previous = self.sessions.lock().insert(
            search_id.to_string(),
            Session {
                id,
                token: token.clone(),
            },
        );
        if let Some(previous) = previous {
            tracing::debug!(search_id, "superseding live progressive session");
            previous.token.cancel();
        }

        SessionGuard {
            registry: self,
            search_id: search_id.to_string(),
            id,
            token,
        }
    }

    /// Cancel the session for `search_id`, if one is live.
    pub fn cancel(&self, search_id: &str) -> bool {
        match self.sessions.lock().remove(search_id) {
            Some(session) => {
                session.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every live session. Returns how many there were.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<Session> = self.sessions.lock().drain().map(|(_, s)| s).collect();
        for session in &drained {
            session.token.cancel();
        }
        if !drained.is_empty() {
            tracing::debug!(count = drained.len(), "cancelled progressive sessions");
        }
        drained.len()
    }

    /// Number of live sessions.
    pub fn active(&self) -> usize {
        self.sessions.lock().len()
    }

    fn finish(&self, search_id: &str, id: u64) {
        let mut sessions = self.sessions.lock();
        if sessions.get(search_id).is_some_and(|s| s.id == id) {
            sessions.remove(search_id);
        }
    }
}

/// A registered session. Dropping it deregisters the session, unless a newer
/// session for the same search id has already taken the slot.
#[derive(Debug)]
pub struct SessionGuard<'a> {
    registry: &'a SessionRegistry,
    search_id: String,
    id: u64,
    token: CancellationToken,
}

impl SessionGuard<'_> {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.registry.finish(&self.search_id, self.id);
    }
}

// =============================================================================
// BATCH LOOP
// =============================================================================

/// Progress report handed to the observer after each finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// Zero-based batch number.
    pub batch: usize,
    /// Matches contributed by this batch.
    pub matched: usize,
    /// Matches accumulated so far, this batch included.
    pub total: usize,
}

/// What a progressive run produced.
#[derive(Debug, Clone)]
pub struct ProgressiveOutcome {
    pub endpoints: Vec<Arc<EndpointRecord>>,
    pub batches_run: usize,
    /// True when the token stopped the run before `max_batches` were processed
    /// and unprocessed endpoints remained.
    pub cancelled: bool,
}

/// Run `candidates` over `endpoints` batch by batch.
///
/// `endpoints` is processed in the order given (prioritize first). The token is
/// checked before every batch; after every batch `observe` is called and the
/// task yields to the runtime. Never fails.
pub async fn run_batches<F>(
    candidates: &Candidates,
    endpoints: &[Arc<EndpointRecord>],
    filter: &CompiledFilter,
    options: &ProgressiveOptions,
    token: &CancellationToken,
    mut observe: F,
) -> ProgressiveOutcome
where
    F: FnMut(BatchProgress),
{
    let mut results = Vec::new();
    let mut batches_run = 0;
    let mut cancelled = false;

    for (batch, slice) in endpoints
        .chunks(options.batch_size.max(1))
        .take(options.max_batches)
        .enumerate()
    {
        if token.is_cancelled() {
            cancelled = true;
            break;
        }

        let matched = candidates.select(slice, filter);
        let count = matched.len();
        results.extend(matched);
        batches_run += 1;

        observe(BatchProgress {
            batch,
            matched: count,
            total: results.len(),
        });

        tokio::task::yield_now().await;
    }

    ProgressiveOutcome {
        endpoints: results,
        batches_run,
        cancelled,
    }
}
