// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-channel debouncing on the Tokio timer.
//!
//! A channel (usually a search id) holds at most one pending task. Scheduling
//! on a busy channel aborts the pending task and replaces it, so out of a burst
//! of calls only the last one inside the delay window runs.
//!
//! Every schedule gets a fresh generation number. A task that has already fired
//! can't be aborted any more, but it can ask [`Debouncer::is_current`] whether
//! a newer call has since been scheduled on its channel and drop its result.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **SINGLE_SLOT**: at most one pending (not yet fired) task per channel.
//! 2. **NO_LEAKS**: `cancel_all` aborts every pending task and forgets every
//!    channel; tasks that already fired see themselves as stale afterwards.

use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Delay used when a schedule call does not name one.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug)]
struct Slot {
    generation: u64,
    /// `Some` while the timer is still sleeping.
    pending: Option<JoinHandle<()>>,
}

#[derive(Debug)]
pub struct Debouncer {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
    generations: AtomicU64,
    delay: Duration,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            generations: AtomicU64::new(0),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` on `channel` after `delay` (or the default), replacing any
    /// task still pending there.
    ///
    /// Returns the generation handed to `task`. Fails with [`Error::NoRuntime`]
    /// outside a Tokio runtime.
    pub fn schedule<F, Fut>(&self, channel: &str, delay: Option<Duration>, task: F) -> Result<u64>
    where
        F: FnOnce(u64) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        let delay = delay.unwrap_or(self.delay);
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;

        let slots = Arc::clone(&self.slots);
        let key = channel.to_string();

        // The lock is held across spawn so the task cannot observe the slot
        // before its own handle is stored.
        let mut guard = self.slots.lock();
        if let Some(previous) = guard.get_mut(channel).and_then(|slot| slot.pending.take()) {
            previous.abort();
            tracing::debug!(channel, "debounced call replaced");
        }

        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut slots = slots.lock();
                match slots.get_mut(&key) {
                    Some(slot) if slot.generation == generation => slot.pending = None,
                    _ => return,
                }
            }

            task(generation).await;

            let mut slots = slots.lock();
            if slots
                .get(&key)
                .is_some_and(|slot| slot.generation == generation && slot.pending.is_none())
            {
                slots.remove(&key);
            }
        });

        guard.insert(
            channel.to_string(),
            Slot {
                generation,
                pending: Some(handle),
            },
        );
        Ok(generation)
    }

    /// Is `generation` still the latest call scheduled on `channel`?
    pub fn is_current(&self, channel: &str, generation: u64) -> bool {
        self.slots
            .lock()
            .get(channel)
            .is_some_and(|slot| slot.generation == generation)
    }

    /// Tasks still waiting for their timer.
    pub fn pending(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.pending.is_some())
            .count()
    }

    /// Abort every pending task and forget every channel.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<Slot> = self.slots.lock().drain().map(|(_, slot)| slot).collect();
        let mut aborted = 0;
        for handle in drained.into_iter().filter_map(|slot| slot.pending) {
            handle.abort();
            aborted += 1;
        }
        if aborted > 0 {
            tracing::debug!(aborted, "cleared debounce timers");
        }
        aborted
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
