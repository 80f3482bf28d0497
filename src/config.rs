// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config:
//!
//! ```json
//! {
//!   "cacheTtlMs": 60000,
//!   "cacheMaxEntries": 100,
//!   "cacheRetainEntries": 50,
//!   "debounceDelayMs": 300,
//!   "progressive": { "batchSize": 100, "maxBatches": 10 },
//!   "progressiveThreshold": 5000
//! }
//! ```

use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_RETAIN_ENTRIES, DEFAULT_TTL};
use crate::debounce::DEFAULT_DELAY;
use crate::error::Result;
use crate::search::ProgressiveOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,
    #[serde(default = "default_cache_retain_entries")]
    pub cache_retain_entries: usize,
    #[serde(default = "default_debounce_delay_ms")]
    pub debounce_delay_ms: u64,
    /// Batch shape used when a search runs progressively without explicit options.
    #[serde(default)]
    pub progressive: ProgressiveOptions,
    /// Snapshots with at least this many endpoints are searched progressively
    /// even when the caller did not ask for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progressive_threshold: Option<usize>,
}

fn default_cache_ttl_ms() -> u64 {
    DEFAULT_TTL.as_millis() as u64
}

fn default_cache_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_cache_retain_entries() -> usize {
    DEFAULT_RETAIN_ENTRIES
}

fn default_debounce_delay_ms() -> u64 {
    DEFAULT_DELAY.as_millis() as u64
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl_ms: default_cache_ttl_ms(),
            cache_max_entries: default_cache_max_entries(),
            cache_retain_entries: default_cache_retain_entries(),
            debounce_delay_ms: default_debounce_delay_ms(),
            progressive: ProgressiveOptions::default(),
            progressive_threshold: None,
        }
    }
}

impl EngineConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_delay_ms)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }
}
