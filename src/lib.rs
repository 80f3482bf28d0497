// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Live-typing search over the endpoints of an OpenAPI document.
//!
//! Every keystroke in an API explorer's search box turns into a query over a
//! few hundred to a few thousand endpoint records. This crate answers those
//! queries from an inverted index that is rebuilt only when the endpoint set
//! actually changes, memoizes results per (query, filters), debounces bursts
//! of calls, and can walk very large documents in prioritized, cancellable
//! batches so the caller is never blocked for long.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────┐   ┌──────────────────┐   ┌──────────┐
//! │ tokenizer.rs │──▶│ index.rs  │──▶│ search/query.rs  │──▶│ cache.rs │
//! │(extract_words│   │ (6 maps,  │   │ (candidates +    │   │ (TTL,    │
//! │  ≥ 3 chars)  │   │ hash gate)│   │  fallback scan)  │   │  pruning)│
//! └──────────────┘   └───────────┘   └──────────────────┘   └──────────┘
//!                                             │                    │
//!        ┌──────────────┐   ┌─────────────────▼───┐   ┌────────────▼─┐
//!        │ debounce.rs  │──▶│ search/progressive  │──▶│  engine.rs   │
//!        │ (per-channel │   │ (batches, yields,   │   │ (owns it all,│
//!        │   timers)    │   │  cancellation)      │   │  metrics.rs) │
//!        └──────────────┘   └─────────────────────┘   └──────────────┘
//! ```
//!
//! `filter.rs` holds the structured predicates, `openapi.rs` turns a JSON
//! document into [`EndpointRecord`]s, and `config.rs` the engine knobs.
//!
//! # Usage
//!
//! ```no_run
//! use apiscope::{load_endpoints, FilterState, SearchEngine, SearchOptions};
//! use std::sync::Arc;
//!
//! # async fn run() -> apiscope::Result<()> {
//! let endpoints: Vec<_> = load_endpoints("openapi.json")?
//!     .into_iter()
//!     .map(Arc::new)
//!     .collect();
//!
//! let engine = SearchEngine::default();
//! let result = engine
//!     .search("users", &endpoints, &FilterState::default(), SearchOptions::default())
//!     .await?;
//! println!("{} matches in {:.2}ms", result.total_results, result.search_time);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod filter;
pub mod index;
pub mod metrics;
pub mod openapi;
pub mod search;
pub mod tokenizer;
pub mod types;

pub mod testing;

pub use cache::{cache_key, CacheStats, ResultCache};
pub use config::EngineConfig;
pub use debounce::Debouncer;
pub use engine::{SearchEngine, SearchOptions, DEFAULT_SEARCH_CHANNEL};
pub use error::{Error, Result};
pub use filter::{apply_filters, CompiledFilter, FilterState, NO_SECURITY};
pub use index::{BuildOutcome, IndexField, IndexStats, InvertedIndex};
pub use metrics::{MetricsRecorder, SearchMetrics};
pub use openapi::{classify_complexity, extract_endpoints, load_document, load_endpoints};
pub use search::{
    prioritize, run_batches, search_endpoints, Candidates, ProgressiveOptions, ProgressiveOutcome,
};
pub use tokenizer::extract_words;
pub use types::{
    Complexity, EndpointKey, EndpointRecord, HttpMethod, Parameter, RequestBody, Response,
    SearchResult, SecurityRequirement,
};
