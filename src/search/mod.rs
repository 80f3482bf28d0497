// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Search algorithms: where the index finally pays off.
//!
//! `query` resolves a search string against the index and filters the hits.
//! `progressive` runs the same resolution over prioritized batches, yielding
//! between them so a big spec never blocks the caller.

pub mod progressive;
pub mod query;

pub use progressive::{
    prioritize, priority_score, run_batches, BatchProgress, ProgressiveOptions,
    ProgressiveOutcome, SessionGuard, SessionRegistry,
};
pub use query::{search_endpoints, Candidates, KeySet};
