// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The query engine: from a search box string to a filtered endpoint list.
//!
//! Resolution happens in two steps so the progressive controller can reuse the
//! expensive half:
//!
//! 1. [`Candidates::resolve`] consults the index once. Every query word is
//!    matched as a *substring* of the indexed tokens across all six fields
//!    ("pet" finds "pets", "listpets", "petid"). Matches are collected into a
//!    set keyed by endpoint identity, so an endpoint hit by several words or
//!    fields still appears once.
//! 2. [`Candidates::select`] walks an endpoint slice, keeps the candidates and
//!    applies the structured filters.
//!
//! # Fallback scan
//!
//! When the index yields nothing at all, we fall back to a linear substring
//! scan over each endpoint's concatenated text. That covers queries whose
//! words are all too short to be indexed ("an") and matches that straddle
//! token boundaries.
//!
//! Known recall limitation: the fallback only runs when the indexed lookup
//! found *zero* candidates. A query whose words do hit the index never falls
//! back, even if the endpoint you wanted would only match via the full text.
//! This is the price of not scanning everything on every keystroke, and it is
//! kept on purpose.

use crate::filter::CompiledFilter;
use crate::index::InvertedIndex;
use crate::tokenizer::extract_words;
use crate::types::{EndpointKey, EndpointRecord, HttpMethod};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Endpoint identities, grouped by method.
///
/// Membership is checked against a record's borrowed method and path, so
/// selecting from a large snapshot allocates nothing per endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    paths: HashMap<HttpMethod, HashSet<String>>,
}

impl KeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key`. Returns false if it was already present.
    pub fn insert(&mut self, key: &EndpointKey) -> bool {
        let paths = self.paths.entry(key.method).or_default();
        if paths.contains(key.path.as_str()) {
            return false;
        }
        paths.insert(key.path.clone())
    }

    pub fn contains(&self, endpoint: &EndpointRecord) -> bool {
        self.paths
            .get(&endpoint.method)
            .is_some_and(|paths| paths.contains(endpoint.path.as_str()))
    }

    pub fn len(&self) -> usize {
        self.paths.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// How a query decided which endpoints are worth filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidates {
    /// Blank query: the index is bypassed and every endpoint is a candidate.
    All,
    /// Endpoint identities found through the index.
    Indexed(KeySet),
    /// The index found nothing; scan each endpoint's text for this needle.
    FullScan(String),
}

impl Candidates {
    /// Consult the index for `query`.
    ///
    /// The index must already reflect the snapshot being searched.
    pub fn resolve(index: &InvertedIndex, query: &str) -> Self {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Candidates::All;
        }

        let mut matched = KeySet::new();
        for word in extract_words(trimmed) {
            for key in index.matching_keys(&word) {
                matched.insert(key);
            }
        }

        if matched.is_empty() {
            tracing::trace!(query = trimmed, "no indexed candidates, falling back to full scan");
            Candidates::FullScan(trimmed.to_lowercase())
        } else {
            Candidates::Indexed(matched)
        }
    }

    /// Is `endpoint` a candidate, before filters?
    pub fn admits(&self, endpoint: &EndpointRecord) -> bool {
        match self {
            Candidates::All => true,
            Candidates::Indexed(keys) => keys.contains(endpoint),
            Candidates::FullScan(needle) => endpoint.searchable_text().contains(needle.as_str()),
        }
    }

    /// Candidates from `endpoints` that also pass `filter`, in slice order.
    pub fn select(
        &self,
        endpoints: &[Arc<EndpointRecord>],
        filter: &CompiledFilter,
    ) -> Vec<Arc<EndpointRecord>> {
        if let Candidates::All = self {
            return filter.apply(endpoints);
        }
        endpoints
            .iter()
            .filter(|endpoint| self.admits(endpoint) && filter.matches(endpoint))
            .cloned()
            .collect()
    }
}

/// Run a query against `endpoints` using the index.
///
/// No side effects beyond reading `index`. Callers build the index from the
/// same snapshot first.
pub fn search_endpoints(
    index: &InvertedIndex,
    query: &str,
    endpoints: &[Arc<EndpointRecord>],
    filter: &CompiledFilter,
) -> Vec<Arc<EndpointRecord>> {
    Candidates::resolve(index, query).select(endpoints, filter)
}
