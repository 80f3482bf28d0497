// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Inverted index construction over an endpoint snapshot.
//!
//! Six independent maps, one per searchable field, each from a normalized token
//! to the positions of the endpoints carrying it. Positions point into the key
//! table captured at build time, so the index never holds on to the records
//! themselves.
//!
//! A live-typing UI calls `build` on every keystroke with the same snapshot.
//! Rebuilding each time would be O(n) work for nothing, so every build first
//! fingerprints the snapshot (crc32 over the sorted `METHOD path` keys) and
//! does nothing if the fingerprint matches the previous build.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **METHOD_COMPLETE**: every endpoint of the built snapshot appears in the
//!    method map. Method is the one field that is never absent.
//! 2. **WHOLESALE**: a build clears all six maps before inserting. The index is
//!    never patched in place, and a build never yields, so no reader observes a
//!    half-built index.
//! 3. **POSITIONS_VALID**: every posting is `< keys.len()`.

use crate::tokenizer::extract_words;
use crate::types::{EndpointKey, EndpointRecord};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Which endpoint field a token came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexField {
    Path,
    Method,
    Tag,
    Summary,
    Description,
    OperationId,
}

impl IndexField {
    pub const ALL: [IndexField; 6] = [
        IndexField::Path,
        IndexField::Method,
        IndexField::Tag,
        IndexField::Summary,
        IndexField::Description,
        IndexField::OperationId,
    ];

    #[inline]
    fn slot(self) -> usize {
        match self {
            IndexField::Path => 0,
            IndexField::Method => 1,
            IndexField::Tag => 2,
            IndexField::Summary => 3,
            IndexField::Description => 4,
            IndexField::OperationId => 5,
        }
    }
}

/// What a call to [`InvertedIndex::build`] actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Snapshot fingerprint unchanged; the index was left alone.
    Skipped,
    /// All six maps were cleared and repopulated.
    Rebuilt { endpoints: usize, elapsed: Duration },
}

/// Distinct-token counts per field, plus the snapshot size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub paths: usize,
    pub methods: usize,
    pub tags: usize,
    pub summary_words: usize,
    pub description_words: usize,
    pub operation_ids: usize,
    pub endpoints: usize,
}

/// Token → endpoint positions, per field.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    fields: [HashMap<String, Vec<usize>>; 6],
    keys: Vec<EndpointKey>,
    fingerprint: Option<u32>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stable hash of a snapshot's endpoint identities.
    ///
    /// Order-independent: the `METHOD path` keys are sorted before hashing, so
    /// reordering the snapshot does not force a rebuild.
    pub fn snapshot_fingerprint(endpoints: &[Arc<EndpointRecord>]) -> u32 {
        let mut keys: Vec<String> = endpoints
            .iter()
            .map(|endpoint| format!("{}{}", endpoint.method, endpoint.path))
            .collect();
        keys.sort_unstable();
        crc32fast::hash(keys.join("|").as_bytes())
    }

    /// Fingerprint of the last build, if any.
    pub fn fingerprint(&self) -> Option<u32> {
        self.fingerprint
    }

    /// Rebuild from `endpoints` unless the snapshot is unchanged.
    pub fn build(&mut self, endpoints: &[Arc<EndpointRecord>]) -> BuildOutcome {
        let fingerprint = Self::snapshot_fingerprint(endpoints);
        if self.fingerprint == Some(fingerprint) {
            tracing::trace!(fingerprint, "index build skipped, snapshot unchanged");
            return BuildOutcome::Skipped;
        }

        let started = Instant::now();
        self.clear();

        for (position, endpoint) in endpoints.iter().enumerate() {
            self.keys.push(endpoint.key());

            for segment in endpoint.path.to_lowercase().split('/') {
                if !segment.is_empty() {
                    self.insert(IndexField::Path, segment.to_string(), position);
                }
            }

            self.insert(
                IndexField::Method,
                endpoint.method.as_lower().to_string(),
                position,
            );

            for tag in &endpoint.tags {
                self.insert(IndexField::Tag, tag.to_lowercase(), position);
            }

            if let Some(summary) = &endpoint.summary {
                for word in extract_words(summary) {
                    self.insert(IndexField::Summary, word, position);
                }
            }

            if let Some(description) = &endpoint.description {
                for word in extract_words(description) {
                    self.insert(IndexField::Description, word, position);
                }
            }

            if let Some(operation_id) = &endpoint.operation_id {
                self.insert(IndexField::OperationId, operation_id.to_lowercase(), position);
            }
        }

        self.fingerprint = Some(fingerprint);
        let elapsed = started.elapsed();
        tracing::debug!(
            endpoints = endpoints.len(),
            elapsed_us = elapsed.as_micros() as u64,
            fingerprint,
            "search index rebuilt"
        );

        BuildOutcome::Rebuilt {
            endpoints: endpoints.len(),
            elapsed,
        }
    }

    #[inline]
    fn insert(&mut self, field: IndexField, token: String, position: usize) {
        self.fields[field.slot()]
            .entry(token)
            .or_default()
            .push(position);
    }

    /// Drop every map and forget the fingerprint.
    pub fn clear(&mut self) {
        for map in &mut self.fields {
            map.clear();
        }
        self.keys.clear();
        self.fingerprint = None;
    }

    /// Number of endpoints in the built snapshot.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Exact-token lookup in one field.
    pub fn postings(&self, field: IndexField, token: &str) -> Option<&[usize]> {
        self.fields[field.slot()].get(token).map(Vec::as_slice)
    }

    /// Endpoint identity at a posting position.
    pub fn key_at(&self, position: usize) -> Option<&EndpointKey> {
        self.keys.get(position)
    }

    /// Every endpoint whose token, in any field, contains `word` as a substring.
    ///
    /// May yield the same key more than once (several fields, several tokens).
    pub fn matching_keys<'a>(&'a self, word: &'a str) -> impl Iterator<Item = &'a EndpointKey> + 'a {
        self.fields
            .iter()
            .flat_map(move |map| {
                map.iter()
                    .filter(move |(token, _)| token.contains(word))
                    .flat_map(|(_, positions)| positions.iter())
            })
            .filter_map(move |&position| self.keys.get(position))
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            paths: self.fields[IndexField::Path.slot()].len(),
            methods: self.fields[IndexField::Method.slot()].len(),
            tags: self.fields[IndexField::Tag.slot()].len(),
            summary_words: self.fields[IndexField::Summary.slot()].len(),
            description_words: self.fields[IndexField::Description.slot()].len(),
            operation_ids: self.fields[IndexField::OperationId.slot()].len(),
            endpoints: self.keys.len(),
        }
    }
}
