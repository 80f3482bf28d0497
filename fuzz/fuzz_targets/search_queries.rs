// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for query handling.
//!
//! Arbitrary bytes go through the tokenizer and the query engine. Whatever the
//! user pastes into the search box (emoji, RTL text, null bytes, a whole
//! OpenAPI document) must not panic, must not invent endpoints and must not
//! return one twice.

#![no_main]

use apiscope::testing::petstore;
use apiscope::{extract_words, search_endpoints, CompiledFilter, InvertedIndex};
use libfuzzer_sys::fuzz_target;
use std::collections::HashSet;

fuzz_target!(|query: &[u8]| {
    // Cap the length so one input can't time the run out.
    let query: String = String::from_utf8_lossy(query).chars().take(256).collect();
    let query = query.as_str();

    // Tokens are lowercase and never shorter than three characters.
    for word in extract_words(query) {
        assert!(word.chars().count() >= 3, "short token {:?}", word);
        assert_eq!(word, word.to_lowercase());
    }

    let endpoints = petstore();
    let mut index = InvertedIndex::new();
    index.build(&endpoints);

    let results = search_endpoints(&index, query, &endpoints, &CompiledFilter::unconstrained());

    let keys: HashSet<_> = results.iter().map(|e| e.key()).collect();
    assert_eq!(keys.len(), results.len(), "duplicate endpoint for {:?}", query);

    let known: HashSet<_> = endpoints.iter().map(|e| e.key()).collect();
    assert!(keys.is_subset(&known));

    if query.trim().is_empty() {
        assert_eq!(results.len(), endpoints.len());
    }
});
