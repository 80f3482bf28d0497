// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for structured filters.
//!
//! Builds arbitrary filter states (including garbage path patterns) and checks
//! that compiling either fails cleanly or yields a filter whose output is an
//! order-preserving subset of its input, stable under a second application.

#![no_main]

use apiscope::testing::petstore;
use apiscope::{Complexity, FilterState, HttpMethod};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

#[derive(Debug, Arbitrary)]
struct Input {
    methods: Vec<u8>,
    tags: Vec<String>,
    status_codes: Vec<String>,
    deprecated: Option<bool>,
    complexity: Vec<u8>,
    security: Vec<String>,
    path_pattern: Option<String>,
    has_parameters: Option<bool>,
    has_request_body: Option<bool>,
}

impl From<Input> for FilterState {
    fn from(input: Input) -> Self {
        const COMPLEXITY: [Complexity; 3] =
            [Complexity::Simple, Complexity::Moderate, Complexity::Complex];
        FilterState {
            methods: input
                .methods
                .iter()
                .map(|b| HttpMethod::ALL[*b as usize % HttpMethod::ALL.len()])
                .collect(),
            tags: input.tags,
            status_codes: input.status_codes,
            deprecated: input.deprecated,
            complexity: input
                .complexity
                .iter()
                .map(|b| COMPLEXITY[*b as usize % COMPLEXITY.len()])
                .collect(),
            security: input.security,
            // Keep regex compilation cheap.
            path_pattern: input.path_pattern.map(|p| p.chars().take(64).collect()),
            has_parameters: input.has_parameters,
            has_request_body: input.has_request_body,
        }
    }
}

fuzz_target!(|input: Input| {
    let state = FilterState::from(input);
    let Ok(filter) = state.compile() else {
        return;
    };

    let endpoints = petstore();
    let kept = filter.apply(&endpoints);
    assert!(kept.len() <= endpoints.len());

    // Order-preserving subset.
    let mut cursor = endpoints.iter();
    for endpoint in &kept {
        assert!(cursor.any(|e| Arc::ptr_eq(e, endpoint)));
    }

    // Idempotent.
    assert_eq!(filter.apply(&kept).len(), kept.len());
});
