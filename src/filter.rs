// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Structured filters: the sidebar checkboxes, not the search box.
//!
//! A [`FilterState`] is a conjunction of independent predicates. Every criterion
//! left empty (or `None`) means "no constraint", so `FilterState::default()` keeps
//! everything. An endpoint survives only if it passes every active predicate.
//!
//! The path pattern is the one criterion that can be malformed. It is compiled
//! once per search in [`FilterState::compile`] and a bad pattern comes back as
//! [`Error::InvalidPathPattern`]. Validate patterns before you search with them.

use crate::error::{Error, Result};
use crate::types::{Complexity, EndpointRecord, HttpMethod};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Security filter value matching endpoints that declare no security at all.
pub const NO_SECURITY: &str = "none";

/// Caller-owned filter criteria.
///
/// Field order matters: the JSON serialization of this struct feeds the cache
/// key, and `serde_json` writes fields in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    /// Allowed methods; empty allows all.
    pub methods: Vec<HttpMethod>,
    /// Keep endpoints carrying at least one of these tags.
    pub tags: Vec<String>,
    /// Keep endpoints declaring at least one of these response codes.
    pub status_codes: Vec<String>,
    /// Exact match on the deprecated flag.
    pub deprecated: Option<bool>,
    pub complexity: Vec<Complexity>,
    /// Security-scheme substrings ("bearer", "oauth", "apikey"), or [`NO_SECURITY`].
    pub security: Vec<String>,
    /// Case-insensitive regex matched against the path.
    pub path_pattern: Option<String>,
    pub has_parameters: Option<bool>,
    pub has_request_body: Option<bool>,
}

impl FilterState {
    /// True when no criterion is active.
    pub fn is_unconstrained(&self) -> bool {
        self == &FilterState::default()
    }

    /// Validate and compile into a reusable predicate.
    pub fn compile(&self) -> Result<CompiledFilter> {
        let path_pattern = match self.path_pattern.as_deref() {
            Some(pattern) => Some(
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| Error::InvalidPathPattern {
                        pattern: pattern.to_string(),
                        source,
                    })?,
            ),
            None => None,
        };

        Ok(CompiledFilter {
            security: self.security.iter().map(|s| s.to_lowercase()).collect(),
            state: self.clone(),
            path_pattern,
        })
    }
}

/// A [`FilterState`] with its path pattern already compiled.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    state: FilterState,
    /// Lower-cased copy of `state.security`.
    security: Vec<String>,
    path_pattern: Option<Regex>,
}

impl CompiledFilter {
    /// A filter that keeps everything.
    pub fn unconstrained() -> Self {
        Self {
            state: FilterState::default(),
            security: Vec::new(),
            path_pattern: None,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Does `endpoint` pass every active predicate?
    pub fn matches(&self, endpoint: &EndpointRecord) -> bool {
        let f = &self.state;

        if !f.methods.is_empty() && !f.methods.contains(&endpoint.method) {
            return false;
        }

        if !f.tags.is_empty() && !endpoint.tags.iter().any(|tag| f.tags.contains(tag)) {
            return false;
        }

        if !f.status_codes.is_empty()
            && !endpoint
                .responses
                .keys()
                .any(|code| f.status_codes.contains(code))
        {
            return false;
        }

        if let Some(deprecated) = f.deprecated {
            if endpoint.deprecated != deprecated {
                return false;
            }
        }

        if !f.complexity.is_empty() && !f.complexity.contains(&endpoint.complexity) {
            return false;
        }

        if !self.security.is_empty() && !self.security_matches(endpoint) {
            return false;
        }

        if let Some(pattern) = &self.path_pattern {
            if !pattern.is_match(&endpoint.path) {
                return false;
            }
        }

        if let Some(has_parameters) = f.has_parameters {
            if endpoint.parameters.is_empty() == has_parameters {
                return false;
            }
        }

        if let Some(has_request_body) = f.has_request_body {
            if endpoint.request_body.is_some() != has_request_body {
                return false;
            }
        }

        true
    }

    /// Any requirement whose scheme name contains an allowed substring, or no
    /// security at all when [`NO_SECURITY`] is allowed.
    fn security_matches(&self, endpoint: &EndpointRecord) -> bool {
        if endpoint.security.is_empty() {
            return self.security.iter().any(|s| s == NO_SECURITY);
        }
        endpoint.security.iter().any(|requirement| {
            requirement.keys().any(|scheme| {
                let scheme = scheme.to_lowercase();
                self.security
                    .iter()
                    .any(|allowed| scheme.contains(allowed.as_str()))
            })
        })
    }

    /// Keep the endpoints that pass, in input order.
    pub fn apply(&self, endpoints: &[Arc<EndpointRecord>]) -> Vec<Arc<EndpointRecord>> {
        endpoints
            .iter()
            .filter(|endpoint| self.matches(endpoint))
            .cloned()
            .collect()
    }
}

/// Compile `filters` and apply them in one go.
///
/// An invalid path pattern is returned to the caller, not recovered.
pub fn apply_filters(
    endpoints: &[Arc<EndpointRecord>],
    filters: &FilterState,
) -> Result<Vec<Arc<EndpointRecord>>> {
    Ok(filters.compile()?.apply(endpoints))
}
