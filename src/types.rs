// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks the search engine reads.
//!
//! An [`EndpointRecord`] is one HTTP operation lifted out of an API description.
//! The caller owns these; the engine only ever reads them, and it shares them
//! behind `Arc` so results, cache entries and batch slices can all point at the
//! same record without copying its response schemas around.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **EndpointRecord**: `method` is always present. The index relies on this:
//!   every record lands in the method map even when it has no tags, no summary
//!   and no operationId.
//!
//! - **EndpointKey**: `METHOD path` is the identity the index, the build
//!   fingerprint and candidate selection all agree on. Two records with the same
//!   method and path are the same endpoint as far as search is concerned.
//!
//! - **SearchResult**: immutable once produced. `total_results == endpoints.len()`.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

// =============================================================================
// ENUM-LIKE STRINGS
// =============================================================================

/// HTTP operation verb.
///
/// Accepts any casing on the way in ("get", "GET", "Get") and always writes
/// the upper-case form back out, which is what the UI displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Every method an OpenAPI path item may declare, in document order.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// Lower-case form, as used for index keys and OpenAPI path-item fields.
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownMethod(s.to_string()))
    }
}

impl TryFrom<String> for HttpMethod {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HttpMethod> for String {
    fn from(method: HttpMethod) -> Self {
        method.as_str().to_string()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rough effort bucket for calling an endpoint.
///
/// Computed by whoever produced the record (see `openapi::classify_complexity`);
/// the engine only filters on it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Complexity {
    #[default]
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Moderate => "moderate",
            Complexity::Complex => "complex",
        }
    }
}

impl FromStr for Complexity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Complexity::Simple),
            "moderate" => Ok(Complexity::Moderate),
            "complex" => Ok(Complexity::Complex),
            _ => Err(Error::UnknownComplexity(s.to_string())),
        }
    }
}

impl TryFrom<String> for Complexity {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Complexity> for String {
    fn from(complexity: Complexity) -> Self {
        complexity.as_str().to_string()
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ENDPOINT RECORD
// =============================================================================

/// One security requirement object: scheme name → required scopes.
pub type SecurityRequirement = BTreeMap<String, Vec<String>>;

/// A declared response for one status code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Response {
    pub description: Option<String>,
    /// Media type → schema object, passed through untouched.
    pub content: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    /// `path`, `query`, `header` or `cookie`.
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub schema: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestBody {
    pub description: Option<String>,
    pub required: bool,
    pub content: BTreeMap<String, serde_json::Value>,
}

/// One HTTP operation from an API description.
///
/// Immutable for the lifetime of an index build. The wire shape matches the
/// endpoint objects the explorer UI hands over, hence `camelCase`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointRecord {
    pub path: String,
    pub method: HttpMethod,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub operation_id: Option<String>,
    /// Status code ("200", "404", "default") → response.
    #[serde(default)]
    pub responses: BTreeMap<String, Response>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub security: Vec<SecurityRequirement>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub request_body: Option<RequestBody>,
}

impl EndpointRecord {
    /// A bare record with only method and path set.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            tags: Vec::new(),
            summary: None,
            description: None,
            operation_id: None,
            responses: BTreeMap::new(),
            deprecated: false,
            complexity: Complexity::default(),
            security: Vec::new(),
            parameters: Vec::new(),
            request_body: None,
        }
    }

    /// Identity used by the index and by candidate selection.
    pub fn key(&self) -> EndpointKey {
        EndpointKey {
            method: self.method,
            path: self.path.clone(),
        }
    }

    /// Every text field concatenated and lower-cased, for the linear fallback scan.
    ///
    /// Field order: path, method, summary, description, operationId, tags.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(5 + self.tags.len());
        parts.push(&self.path);
        parts.push(self.method.as_str());
        parts.push(self.summary.as_deref().unwrap_or(""));
        parts.push(self.description.as_deref().unwrap_or(""));
        parts.push(self.operation_id.as_deref().unwrap_or(""));
        parts.extend(self.tags.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }
}

/// `METHOD path`, the identity of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointKey {
    pub method: HttpMethod,
    pub path: String,
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

// =============================================================================
// SEARCH RESULT
// =============================================================================

/// What a search hands back.
///
/// Cheap to clone: the endpoint list is an `Arc<[_]>` shared with the cache.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub endpoints: Arc<[Arc<EndpointRecord>]>,
    /// Wall time of the call that produced *this* value, in milliseconds.
    /// For a cache hit that is the lookup time, not the original search.
    pub search_time: f64,
    pub total_results: usize,
    pub search_id: String,
    pub from_cache: bool,
}

impl SearchResult {
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<EndpointRecord>> {
        self.endpoints.iter()
    }
}
