// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Everything that can go wrong, which is deliberately not much.
//!
//! Indexing, querying, caching and debouncing are total over well-typed input.
//! The only failure a search can surface is a path pattern that does not compile,
//! and that one is the caller's to fix: we never swallow it and never guess.
//! The rest of the variants belong to the edges (document loading, the CLI,
//! strings that should have been enums).

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// `FilterState::path_pattern` is not a valid regular expression.
    #[error("invalid path pattern '{pattern}': {source}")]
    InvalidPathPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown HTTP method '{0}'")]
    UnknownMethod(String),

    #[error("unknown complexity '{0}' (expected simple, moderate or complex)")]
    UnknownComplexity(String),

    /// Debounced work needs a Tokio runtime to park its timer on.
    #[error("debounced search requires a running Tokio runtime")]
    NoRuntime,

    /// The OpenAPI document is structurally unusable.
    #[error("malformed API document: {0}")]
    Document(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
