// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the apiscope command-line interface.
//!
//! Three subcommands over an OpenAPI/Swagger JSON file: `search` runs a query
//! through the engine (directly or progressively), `stats` shows what the
//! index, cache and metrics look like after a couple of searches, and
//! `endpoints` lists what was extracted from the document.

pub mod display;

use apiscope::{Complexity, FilterState, HttpMethod};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "apiscope",
    about = "Live search over the endpoints of an OpenAPI document",
    version
)]
pub struct Cli {
    /// Engine configuration (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging (overridden by APISCOPE_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the endpoints of a document
    Search {
        /// OpenAPI or Swagger JSON file
        file: PathBuf,

        /// Search query (empty lists everything that passes the filters)
        #[arg(default_value = "")]
        query: String,

        #[command(flatten)]
        filters: FilterArgs,

        /// Search in prioritized batches
        #[arg(long)]
        progressive: bool,

        /// Endpoints per batch (implies --progressive)
        #[arg(long)]
        batch_size: Option<usize>,

        /// Batches to run before stopping (implies --progressive)
        #[arg(long)]
        max_batches: Option<usize>,

        /// Maximum number of results to print
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show index, cache and search statistics for a document
    Stats {
        /// OpenAPI or Swagger JSON file
        file: PathBuf,

        /// Query used for the warm-up searches
        #[arg(long, default_value = "")]
        query: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the endpoints extracted from a document
    Endpoints {
        /// OpenAPI or Swagger JSON file
        file: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Filter flags, one per `FilterState` criterion. Repeat a flag to allow
/// several values.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Allowed HTTP method
    #[arg(short, long = "method")]
    pub methods: Vec<HttpMethod>,

    /// Required tag (any of)
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Declared response status code (any of)
    #[arg(long = "status")]
    pub status_codes: Vec<String>,

    /// Only deprecated (true) or only current (false) endpoints
    #[arg(long)]
    pub deprecated: Option<bool>,

    /// Allowed complexity: simple, moderate or complex
    #[arg(long)]
    pub complexity: Vec<Complexity>,

    /// Security scheme substring, or "none" for unsecured endpoints
    #[arg(long)]
    pub security: Vec<String>,

    /// Case-insensitive regex over the path
    #[arg(long = "path")]
    pub path_pattern: Option<String>,

    /// Endpoints with (true) or without (false) parameters
    #[arg(long)]
    pub has_parameters: Option<bool>,

    /// Endpoints with (true) or without (false) a request body
    #[arg(long)]
    pub has_request_body: Option<bool>,
}

impl From<FilterArgs> for FilterState {
    fn from(args: FilterArgs) -> Self {
        FilterState {
            methods: args.methods,
            tags: args.tags,
            status_codes: args.status_codes,
            deprecated: args.deprecated,
            complexity: args.complexity,
            security: args.security,
            path_pattern: args.path_pattern,
            has_parameters: args.has_parameters,
            has_request_body: args.has_request_body,
        }
    }
}
