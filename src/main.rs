// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use apiscope::{
    load_endpoints, EndpointRecord, EngineConfig, FilterState, ProgressiveOptions, SearchEngine,
    SearchOptions, SearchResult,
};
use clap::Parser;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::display::{self, *};
use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "apiscope=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("APISCOPE_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> apiscope::Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Search {
            file,
            query,
            filters,
            progressive,
            batch_size,
            max_batches,
            limit,
            json,
        } => {
            let endpoints = load_shared(&file)?;
            let mut options = SearchOptions::default();
            if progressive || batch_size.is_some() || max_batches.is_some() {
                let defaults = config.progressive;
                options.progressive = Some(ProgressiveOptions {
                    batch_size: batch_size.unwrap_or(defaults.batch_size),
                    max_batches: max_batches.unwrap_or(defaults.max_batches),
                    ..defaults
                });
            }

            let engine = SearchEngine::new(config);
            let filters = FilterState::from(filters);
            let result = engine.search(&query, &endpoints, &filters, options).await?;

            if json {
                print_json(&search_json(&result, limit))?;
            } else {
                print_results(&query, &result, limit);
            }
        }

        Commands::Stats { file, query, json } => {
            let endpoints = load_shared(&file)?;
            let engine = SearchEngine::new(config);
            let filters = FilterState::default();

            // Once to build and populate, once more to exercise the cache.
            for _ in 0..2 {
                engine
                    .search(&query, &endpoints, &filters, SearchOptions::default())
                    .await?;
            }

            if json {
                print_json(&stats_json(&engine))?;
            } else {
                print_stats(&engine);
            }
        }

        Commands::Endpoints { file, json } => {
            let endpoints = load_endpoints(&file)?;
            if json {
                print_json(&serde_json::to_value(&endpoints)?)?;
            } else {
                print_endpoints(&endpoints);
            }
        }
    }

    Ok(())
}

fn load_shared(path: &Path) -> apiscope::Result<Vec<Arc<EndpointRecord>>> {
    Ok(load_endpoints(path)?.into_iter().map(Arc::new).collect())
}

fn print_json(value: &serde_json::Value) -> apiscope::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════
// JSON OUTPUT
// ═══════════════════════════════════════════════════════════════════════════

fn search_json(result: &SearchResult, limit: usize) -> serde_json::Value {
    let shown: Vec<&EndpointRecord> = result.iter().take(limit).map(Arc::as_ref).collect();
    json!({
        "searchId": result.search_id,
        "searchTime": result.search_time,
        "totalResults": result.total_results,
        "fromCache": result.from_cache,
        "endpoints": shown,
    })
}

fn stats_json(engine: &SearchEngine) -> serde_json::Value {
    let cache = engine.get_cache_stats();
    json!({
        "index": engine.get_index_stats(),
        "cache": {
            "totalEntries": cache.total_entries,
            "hitRate": cache.hit_rate,
            "maxAccessCount": cache.max_access_count,
        },
        "metrics": engine.get_search_metrics(),
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// TABLE OUTPUT
// ═══════════════════════════════════════════════════════════════════════════

fn endpoint_row(endpoint: &EndpointRecord) {
    let summary = endpoint.summary.as_deref().unwrap_or("");
    let path = pad_right(&truncate(&endpoint.path, 40), 40);
    let line = format!(
        " {} {} {} {}",
        method_badge(endpoint.method),
        path,
        dim(&truncate(summary, 26)),
        deprecated_marker(endpoint.deprecated)
    );
    row(&line);
}

fn print_results(query: &str, result: &SearchResult, limit: usize) {
    let label = if query.trim().is_empty() {
        "ALL ENDPOINTS".to_string()
    } else {
        format!("RESULTS FOR \"{}\"", truncate(query, 40))
    };
    section_top(&label);

    if result.is_empty() {
        row(&format!(" {}", dim("no matching endpoints")));
    }
    for endpoint in result.iter().take(limit) {
        endpoint_row(endpoint);
    }
    if result.len() > limit {
        row(&format!(" {}", dim(&format!("… {} more", result.len() - limit))));
    }

    section_mid("SUMMARY");
    stat_row("matches", &result.total_results.to_string());
    stat_row("search time", &timing_ms(result.search_time));
    stat_row("search id", &result.search_id);
    section_bot();
}

fn print_stats(engine: &SearchEngine) {
    let index = engine.get_index_stats();
    section_top("INDEX");
    stat_row("endpoints", &index.endpoints.to_string());
    stat_row("path segments", &index.paths.to_string());
    stat_row("methods", &index.methods.to_string());
    stat_row("tags", &index.tags.to_string());
    stat_row("summary words", &index.summary_words.to_string());
    stat_row("description words", &index.description_words.to_string());
    stat_row("operation ids", &index.operation_ids.to_string());

    let cache = engine.get_cache_stats();
    section_mid("CACHE");
    stat_row("entries", &cache.total_entries.to_string());
    stat_row("hit rate", &display::percent(cache.hit_rate));
    stat_row("max access count", &cache.max_access_count.to_string());

    let metrics = engine.get_search_metrics();
    section_mid("SEARCHES");
    stat_row("total", &metrics.total_searches.to_string());
    stat_row("cache hit rate", &display::percent(metrics.cache_hit_rate));
    stat_row("average time", &timing_ms(metrics.average_search_time));
    stat_row("index build time", &timing_ms(metrics.index_build_time));
    section_bot();
}

fn print_endpoints(endpoints: &[EndpointRecord]) {
    section_top(&format!("ENDPOINTS ({})", endpoints.len()));
    for endpoint in endpoints {
        let tags = if endpoint.tags.is_empty() {
            String::new()
        } else {
            format!("[{}]", endpoint.tags.join(", "))
        };
        let line = format!(
            " {} {} {} {} {}",
            method_badge(endpoint.method),
            pad_right(&truncate(&endpoint.path, 40), 40),
            complexity_label(endpoint.complexity),
            dim(&truncate(&tags, 20)),
            deprecated_marker(endpoint.deprecated)
        );
        row(&line);
    }
    section_bot();
}
