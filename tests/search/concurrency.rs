//! One engine shared by tasks searching different snapshots at once.

use super::common::{make_endpoint, shared};
use apiscope::{EndpointRecord, FilterState, HttpMethod, SearchEngine, SearchOptions};
use std::sync::Arc;

const TASKS: usize = 4;
const ROUNDS: usize = 2_000;

/// Runs `ROUNDS` searches per task, alternating between two one-endpoint
/// snapshots, and counts results that are not exactly the caller's endpoint.
async fn wrong_results(options: SearchOptions) -> usize {
    let engine = Arc::new(SearchEngine::default());
    let alpha = shared(vec![make_endpoint(HttpMethod::Get, "/alpha/items")]);
    let beta = shared(vec![make_endpoint(HttpMethod::Post, "/beta/items")]);

    let mut handles = Vec::with_capacity(TASKS);
    for task in 0..TASKS {
        let engine = Arc::clone(&engine);
        let (alpha, beta) = (alpha.clone(), beta.clone());
        handles.push(tokio::spawn(async move {
            let filters = FilterState::default();
            let mut wrong = 0;
            for round in 0..ROUNDS {
                let snapshot: &[Arc<EndpointRecord>] =
                    if (round + task) % 2 == 0 { &alpha } else { &beta };
                let result = engine.search("items", snapshot, &filters, options).await.unwrap();
                let own = result.iter().all(|hit| Arc::ptr_eq(hit, &snapshot[0]));
                if result.total_results != 1 || !own {
                    wrong += 1;
                }
            }
            wrong
        }));
    }

    let mut wrong = 0;
    for handle in handles {
        wrong += handle.await.unwrap();
    }
    wrong
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn interleaved_rebuilds_never_leak_candidates() {
    assert_eq!(wrong_results(SearchOptions::uncached()).await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn interleaved_rebuilds_never_serve_foreign_cache_entries() {
    assert_eq!(wrong_results(SearchOptions::default()).await, 0);
}
