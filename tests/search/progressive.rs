//! Progressive (batched, cancellable) search.

use super::common::{keys, make_tagged, numbered_items, petstore, shared};
use apiscope::search::{prioritize, run_batches, Candidates, SessionRegistry};
use apiscope::{
    CompiledFilter, FilterState, HttpMethod, InvertedIndex, ProgressiveOptions, SearchEngine,
    SearchOptions,
};
use std::sync::Arc;

fn one_per_batch(max_batches: usize) -> ProgressiveOptions {
    ProgressiveOptions {
        batch_size: 1,
        max_batches,
        ..Default::default()
    }
}

#[tokio::test]
async fn max_batches_bounds_the_result() {
    let engine = SearchEngine::default();
    let items = numbered_items(5);
    let result = engine
        .search("items", &items, &FilterState::default(), SearchOptions::progressive(one_per_batch(2)))
        .await
        .unwrap();

    assert_eq!(keys(result.iter()), vec!["GET /items/0", "GET /items/1"]);
    assert_eq!(result.total_results, 2);
    assert_eq!(engine.active_progressive_sessions(), 0);
}

#[tokio::test]
async fn enough_batches_match_direct_search() {
    let engine = SearchEngine::default();
    let store = petstore();
    let options = ProgressiveOptions {
        batch_size: 2,
        prioritize_by_method: false,
        prioritize_by_tag: false,
        ..Default::default()
    };

    let direct = engine
        .search("pet", &store, &FilterState::default(), SearchOptions::uncached())
        .await
        .unwrap();
    let progressive = engine
        .search("pet", &store, &FilterState::default(), SearchOptions {
            use_cache: false,
            progressive: Some(options),
        })
        .await
        .unwrap();
    assert_eq!(keys(direct.iter()), keys(progressive.iter()));
}

#[tokio::test]
async fn prioritization_surfaces_tagged_gets_first() {
    let endpoints = shared(vec![
        make_tagged(HttpMethod::Delete, "/a", &["billing"]),
        make_tagged(HttpMethod::Post, "/b", &[]),
        make_tagged(HttpMethod::Get, "/c", &[]),
        make_tagged(HttpMethod::Get, "/d", &["billing"]),
    ]);
    let filters = FilterState {
        tags: vec!["billing".to_string()],
        ..Default::default()
    };

    let ordered = prioritize(&endpoints, &ProgressiveOptions::default(), &filters);
    // /d: 10 + 20, /a: 20, /c: 10, /b: 5
    assert_eq!(keys(&ordered), vec!["GET /d", "DELETE /a", "GET /c", "POST /b"]);

    let engine = SearchEngine::default();
    let result = engine
        .search("", &endpoints, &filters, SearchOptions::progressive(one_per_batch(1)))
        .await
        .unwrap();
    assert_eq!(keys(result.iter()), vec!["GET /d"]);
}

#[tokio::test]
async fn cancelling_before_the_second_batch_keeps_the_first() {
    let items = numbered_items(5);
    let mut index = InvertedIndex::new();
    index.build(&items);

    let registry = SessionRegistry::new();
    let session = registry.begin("items:0");
    let outcome = run_batches(
        &Candidates::resolve(&index, "items"),
        &items,
        &CompiledFilter::unconstrained(),
        &one_per_batch(2),
        session.token(),
        |progress| {
            if progress.batch == 0 {
                // A newer search for the same id supersedes this one.
                registry.cancel("items:0");
            }
        },
    )
    .await;

    assert!(outcome.cancelled);
    assert_eq!(keys(&outcome.endpoints), vec!["GET /items/0"]);
    drop(session);
    assert_eq!(registry.active(), 0);
}

#[tokio::test]
async fn concurrent_session_for_the_same_id_is_superseded() {
    let engine = Arc::new(SearchEngine::default());
    let items = numbered_items(50);
    let filters = FilterState::default();
    let options = SearchOptions {
        use_cache: false,
        progressive: Some(ProgressiveOptions {
            batch_size: 1,
            max_batches: 50,
            ..Default::default()
        }),
    };

    let (first, second) = tokio::join!(
        engine.search("items", &items, &filters, options),
        engine.search("items", &items, &filters, options),
    );
    let first = first.unwrap();
    let second = second.unwrap();

    // The first run was cancelled when the second one started; the second
    // one ran to completion.
    assert!(first.total_results < 50);
    assert_eq!(second.total_results, 50);
    assert_eq!(engine.active_progressive_sessions(), 0);
}

#[tokio::test]
async fn cancelled_runs_are_not_cached() {
    let engine = Arc::new(SearchEngine::default());
    let items = numbered_items(20);
    let filters = FilterState::default();
    let options = SearchOptions::progressive(one_per_batch(20));

    let (first, _second) = tokio::join!(
        engine.search("items", &items, &filters, options),
        engine.search("items", &items, &filters, options),
    );
    assert!(first.unwrap().total_results < 20);

    // Only the complete run made it into the cache.
    let cached = engine
        .search("items", &items, &filters, SearchOptions::default())
        .await
        .unwrap();
    assert!(cached.from_cache);
    assert_eq!(cached.total_results, 20);
}

#[tokio::test]
async fn cancel_progressive_searches_is_idempotent() {
    let engine = SearchEngine::default();
    assert_eq!(engine.cancel_progressive_searches(), 0);
    assert!(!engine.cancel_progressive_search("nothing"));
}
