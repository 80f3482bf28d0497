//! Progressive search properties.
//!
//! - A run never returns more than `batch_size * max_batches` endpoints
//! - Its results are exactly a direct search over the processed prefix
//! - Prioritization is a stable permutation of the snapshot

use super::{is_ordered_subset, snapshot_strategy, word_strategy};
use apiscope::search::{prioritize, run_batches, Candidates};
use apiscope::{CompiledFilter, FilterState, InvertedIndex, ProgressiveOptions};
use proptest::prelude::*;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn options_strategy() -> impl Strategy<Value = ProgressiveOptions> {
    (0usize..6, 0usize..5, any::<bool>(), any::<bool>()).prop_map(
        |(batch_size, max_batches, by_method, by_tag)| ProgressiveOptions {
            batch_size,
            max_batches,
            prioritize_by_method: by_method,
            prioritize_by_tag: by_tag,
        },
    )
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(150))]

    /// Property: truncation keeps a run within its batch budget and returns
    /// exactly what a one-shot search over the processed prefix would.
    #[test]
    fn prop_runs_stay_within_budget(
        snapshot in snapshot_strategy(),
        query in prop::option::of(word_strategy()),
        options in options_strategy(),
    ) {
        let mut index = InvertedIndex::new();
        index.build(&snapshot);
        let query = query.unwrap_or_default();
        let candidates = Candidates::resolve(&index, &query);
        let filter = CompiledFilter::unconstrained();
        let ordered = prioritize(&snapshot, &options, &FilterState::default());

        let outcome = block_on(run_batches(
            &candidates,
            &ordered,
            &filter,
            &options,
            &CancellationToken::new(),
            |_| {},
        ));

        let budget = options.batch_size.max(1) * options.max_batches;
        prop_assert!(outcome.endpoints.len() <= budget);
        prop_assert!(!outcome.cancelled);
        prop_assert!(outcome.batches_run <= options.max_batches);

        let processed = &ordered[..budget.min(ordered.len())];
        let direct = candidates.select(processed, &filter);
        prop_assert!(is_ordered_subset(&outcome.endpoints, &ordered));
        prop_assert_eq!(outcome.endpoints.len(), direct.len());
        prop_assert!(outcome.endpoints.iter().zip(&direct).all(|(a, b)| Arc::ptr_eq(a, b)));
    }

    /// Property: a pre-cancelled token processes nothing.
    #[test]
    fn prop_cancelled_token_runs_no_batches(
        snapshot in snapshot_strategy(),
        options in options_strategy(),
    ) {
        let token = CancellationToken::new();
        token.cancel();

        let outcome = block_on(run_batches(
            &Candidates::All,
            &snapshot,
            &CompiledFilter::unconstrained(),
            &options,
            &token,
            |_| {},
        ));
        prop_assert_eq!(outcome.batches_run, 0);
        prop_assert!(outcome.endpoints.is_empty());
    }

    /// Property: prioritizing reorders but never adds, drops or duplicates.
    #[test]
    fn prop_prioritize_is_a_permutation(
        snapshot in snapshot_strategy(),
        options in options_strategy(),
        tag in prop::sample::select(super::TAGS.to_vec()),
    ) {
        let filters = FilterState { tags: vec![tag.to_string()], ..Default::default() };
        let ordered = prioritize(&snapshot, &options, &filters);

        prop_assert_eq!(ordered.len(), snapshot.len());
        for endpoint in &snapshot {
            prop_assert_eq!(ordered.iter().filter(|e| Arc::ptr_eq(e, endpoint)).count(), 1);
        }
    }
}
