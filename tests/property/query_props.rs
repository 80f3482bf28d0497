//! Query properties.
//!
//! - A blank query returns the whole snapshot in order
//! - Results are an ordered subset of the snapshot, without duplicates
//! - Case never changes the result set

use super::{is_ordered_subset, snapshot_strategy, text_strategy, word_strategy};
use apiscope::{search_endpoints, CompiledFilter, InvertedIndex};
use proptest::prelude::*;
use std::sync::Arc;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(150))]

    /// Property: whitespace-only queries bypass the index entirely.
    #[test]
    fn prop_blank_query_round_trips(snapshot in snapshot_strategy(), blank in "[ \t]{0,4}") {
        let mut index = InvertedIndex::new();
        index.build(&snapshot);

        let results = search_endpoints(&index, &blank, &snapshot, &CompiledFilter::unconstrained());
        prop_assert_eq!(results.len(), snapshot.len());
        prop_assert!(results.iter().zip(&snapshot).all(|(a, b)| Arc::ptr_eq(a, b)));
    }

    /// Property: any query yields an ordered subset of the snapshot.
    #[test]
    fn prop_results_are_ordered_subset(
        snapshot in snapshot_strategy(),
        query in prop::collection::vec(word_strategy(), 1..3).prop_map(|w| w.join(" ")),
    ) {
        let mut index = InvertedIndex::new();
        index.build(&snapshot);

        let results = search_endpoints(&index, &query, &snapshot, &CompiledFilter::unconstrained());
        prop_assert!(is_ordered_subset(&results, &snapshot));
    }

    /// Property: uppercasing the query changes nothing.
    #[test]
    fn prop_queries_ignore_case(snapshot in snapshot_strategy(), query in text_strategy()) {
        let mut index = InvertedIndex::new();
        index.build(&snapshot);
        let everything = CompiledFilter::unconstrained();

        let lower = search_endpoints(&index, &query, &snapshot, &everything);
        let upper = search_endpoints(&index, &query.to_uppercase(), &snapshot, &everything);
        prop_assert_eq!(lower, upper);
    }
}
