//! Filter properties.
//!
//! - Criteria combine as a conjunction: applying A∧B equals applying B to A's output
//! - Filtering is idempotent and order-preserving
//! - Cache keys tell different filter states apart

use super::{is_ordered_subset, method_strategy, snapshot_strategy, word_strategy, TAGS};
use apiscope::{apply_filters, cache_key, FilterState, HttpMethod};
use proptest::prelude::*;
use std::sync::Arc;

fn methods_strategy() -> impl Strategy<Value = Vec<HttpMethod>> {
    prop::collection::vec(method_strategy(), 0..3)
}

fn filter_strategy() -> impl Strategy<Value = FilterState> {
    (
        methods_strategy(),
        prop::sample::subsequence(TAGS.to_vec(), 0..=2),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(methods, tags, deprecated)| FilterState {
            methods,
            tags: tags.into_iter().map(str::to_string).collect(),
            deprecated,
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: method criteria and tag/deprecation criteria compose as AND.
    #[test]
    fn prop_criteria_are_conjunctive(
        snapshot in snapshot_strategy(),
        methods in methods_strategy(),
        rest in filter_strategy(),
    ) {
        let by_method = FilterState { methods: methods.clone(), ..Default::default() };
        let by_rest = FilterState { methods: Vec::new(), ..rest };
        let both = FilterState { methods, ..by_rest.clone() };

        let combined = apply_filters(&snapshot, &both).unwrap();
        let chained = apply_filters(&apply_filters(&snapshot, &by_method).unwrap(), &by_rest).unwrap();

        prop_assert_eq!(combined.len(), chained.len());
        prop_assert!(combined.iter().zip(&chained).all(|(a, b)| Arc::ptr_eq(a, b)));
    }

    /// Property: a filter's output passes the same filter unchanged.
    #[test]
    fn prop_filtering_is_idempotent(snapshot in snapshot_strategy(), filters in filter_strategy()) {
        let once = apply_filters(&snapshot, &filters).unwrap();
        let twice = apply_filters(&once, &filters).unwrap();

        prop_assert!(is_ordered_subset(&once, &snapshot));
        prop_assert_eq!(once.len(), twice.len());
    }

    /// Property: an empty filter state keeps everything.
    #[test]
    fn prop_empty_filter_keeps_everything(snapshot in snapshot_strategy()) {
        let kept = apply_filters(&snapshot, &FilterState::default()).unwrap();
        prop_assert_eq!(kept.len(), snapshot.len());
    }

    /// Property: equal inputs share a cache key, different filters do not.
    #[test]
    fn prop_cache_key_tracks_filters(
        query in word_strategy(),
        a in filter_strategy(),
        b in filter_strategy(),
    ) {
        prop_assert_eq!(cache_key(&query, &a), cache_key(&query, &a.clone()));
        if a != b {
            prop_assert_ne!(cache_key(&query, &a), cache_key(&query, &b));
        }
        let prefix = format!("{}:", query);
        prop_assert!(cache_key(&query, &a).starts_with(&prefix));
    }
}
