//! Structured filters, alone and combined with text queries.

use super::common::{admin_and_public, keys, make_endpoint, petstore, secured_endpoint, shared};
use apiscope::{
    apply_filters, Complexity, Error, FilterState, HttpMethod, SearchEngine, SearchOptions,
    NO_SECURITY,
};

#[test]
fn filters_are_a_conjunction() {
    let endpoints = admin_and_public();

    let gets = FilterState {
        methods: vec![HttpMethod::Get],
        ..Default::default()
    };
    assert_eq!(keys(&apply_filters(&endpoints, &gets).unwrap()), vec!["GET /users"]);

    let admin_posts = FilterState {
        methods: vec![HttpMethod::Post],
        tags: vec!["admin".to_string()],
        ..Default::default()
    };
    assert!(apply_filters(&endpoints, &admin_posts).unwrap().is_empty());
}

#[test]
fn empty_criteria_keep_everything() {
    let store = petstore();
    assert_eq!(apply_filters(&store, &FilterState::default()).unwrap().len(), store.len());
}

#[test]
fn security_substrings_and_none() {
    let endpoints = shared(vec![
        secured_endpoint(HttpMethod::Get, "/a", "BearerAuth"),
        secured_endpoint(HttpMethod::Get, "/b", "oauth2"),
        make_endpoint(HttpMethod::Get, "/open"),
    ]);

    let bearer = FilterState {
        security: vec!["bearer".to_string()],
        ..Default::default()
    };
    assert_eq!(keys(&apply_filters(&endpoints, &bearer).unwrap()), vec!["GET /a"]);

    let open_or_oauth = FilterState {
        security: vec![NO_SECURITY.to_string(), "oauth".to_string()],
        ..Default::default()
    };
    assert_eq!(
        keys(&apply_filters(&endpoints, &open_or_oauth).unwrap()),
        vec!["GET /b", "GET /open"]
    );
}

#[test]
fn shape_filters() {
    let endpoints = shared(vec![
        secured_endpoint(HttpMethod::Put, "/things/{id}", "apiKey"),
        make_endpoint(HttpMethod::Get, "/things"),
    ]);

    let with_body = FilterState {
        has_request_body: Some(true),
        has_parameters: Some(true),
        status_codes: vec!["201".to_string()],
        ..Default::default()
    };
    assert_eq!(keys(&apply_filters(&endpoints, &with_body).unwrap()), vec!["PUT /things/{id}"]);

    let bare = FilterState {
        has_request_body: Some(false),
        has_parameters: Some(false),
        complexity: vec![Complexity::Simple],
        deprecated: Some(false),
        ..Default::default()
    };
    assert_eq!(keys(&apply_filters(&endpoints, &bare).unwrap()), vec!["GET /things"]);
}

#[test]
fn path_pattern_is_case_insensitive_regex() {
    let store = petstore();
    let filters = FilterState {
        path_pattern: Some(r"^/PETS/\{".to_string()),
        ..Default::default()
    };
    assert_eq!(keys(&apply_filters(&store, &filters).unwrap()), vec!["GET /pets/{petId}"]);
}

#[test]
fn invalid_path_pattern_is_an_error() {
    let filters = FilterState {
        path_pattern: Some("/users/(".to_string()),
        ..Default::default()
    };
    match apply_filters(&petstore(), &filters) {
        Err(Error::InvalidPathPattern { pattern, .. }) => assert_eq!(pattern, "/users/("),
        other => panic!("expected InvalidPathPattern, got {:?}", other.map(|v| v.len())),
    }
}

#[tokio::test]
async fn filters_narrow_text_matches() {
    let engine = SearchEngine::default();
    let store = petstore();
    let filters = FilterState {
        methods: vec![HttpMethod::Post],
        ..Default::default()
    };
    let result = engine
        .search("create", &store, &filters, SearchOptions::default())
        .await
        .unwrap();
    assert_eq!(keys(result.iter()), vec!["POST /pets", "POST /users"]);
    assert_eq!(result.total_results, 2);
}

#[test]
fn filter_state_reads_camel_case_json() {
    let filters: FilterState = serde_json::from_str(
        r#"{"methods": ["get", "DELETE"], "hasRequestBody": false, "pathPattern": "^/users"}"#,
    )
    .unwrap();
    assert_eq!(filters.methods, vec![HttpMethod::Get, HttpMethod::Delete]);
    assert_eq!(filters.has_request_body, Some(false));
    assert_eq!(filters.path_pattern.as_deref(), Some("^/users"));
    assert!(filters.tags.is_empty());
}
