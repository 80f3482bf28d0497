//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical fixture builders to avoid duplication.

#![doc(hidden)]

use crate::types::{EndpointRecord, HttpMethod, Response};
use std::sync::Arc;

/// Create a bare endpoint with just a method and path.
///
/// This is the canonical implementation used across all tests.
pub fn make_endpoint(method: HttpMethod, path: &str) -> EndpointRecord {
    EndpointRecord::new(method, path)
}

/// Create an endpoint carrying tags.
pub fn make_tagged(method: HttpMethod, path: &str, tags: &[&str]) -> EndpointRecord {
    let mut endpoint = make_endpoint(method, path);
    endpoint.tags = tags.iter().map(|tag| tag.to_string()).collect();
    endpoint
}

/// Create an endpoint with a summary, description and operationId.
pub fn make_documented(
    method: HttpMethod,
    path: &str,
    summary: &str,
    description: &str,
    operation_id: &str,
) -> EndpointRecord {
    let mut endpoint = make_endpoint(method, path);
    endpoint.summary = Some(summary.to_string());
    endpoint.description = Some(description.to_string());
    endpoint.operation_id = Some(operation_id.to_string());
    endpoint.responses.insert(
        "200".to_string(),
        Response {
            description: Some("OK".to_string()),
            ..Default::default()
        },
    );
    endpoint
}

/// A small petstore-flavoured snapshot, shared so tests agree on fixtures.
pub fn petstore() -> Vec<Arc<EndpointRecord>> {
    vec![
        make_documented(
            HttpMethod::Get,
            "/pets",
            "List all pets",
            "Returns every pet in the store, paginated",
            "listPets",
        ),
        make_documented(
            HttpMethod::Post,
            "/pets",
            "Create a pet",
            "Adds a new pet to the store",
            "createPet",
        ),
        make_documented(
            HttpMethod::Get,
            "/pets/{petId}",
            "Info for a specific pet",
            "Looks up a single pet by identifier",
            "showPetById",
        ),
        make_documented(
            HttpMethod::Post,
            "/users",
            "Create a new user account",
            "Registers a customer",
            "createUser",
        ),
        make_documented(
            HttpMethod::Delete,
            "/users/{userId}",
            "Remove user",
            "Deletes the account permanently",
            "deleteUser",
        ),
    ]
    .into_iter()
    .map(|mut endpoint| {
        let tag = if endpoint.path.starts_with("/pets") {
            "pets"
        } else {
            "users"
        };
        endpoint.tags.push(tag.to_string());
        Arc::new(endpoint)
    })
    .collect()
}

/// Shorthand for `Arc::new` over a batch of records.
pub fn shared(endpoints: Vec<EndpointRecord>) -> Vec<Arc<EndpointRecord>> {
    endpoints.into_iter().map(Arc::new).collect()
}
