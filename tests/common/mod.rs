//! Shared test utilities and fixtures.

#![allow(dead_code)]

use apiscope::{EndpointRecord, HttpMethod, Parameter, RequestBody, Response};
use std::collections::BTreeMap;
use std::sync::Arc;

// Re-export canonical test utilities from apiscope::testing
pub use apiscope::testing::{make_documented, make_endpoint, make_tagged, petstore, shared};

// ============================================================================
// FIXTURES
// ============================================================================

/// The two-endpoint fixture used by the filter conjunction checks:
/// `GET /users` tagged admin, `POST /users` tagged public.
pub fn admin_and_public() -> Vec<Arc<EndpointRecord>> {
    shared(vec![
        make_tagged(HttpMethod::Get, "/users", &["admin"]),
        make_tagged(HttpMethod::Post, "/users", &["public"]),
    ])
}

/// `count` GET endpoints, `/items/0` .. `/items/{count-1}`.
pub fn numbered_items(count: usize) -> Vec<Arc<EndpointRecord>> {
    shared(
        (0..count)
            .map(|i| make_endpoint(HttpMethod::Get, &format!("/items/{}", i)))
            .collect(),
    )
}

/// A richer record exercising every filterable field.
pub fn secured_endpoint(method: HttpMethod, path: &str, scheme: &str) -> EndpointRecord {
    let mut endpoint = make_endpoint(method, path);
    endpoint.security = vec![BTreeMap::from([(scheme.to_string(), Vec::new())])];
    endpoint.parameters = vec![Parameter {
        name: "id".to_string(),
        location: "path".to_string(),
        required: true,
        description: None,
        schema: None,
    }];
    endpoint.request_body = Some(RequestBody::default());
    endpoint
        .responses
        .insert("201".to_string(), Response::default());
    endpoint
}

/// `METHOD path` strings of a result list, in order.
pub fn keys<'a>(endpoints: impl IntoIterator<Item = &'a Arc<EndpointRecord>>) -> Vec<String> {
    endpoints
        .into_iter()
        .map(|endpoint| endpoint.key().to_string())
        .collect()
}

/// A small OpenAPI 3 document covering tags, security and Swagger-style bodies.
pub const BOOKSTORE_JSON: &str = r#"{
  "openapi": "3.0.3",
  "info": { "title": "Bookstore", "version": "1.0.0" },
  "security": [{ "bearerAuth": [] }],
  "paths": {
    "/books": {
      "get": {
        "tags": ["catalog"],
        "summary": "List books",
        "description": "Browse the catalog with optional author filter",
        "operationId": "listBooks",
        "security": [],
        "parameters": [{ "name": "author", "in": "query" }],
        "responses": { "200": { "description": "ok" } }
      },
      "post": {
        "tags": ["catalog", "admin"],
        "summary": "Add a book",
        "operationId": "createBook",
        "requestBody": { "required": true, "content": { "application/json": {} } },
        "responses": { "201": { "description": "created" }, "400": { "description": "invalid" } }
      }
    },
    "/books/{isbn}": {
      "parameters": [{ "name": "isbn", "in": "path", "required": true }],
      "get": {
        "tags": ["catalog"],
        "summary": "Fetch a book by ISBN",
        "operationId": "getBook",
        "responses": { "200": { "description": "ok" }, "404": { "description": "missing" } }
      },
      "delete": {
        "tags": ["admin"],
        "summary": "Withdraw a book",
        "operationId": "deleteBook",
        "deprecated": true,
        "responses": { "204": { "description": "gone" } }
      }
    },
    "/orders": {
      "post": {
        "tags": ["orders"],
        "summary": "Place an order",
        "operationId": "placeOrder",
        "security": [{ "oauth2": ["orders:write"] }],
        "requestBody": { "content": { "application/json": {} } },
        "responses": { "202": { "description": "accepted" } }
      }
    }
  }
}"#;
