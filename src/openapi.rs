// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Turning an OpenAPI (3.x) or Swagger (2.0) JSON document into endpoint records.
//!
//! Only what the search engine needs is extracted. `$ref`s are not resolved:
//! a referenced parameter is skipped, a referenced response or request body is
//! kept as an empty shell so it still counts towards complexity.
//!
//! Merge rules:
//!
//! - path-level `parameters` apply to every operation under the path, and an
//!   operation-level parameter with the same `name` and `in` replaces them;
//! - operation `security` replaces the document-level default, including an
//!   explicit empty list (which means "no auth");
//! - Swagger 2 `in: body` parameters become the request body.

use crate::error::{Error, Result};
use crate::types::{Complexity, EndpointRecord, HttpMethod, Parameter, RequestBody, Response, SecurityRequirement};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// Read and parse a JSON document.
pub fn load_document(path: impl AsRef<Path>) -> Result<Value> {
    let text = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&text)?)
}

/// [`load_document`] followed by [`extract_endpoints`].
pub fn load_endpoints(path: impl AsRef<Path>) -> Result<Vec<EndpointRecord>> {
    let document = load_document(path.as_ref())?;
    let endpoints = extract_endpoints(&document)?;
    tracing::debug!(
        path = %path.as_ref().display(),
        endpoints = endpoints.len(),
        "extracted endpoints"
    );
    Ok(endpoints)
}

/// Every operation in `document.paths`, in document order.
///
/// A document without `paths` has no endpoints. Structural problems (a
/// non-object path item, a malformed parameter) are reported as
/// [`Error::Document`].
pub fn extract_endpoints(document: &Value) -> Result<Vec<EndpointRecord>> {
    let root = document
        .as_object()
        .ok_or_else(|| Error::Document("document root is not an object".to_string()))?;

    let paths = match root.get("paths") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(paths)) => paths,
        Some(_) => return Err(Error::Document("`paths` is not an object".to_string())),
    };

    let default_security = match root.get("security") {
        Some(value) => parse_security(value, "document")?,
        None => Vec::new(),
    };
    let default_consumes = first_media_type(root);

    let mut endpoints = Vec::new();
    for (path, item) in paths {
        let item = item
            .as_object()
            .ok_or_else(|| Error::Document(format!("path item `{}` is not an object", path)))?;
        let shared = match item.get("parameters") {
            Some(value) => parse_parameters(value, path)?,
            None => Vec::new(),
        };

        for method in HttpMethod::ALL {
            let Some(operation) = item.get(method.as_lower()) else {
                continue;
            };
            let operation = operation.as_object().ok_or_else(|| {
                Error::Document(format!("{} {} is not an object", method, path))
            })?;
            let context = OperationContext {
                path,
                method,
                shared: &shared,
                default_security: &default_security,
                default_consumes: default_consumes.as_deref(),
            };
            endpoints.push(context.build(operation)?);
        }
    }
    Ok(endpoints)
}

/// Complexity from the shape of an operation.
///
/// One point per parameter, two for a request body, one per response beyond
/// the first and one per security requirement. Up to 2 is simple, up to 6
/// moderate, anything more complex.
pub fn classify_complexity(endpoint: &EndpointRecord) -> Complexity {
    let score = endpoint.parameters.len()
        + if endpoint.request_body.is_some() { 2 } else { 0 }
        + endpoint.responses.len().saturating_sub(1)
        + endpoint.security.len();
    match score {
        0..=2 => Complexity::Simple,
        3..=6 => Complexity::Moderate,
        _ => Complexity::Complex,
    }
}

struct OperationContext<'a> {
    path: &'a str,
    method: HttpMethod,
    shared: &'a [Parameter],
    default_security: &'a [SecurityRequirement],
    default_consumes: Option<&'a str>,
}

impl OperationContext<'_> {
    fn build(&self, operation: &Map<String, Value>) -> Result<EndpointRecord> {
        let label = format!("{} {}", self.method, self.path);
        let mut endpoint = EndpointRecord::new(self.method, self.path);

        endpoint.tags = operation
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        endpoint.summary = string_field(operation, "summary");
        endpoint.description = string_field(operation, "description");
        endpoint.operation_id = string_field(operation, "operationId");
        endpoint.deprecated = operation
            .get("deprecated")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if let Some(responses) = operation.get("responses") {
            endpoint.responses = parse_responses(responses, &label)?;
        }

        endpoint.security = match operation.get("security") {
            Some(value) => parse_security(value, &label)?,
            None => self.default_security.to_vec(),
        };

        let mut parameters = self.shared.to_vec();
        if let Some(value) = operation.get("parameters") {
            for parameter in parse_parameters(value, &label)? {
                match parameters
                    .iter_mut()
                    .find(|p| p.name == parameter.name && p.location == parameter.location)
                {
                    Some(existing) => *existing = parameter,
                    None => parameters.push(parameter),
                }
            }
        }

        // Swagger 2: the body travels as a parameter.
        let (body, parameters): (Vec<Parameter>, Vec<Parameter>) =
            parameters.into_iter().partition(|p| p.location == "body");
        endpoint.parameters = parameters;

        endpoint.request_body = match operation.get("requestBody") {
            Some(value) => Some(serde_json::from_value::<RequestBody>(value.clone()).map_err(
                |e| Error::Document(format!("{}: invalid requestBody: {}", label, e)),
            )?),
            None => body.into_iter().next().map(|parameter| {
                let media_type = first_media_type(operation)
                    .or_else(|| self.default_consumes.map(str::to_string))
                    .unwrap_or_else(|| "application/json".to_string());
                let mut content = BTreeMap::new();
                let mut media = Map::new();
                if let Some(schema) = parameter.schema {
                    media.insert("schema".to_string(), schema);
                }
                content.insert(media_type, Value::Object(media));
                RequestBody {
                    description: parameter.description,
                    required: parameter.required,
                    content,
                }
            }),
        };

        endpoint.complexity = classify_complexity(&endpoint);
        Ok(endpoint)
    }
}

fn string_field(object: &Map<String, Value>, field: &str) -> Option<String> {
    object.get(field).and_then(Value::as_str).map(str::to_string)
}

fn first_media_type(object: &Map<String, Value>) -> Option<String> {
    object
        .get("consumes")
        .and_then(Value::as_array)
        .and_then(|types| types.first())
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn parse_parameters(value: &Value, context: &str) -> Result<Vec<Parameter>> {
    let list = value
        .as_array()
        .ok_or_else(|| Error::Document(format!("{}: `parameters` is not an array", context)))?;

    let mut parameters = Vec::with_capacity(list.len());
    for entry in list {
        if entry.get("$ref").is_some() {
            tracing::debug!(context, "skipping referenced parameter");
            continue;
        }
        let parameter = serde_json::from_value::<Parameter>(entry.clone())
            .map_err(|e| Error::Document(format!("{}: invalid parameter: {}", context, e)))?;
        parameters.push(parameter);
    }
    Ok(parameters)
}

fn parse_responses(value: &Value, context: &str) -> Result<BTreeMap<String, Response>> {
    let map = value
        .as_object()
        .ok_or_else(|| Error::Document(format!("{}: `responses` is not an object", context)))?;
    map.iter()
        .map(|(status, response)| {
            serde_json::from_value::<Response>(response.clone())
                .map(|response| (status.clone(), response))
                .map_err(|e| Error::Document(format!("{}: invalid response {}: {}", context, status, e)))
        })
        .collect()
}

fn parse_security(value: &Value, context: &str) -> Result<Vec<SecurityRequirement>> {
    serde_json::from_value(value.clone())
        .map_err(|e| Error::Document(format!("{}: invalid security: {}", context, e)))
}
