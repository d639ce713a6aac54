//! HTTP request handlers for the mock server.

pub mod issues;
pub mod projects;
pub mod wikis;

pub use issues::*;
pub use projects::*;
pub use wikis::*;

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::mock_server::state::MockState;

pub type SharedState = Arc<RwLock<MockState>>;

/// Backlog error codes used by the mock.
const NO_RESOURCE: u16 = 6;
const INVALID_REQUEST: u16 = 7;
const AUTHENTICATION: u16 = 11;

/// Error document in the service's `{"errors": [...]}` shape.
pub fn backlog_error(status: StatusCode, code: u16, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "errors": [{
                "message": message.into(),
                "code": code,
                "moreInfo": ""
            }]
        })),
    )
        .into_response()
}

pub fn not_found(what: &str) -> Response {
    backlog_error(StatusCode::NOT_FOUND, NO_RESOURCE, format!("No {what}."))
}

pub fn invalid_request(message: impl Into<String>) -> Response {
    backlog_error(StatusCode::BAD_REQUEST, INVALID_REQUEST, message)
}

/// Reject requests whose `apiKey` does not match the configured key.
pub async fn require_api_key(
    State(state): State<SharedState>,
    Query(query): Query<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Response {
    let expected = state.read().await.required_api_key.clone();
    if let Some(expected) = expected {
        if query.get("apiKey") != Some(&expected) {
            return backlog_error(
                StatusCode::UNAUTHORIZED,
                AUTHENTICATION,
                "Authentication failure.",
            );
        }
    }
    next.run(request).await
}

/// Read a required form field.
fn required<'a>(form: &'a HashMap<String, String>, key: &str) -> Result<&'a str, Response> {
    form.get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| invalid_request(format!("Please enter {key}.")))
}

/// Read a required numeric form field.
fn required_id(form: &HashMap<String, String>, key: &str) -> Result<u64, Response> {
    required(form, key)?
        .parse()
        .map_err(|_| invalid_request(format!("{key} must be a number.")))
}

/// Form values arrive as strings; booleans are restored for storage.
fn form_value(value: &str) -> Value {
    match value {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        other => Value::String(other.to_string()),
    }
}

/// Every submitted field, in a stable order, as storable values.
fn form_fields(form: &HashMap<String, String>) -> Vec<(&str, Value)> {
    let mut fields: Vec<(&str, Value)> = form
        .iter()
        .map(|(k, v)| (k.as_str(), form_value(v)))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    fields
}
