//! Project endpoint handlers.

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::Value;

use super::{form_fields, form_value, invalid_request, not_found, required, SharedState};

/// GET /api/v2/projects
pub async fn list_projects(State(state): State<SharedState>) -> Response {
    let state = state.read().await;
    Json(state.projects.clone()).into_response()
}

/// POST /api/v2/projects
pub async fn create_project(
    State(state): State<SharedState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let key = match required(&form, "key") {
        Ok(key) => key,
        Err(rejection) => return rejection,
    };
    let name = match required(&form, "name") {
        Ok(name) => name,
        Err(rejection) => return rejection,
    };

    let mut state = state.write().await;
    if state.find_project(key).is_some() {
        return invalid_request(format!("Project key {key} is already used."));
    }

    let fields: Vec<(&str, Value)> = ["chartEnabled", "subtaskingEnabled", "textFormattingRule"]
        .into_iter()
        .filter_map(|field| form.get(field).map(|v| (field, form_value(v))))
        .collect();

    Json(state.create_project(key, name, &fields)).into_response()
}

/// GET /api/v2/projects/{idOrKey}
pub async fn get_project(
    State(state): State<SharedState>,
    Path(id_or_key): Path<String>,
) -> Response {
    let state = state.read().await;
    match state.find_project(&id_or_key) {
        Some(project) => Json(project.clone()).into_response(),
        None => not_found("project"),
    }
}

/// PATCH /api/v2/projects/{idOrKey}
pub async fn update_project(
    State(state): State<SharedState>,
    Path(id_or_key): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let mut state = state.write().await;
    match state.update_project(&id_or_key, &form_fields(&form)) {
        Some(project) => Json(project.clone()).into_response(),
        None => not_found("project"),
    }
}

/// DELETE /api/v2/projects/{idOrKey}
pub async fn delete_project(
    State(state): State<SharedState>,
    Path(id_or_key): Path<String>,
) -> Response {
    let mut state = state.write().await;
    match state.delete_project(&id_or_key) {
        Some(project) => Json(project).into_response(),
        None => not_found("project"),
    }
}
