//! Issue endpoint handlers.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::json;

use super::{form_fields, invalid_request, not_found, required, required_id, SharedState};

/// Project filter from the `projectId[]` query parameter.
///
/// The client sends at most one value, so only one is honored.
fn project_filter(query: &HashMap<String, String>) -> Vec<u64> {
    query
        .get("projectId[]")
        .and_then(|v| v.parse().ok())
        .into_iter()
        .collect()
}

/// GET /api/v2/issues
pub async fn list_issues(
    State(state): State<SharedState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let state = state.read().await;
    let count = query
        .get("count")
        .and_then(|v| v.parse().ok())
        .unwrap_or(20usize);

    let issues: Vec<_> = state
        .list_issues(&project_filter(&query))
        .into_iter()
        .take(count)
        .cloned()
        .collect();
    Json(issues).into_response()
}

/// GET /api/v2/issues/count
pub async fn count_issues(
    State(state): State<SharedState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let state = state.read().await;
    let count = state.list_issues(&project_filter(&query)).len();
    Json(json!({ "count": count })).into_response()
}

/// POST /api/v2/issues
pub async fn create_issue(
    State(state): State<SharedState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let parsed = (|| {
        Ok::<_, Response>((
            required_id(&form, "projectId")?,
            required(&form, "summary")?,
            required_id(&form, "issueTypeId")?,
            required_id(&form, "priorityId")?,
        ))
    })();
    let (project_id, summary, issue_type_id, priority_id) = match parsed {
        Ok(fields) => fields,
        Err(rejection) => return rejection,
    };

    let mut state = state.write().await;
    let description = form.get("description").map(String::as_str);
    match state.create_issue(project_id, summary, issue_type_id, priority_id, description) {
        Some(issue) => Json(issue).into_response(),
        None => invalid_request("No such project."),
    }
}

/// GET /api/v2/issues/{idOrKey}
pub async fn get_issue(
    State(state): State<SharedState>,
    Path(id_or_key): Path<String>,
) -> Response {
    let state = state.read().await;
    match state.find_issue(&id_or_key) {
        Some(issue) => Json(issue.clone()).into_response(),
        None => not_found("issue"),
    }
}

/// PATCH /api/v2/issues/{idOrKey}
pub async fn update_issue(
    State(state): State<SharedState>,
    Path(id_or_key): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let mut state = state.write().await;
    match state.update_issue(&id_or_key, &form_fields(&form)) {
        Some(issue) => Json(issue.clone()).into_response(),
        None => not_found("issue"),
    }
}

/// DELETE /api/v2/issues/{idOrKey}
pub async fn delete_issue(
    State(state): State<SharedState>,
    Path(id_or_key): Path<String>,
) -> Response {
    let mut state = state.write().await;
    match state.delete_issue(&id_or_key) {
        Some(issue) => Json(issue).into_response(),
        None => not_found("issue"),
    }
}

/// GET /api/v2/issues/{idOrKey}/comments
pub async fn list_comments(
    State(state): State<SharedState>,
    Path(id_or_key): Path<String>,
) -> Response {
    let state = state.read().await;
    let Some(issue_id) = state.find_issue(&id_or_key).and_then(|i| i["id"].as_u64()) else {
        return not_found("issue");
    };
    let comments = state.comments.get(&issue_id).cloned().unwrap_or_default();
    Json(comments).into_response()
}

/// POST /api/v2/issues/{idOrKey}/comments
pub async fn create_comment(
    State(state): State<SharedState>,
    Path(id_or_key): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let content = match required(&form, "content") {
        Ok(content) => content,
        Err(rejection) => return rejection,
    };

    let mut state = state.write().await;
    let Some(issue_id) = state.find_issue(&id_or_key).and_then(|i| i["id"].as_u64()) else {
        return not_found("issue");
    };
    Json(state.add_comment(issue_id, content)).into_response()
}

/// GET /api/v2/issues/{idOrKey}/attachments/{attachmentId}
pub async fn download_attachment(
    State(state): State<SharedState>,
    Path((id_or_key, attachment_id)): Path<(String, u64)>,
) -> Response {
    let state = state.read().await;
    let Some(issue_id) = state.find_issue(&id_or_key).and_then(|i| i["id"].as_u64()) else {
        return not_found("issue");
    };

    match state.files.get(&attachment_id) {
        Some(file) if file.issue_id == issue_id => {
            let disposition = format!(
                "attachment; filename*=UTF-8''{}",
                urlencoding::encode(&file.name)
            );
            (
                [
                    (header::CONTENT_TYPE, file.content_type.clone()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                file.bytes.clone(),
            )
                .into_response()
        }
        _ => not_found("attachment"),
    }
}
