//! Wiki endpoint handlers.

use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Response},
    Form, Json,
};

use super::{invalid_request, not_found, required, required_id, SharedState};

/// GET /api/v2/wikis?projectIdOrKey=
pub async fn list_wikis(
    State(state): State<SharedState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let project_id_or_key = match required(&query, "projectIdOrKey") {
        Ok(value) => value,
        Err(rejection) => return rejection,
    };

    let state = state.read().await;
    let Some(project_id) = state
        .find_project(project_id_or_key)
        .and_then(|p| p["id"].as_u64())
    else {
        return not_found("project");
    };

    let wikis: Vec<_> = state.list_wikis(project_id).into_iter().cloned().collect();
    Json(wikis).into_response()
}

/// POST /api/v2/wikis
pub async fn create_wiki(
    State(state): State<SharedState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let parsed = (|| {
        Ok::<_, Response>((
            required_id(&form, "projectId")?,
            required(&form, "name")?,
            required(&form, "content")?,
        ))
    })();
    let (project_id, name, content) = match parsed {
        Ok(fields) => fields,
        Err(rejection) => return rejection,
    };

    let mut state = state.write().await;
    if state.find_project(&project_id.to_string()).is_none() {
        return invalid_request("No such project.");
    }
    Json(state.create_wiki(project_id, name, content)).into_response()
}

/// GET /api/v2/wikis/{wikiId}
pub async fn get_wiki(State(state): State<SharedState>, Path(wiki_id): Path<u64>) -> Response {
    let state = state.read().await;
    match state.find_wiki(wiki_id) {
        Some(wiki) => Json(wiki.clone()).into_response(),
        None => not_found("wiki"),
    }
}

/// DELETE /api/v2/wikis/{wikiId}
pub async fn delete_wiki(State(state): State<SharedState>, Path(wiki_id): Path<u64>) -> Response {
    let mut state = state.write().await;
    match state.delete_wiki(wiki_id) {
        Some(wiki) => Json(wiki).into_response(),
        None => not_found("wiki"),
    }
}

/// GET /api/v2/wikis/{wikiId}/attachments
pub async fn list_wiki_attachments(
    State(state): State<SharedState>,
    Path(wiki_id): Path<u64>,
) -> Response {
    let state = state.read().await;
    if state.find_wiki(wiki_id).is_none() {
        return not_found("wiki");
    }
    let attachments = state
        .wiki_attachments
        .get(&wiki_id)
        .cloned()
        .unwrap_or_default();
    Json(attachments).into_response()
}

/// POST /api/v2/wikis/{wikiId}/attachments (multipart `attachmentId[]`)
pub async fn attach_to_wiki(
    State(state): State<SharedState>,
    Path(wiki_id): Path<u64>,
    mut multipart: Multipart,
) -> Response {
    let mut attachment_ids = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return invalid_request(err.to_string()),
        };
        if field.name() != Some("attachmentId[]") {
            continue;
        }
        match field.text().await.map(|t| t.parse::<u64>()) {
            Ok(Ok(id)) => attachment_ids.push(id),
            _ => return invalid_request("attachmentId must be a number."),
        }
    }

    if attachment_ids.is_empty() {
        return invalid_request("Please enter attachmentId.");
    }

    let mut state = state.write().await;
    if state.find_wiki(wiki_id).is_none() {
        return not_found("wiki");
    }
    Json(state.attach_to_wiki(wiki_id, &attachment_ids)).into_response()
}
