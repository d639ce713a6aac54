//! Resource clients: paths, verbs, parameter precedence and headers.

use std::collections::HashMap;

use backlog_api::{ApiKeyConnector, Backlog, Params};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

async fn setup() -> (MockServer, Backlog) {
    let server = MockServer::start().await;
    let connector =
        ApiKeyConnector::with_base_url("KEY", &format!("{}/api/v2/", server.uri())).unwrap();
    (server, Backlog::new(connector))
}

fn ok_json() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": 1 }))
}

fn form_of(request: &Request) -> HashMap<String, String> {
    serde_qs::from_bytes(&request.body).unwrap()
}

async fn last_request(server: &MockServer) -> Request {
    server.received_requests().await.unwrap().pop().unwrap()
}

#[tokio::test]
async fn test_issue_create_sends_defaults() {
    let (server, backlog) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/issues"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ok_json())
        .expect(1)
        .mount(&server)
        .await;

    backlog
        .issues()
        .create(5, "Broken", 2, 3, Params::new().with("description", "steps"))
        .await
        .unwrap();

    let form = form_of(&last_request(&server).await);
    assert_eq!(form["projectId"], "5");
    assert_eq!(form["summary"], "Broken");
    assert_eq!(form["issueTypeId"], "2");
    assert_eq!(form["priorityId"], "3");
    assert_eq!(form["description"], "steps");
}

#[tokio::test]
async fn test_issue_create_override_reaches_transport() {
    let (server, backlog) = setup().await;

    Mock::given(method("POST"))
        .respond_with(ok_json())
        .mount(&server)
        .await;

    backlog
        .issues()
        .create(5, "Broken", 2, 3, Params::new().with("projectId", 9))
        .await
        .unwrap();

    assert_eq!(form_of(&last_request(&server).await)["projectId"], "9");
}

#[tokio::test]
async fn test_project_create_key_override() {
    let (server, backlog) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/projects"))
        .respond_with(ok_json())
        .mount(&server)
        .await;

    backlog
        .projects()
        .create(
            "DEFAULT",
            "markdown",
            false,
            true,
            Params::new().with("key", "OVERRIDE").with("name", "Demo"),
        )
        .await
        .unwrap();

    let form = form_of(&last_request(&server).await);
    assert_eq!(form["key"], "OVERRIDE");
    assert_eq!(form["name"], "Demo");
    assert_eq!(form["chartEnabled"], "false");
    assert_eq!(form["subtaskingEnabled"], "true");
}

#[tokio::test]
async fn test_identifiers_are_interpolated_unescaped() {
    let (server, backlog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/projects/TEAM/ALPHA/statuses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    backlog.projects().statuses("TEAM/ALPHA").await.unwrap();
}

#[tokio::test]
async fn test_numeric_and_string_identifiers() {
    let (server, backlog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/issues/42/comments/7"))
        .respond_with(ok_json())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v2/issues/DEMO-3/comments/7"))
        .respond_with(ok_json())
        .expect(1)
        .mount(&server)
        .await;

    backlog.issues().find_comment(42, 7).await.unwrap();
    backlog.issues().find_comment("DEMO-3", 7).await.unwrap();
}

#[tokio::test]
async fn test_status_delete_sends_substitute_in_body() {
    let (server, backlog) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/projects/DEMO/statuses/4"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ok_json())
        .expect(1)
        .mount(&server)
        .await;

    backlog.projects().delete_status("DEMO", 4, 1).await.unwrap();

    assert_eq!(
        form_of(&last_request(&server).await)["substituteStatusId"],
        "1"
    );
}

#[tokio::test]
async fn test_update_custom_field_uses_patch() {
    let (server, backlog) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v2/projects/DEMO/customFields/12"))
        .respond_with(ok_json())
        .expect(1)
        .mount(&server)
        .await;

    backlog
        .projects()
        .update_custom_field("DEMO", 12, Params::new().with("name", "Browser"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_read_calls_send_no_content_type() {
    let (server, backlog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/projects"))
        .and(query_param("archived", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    backlog
        .projects()
        .list(Params::new().with("archived", false))
        .await
        .unwrap();

    let request = last_request(&server).await;
    assert!(request.headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_wiki_listing_is_project_scoped() {
    let (server, backlog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/wikis/tags"))
        .and(query_param("projectIdOrKey", "DEMO"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    backlog.wikis().tags("DEMO").await.unwrap();
}

#[tokio::test]
async fn test_wiki_attach_sends_each_id_as_multipart_part() {
    let (server, backlog) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/wikis/3/attachments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    backlog.wikis().attach(3, &[11, 12]).await.unwrap();

    let request = last_request(&server).await;
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&request.body);
    assert_eq!(body.matches("name=\"attachmentId[]\"").count(), 2);
    assert!(body.contains("11"));
    assert!(body.contains("12"));
}

#[tokio::test]
async fn test_issue_attachment_is_raw_download() {
    let (server, backlog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/issues/DEMO-1/attachments/8"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF".to_vec(), "application/pdf"))
        .mount(&server)
        .await;

    let file = backlog.issues().attachment("DEMO-1", 8).await.unwrap();

    assert_eq!(file.content_type(), Some("application/pdf"));
    assert_eq!(file.bytes().await.unwrap().as_ref(), b"%PDF");
}

#[tokio::test]
async fn test_project_image_missing_is_status_failure() {
    let (server, backlog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/projects/DEMO/image"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = backlog.projects().image("DEMO").await.unwrap_err();
    assert_eq!(err.code(), 404);
}

#[tokio::test]
async fn test_shared_files_directory_keeps_slashes() {
    let (server, backlog) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/projects/DEMO/files/metadata/docs/specs"))
        .and(query_param("order", "desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    backlog
        .projects()
        .shared_files("DEMO", "docs/specs", Params::new().with("order", "desc"))
        .await
        .unwrap();
}
