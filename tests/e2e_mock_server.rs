//! E2E tests using the mock Backlog server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use backlog_api::mock_server::{Fixtures, MockServer, MockState, FIXTURE_API_KEY};
use backlog_api::{ApiKeyConnector, Backlog, Params};
use tokio_test::{assert_err, assert_ok};

fn client_for(server: &MockServer, api_key: &str) -> Backlog {
    let connector = ApiKeyConnector::with_base_url(api_key, &server.api_url()).unwrap();
    Backlog::new(connector)
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let backlog = client_for(&server, FIXTURE_API_KEY);

    server.shutdown().await;

    let err = assert_err!(backlog.projects().list(Params::new()).await);
    assert_eq!(err.code(), 0);
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_wrong_api_key_fails_reads_with_status() {
    let server = MockServer::start().await;
    let backlog = client_for(&server, "wrong-key");

    let err = assert_err!(backlog.projects().find("DEMO").await);

    assert_eq!(err.code(), 401);
    assert_eq!(err.message(), "");

    server.shutdown().await;
}

#[tokio::test]
async fn test_wrong_api_key_returns_error_document_on_writes() {
    let server = MockServer::start().await;
    let backlog = client_for(&server, "wrong-key");

    let body = assert_ok!(
        backlog
            .issues()
            .create_comment("DEMO-1", "Hello", Params::new())
            .await
    );

    assert_eq!(body["errors"][0]["code"], 11);

    server.shutdown().await;
}

// =============================================================================
// Project Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_project_lifecycle() {
    let server = MockServer::start().await;
    let backlog = client_for(&server, FIXTURE_API_KEY);

    let created = assert_ok!(
        backlog
            .projects()
            .create(
                "OPS",
                "markdown",
                true,
                false,
                Params::new().with("name", "Operations"),
            )
            .await
    );
    assert_eq!(created["projectKey"], "OPS");
    assert_eq!(created["chartEnabled"], true);

    let found = assert_ok!(backlog.projects().find("OPS").await);
    assert_eq!(found["name"], "Operations");

    let updated = assert_ok!(
        backlog
            .projects()
            .update("OPS", Params::new().with("name", "Ops Team"))
            .await
    );
    assert_eq!(updated["name"], "Ops Team");

    assert_ok!(backlog.projects().delete("OPS").await);

    let err = assert_err!(backlog.projects().find("OPS").await);
    assert_eq!(err.code(), 404);

    server.shutdown().await;
}

#[tokio::test]
async fn test_duplicate_project_key_is_reported_in_body() {
    let server = MockServer::start().await;
    let backlog = client_for(&server, FIXTURE_API_KEY);

    let body = assert_ok!(
        backlog
            .projects()
            .create("DEMO", "markdown", false, false, Params::new().with("name", "Again"))
            .await
    );

    assert_eq!(body["errors"][0]["code"], 7);

    server.shutdown().await;
}

// =============================================================================
// Issue Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_issue_workflow() {
    let server = MockServer::start().await;
    let backlog = client_for(&server, FIXTURE_API_KEY);

    let issue = assert_ok!(
        backlog
            .issues()
            .create(1, "Search is slow", 1, 2, Params::new())
            .await
    );
    assert_eq!(issue["issueKey"], "DEMO-3");

    assert_ok!(
        backlog
            .issues()
            .create_comment("DEMO-3", "Profiling now", Params::new())
            .await
    );
    let comments = assert_ok!(backlog.issues().comments("DEMO-3", Params::new()).await);
    assert_eq!(comments[0]["content"], "Profiling now");

    let count = assert_ok!(
        backlog
            .issues()
            .count(Params::new().with("projectId[]", 1))
            .await
    );
    assert_eq!(count["count"], 3);

    let updated = assert_ok!(
        backlog
            .issues()
            .update("DEMO-3", Params::new().with("summary", "Search is fast"))
            .await
    );
    assert_eq!(updated["summary"], "Search is fast");

    assert_ok!(backlog.issues().delete("DEMO-3").await);
    assert_err!(backlog.issues().find("DEMO-3").await);

    server.shutdown().await;
}

#[tokio::test]
async fn test_issue_list_respects_count() {
    let server = MockServer::start().await;
    let backlog = client_for(&server, FIXTURE_API_KEY);

    let issues = assert_ok!(backlog.issues().list(Params::new().with("count", 1)).await);

    assert_eq!(issues.as_array().map(Vec::len), Some(1));
    assert_eq!(issues[0]["issueKey"], "DEMO-1");

    server.shutdown().await;
}

#[tokio::test]
async fn test_issue_list_filters_by_one_project() {
    let state = Fixtures::default_state()
        .with_project(Fixtures::project(2, "OPS", "Operations"))
        .with_issue(Fixtures::issue(500, 2, "OPS-1", "Rotate certificates"));
    let server = MockServer::with_state(state).await;
    let backlog = client_for(&server, FIXTURE_API_KEY);

    let ops = assert_ok!(
        backlog
            .issues()
            .list(Params::new().with("projectId[]", 2))
            .await
    );
    assert_eq!(ops.as_array().map(Vec::len), Some(1));
    assert_eq!(ops[0]["issueKey"], "OPS-1");

    let demo = assert_ok!(
        backlog
            .issues()
            .count(Params::new().with("projectId[]", 2).with("projectId[]", 1))
            .await
    );
    assert_eq!(demo["count"], 2);

    server.shutdown().await;
}

#[tokio::test]
async fn test_attachment_download() {
    let server = MockServer::start().await;
    let backlog = client_for(&server, FIXTURE_API_KEY);

    let file = assert_ok!(backlog.issues().attachment("DEMO-1", 300).await);

    assert_eq!(file.status(), 200);
    assert_eq!(file.file_name().as_deref(), Some("仕様.txt"));
    assert_eq!(file.bytes().await.unwrap().as_ref(), b"expected layout");

    let err = assert_err!(backlog.issues().attachment("DEMO-2", 300).await);
    assert_eq!(err.code(), 404);

    server.shutdown().await;
}

// =============================================================================
// Wiki Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_wiki_workflow() {
    let server = MockServer::start().await;
    let backlog = client_for(&server, FIXTURE_API_KEY);

    let wiki = assert_ok!(
        backlog
            .wikis()
            .create(1, "Runbook", "Restart the worker", Params::new())
            .await
    );
    let wiki_id = wiki["id"].as_u64().unwrap();

    let pages = assert_ok!(backlog.wikis().list("DEMO").await);
    assert_eq!(pages.as_array().map(Vec::len), Some(2));

    let linked = assert_ok!(backlog.wikis().attach(wiki_id, &[31, 32]).await);
    assert_eq!(linked.as_array().map(Vec::len), Some(2));

    let attachments = assert_ok!(backlog.wikis().attachments(wiki_id).await);
    assert_eq!(attachments[1]["id"], 32);

    assert_ok!(backlog.wikis().delete(wiki_id).await);
    let err = assert_err!(backlog.wikis().find(wiki_id).await);
    assert_eq!(err.code(), 404);

    server.shutdown().await;
}

// =============================================================================
// Custom State Tests
// =============================================================================

#[tokio::test]
async fn test_custom_state() {
    let state = MockState::new()
        .with_project(Fixtures::project(7, "CUSTOM", "Custom Project"))
        .with_issue(Fixtures::issue(70, 7, "CUSTOM-1", "Only issue"));
    let server = MockServer::with_state(state).await;
    let backlog = client_for(&server, "any-key");

    let issue = assert_ok!(backlog.issues().find(70).await);
    assert_eq!(issue["issueKey"], "CUSTOM-1");

    server.shutdown().await;
}

#[tokio::test]
async fn test_state_is_visible_to_tests() {
    let server = MockServer::start().await;
    let backlog = client_for(&server, FIXTURE_API_KEY);

    assert_ok!(
        backlog
            .issues()
            .create_comment(100, "Second look", Params::new())
            .await
    );

    let state = server.state();
    let state = state.read().await;
    assert_eq!(state.comments[&100].len(), 2);
    drop(state);

    server.shutdown().await;
}
