//! Mock Backlog API server.
//!
//! Provides an axum-based HTTP server that simulates the Backlog API.

use std::sync::Arc;

use axum::{
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::Fixtures;
use super::handlers;
use super::state::MockState;

/// A mock Backlog API server for testing.
///
/// Routes live under `/api/v2`, so point a connector at [`MockServer::api_url`].
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    pub async fn start() -> Self {
        Self::with_state(Fixtures::default_state()).await
    }

    /// Start a mock server with empty state and no API key check.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the root URL of the mock server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the API root (`{url}/api/v2/`).
    pub fn api_url(&self) -> String {
        format!("{}/api/v2/", self.url)
    }

    /// Get access to the server's shared state.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the axum router with all routes.
    pub fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        let api = Router::new()
            // Project routes
            .route(
                "/projects",
                get(handlers::list_projects).post(handlers::create_project),
            )
            .route(
                "/projects/:id_or_key",
                get(handlers::get_project)
                    .patch(handlers::update_project)
                    .delete(handlers::delete_project),
            )
            // Issue routes
            .route(
                "/issues",
                get(handlers::list_issues).post(handlers::create_issue),
            )
            .route("/issues/count", get(handlers::count_issues))
            .route(
                "/issues/:id_or_key",
                get(handlers::get_issue)
                    .patch(handlers::update_issue)
                    .delete(handlers::delete_issue),
            )
            .route(
                "/issues/:id_or_key/comments",
                get(handlers::list_comments).post(handlers::create_comment),
            )
            .route(
                "/issues/:id_or_key/attachments/:attachment_id",
                get(handlers::download_attachment),
            )
            // Wiki routes
            .route(
                "/wikis",
                get(handlers::list_wikis).post(handlers::create_wiki),
            )
            .route(
                "/wikis/:wiki_id",
                get(handlers::get_wiki).delete(handlers::delete_wiki),
            )
            .route(
                "/wikis/:wiki_id/attachments",
                get(handlers::list_wiki_attachments).post(handlers::attach_to_wiki),
            )
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                handlers::require_api_key,
            ));

        Router::new()
            .nest("/api/v2", api)
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::mock_server::FIXTURE_API_KEY;
    use crate::{ApiKeyConnector, Backlog, Params};

    async fn call(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_router_rejects_missing_api_key() {
        let router = MockServer::create_router(Fixtures::default_state().shared());

        let (status, body) = call(router, "/api/v2/projects").await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["errors"][0]["code"], 11);
    }

    #[tokio::test]
    async fn test_router_serves_fixture_project() {
        let router = MockServer::create_router(Fixtures::default_state().shared());

        let uri = format!("/api/v2/projects/DEMO?apiKey={FIXTURE_API_KEY}");
        let (status, body) = call(router, &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["projectKey"], "DEMO");
    }

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        let response = reqwest::Client::new()
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_find_issue_with_backlog_client() {
        let server = MockServer::start().await;
        let connector = ApiKeyConnector::with_base_url(FIXTURE_API_KEY, &server.api_url()).unwrap();
        let backlog = Backlog::new(connector);

        let issue = backlog
            .issues()
            .find("DEMO-1")
            .await
            .expect("Failed to get issue");

        assert_eq!(issue["summary"], "Login button is misaligned");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server_has_no_auth() {
        let server = MockServer::start_empty().await;
        let connector = ApiKeyConnector::with_base_url("anything", &server.api_url()).unwrap();
        let backlog = Backlog::new(connector);

        let projects = backlog.projects().list(Params::new()).await.unwrap();

        assert_eq!(projects, serde_json::json!([]));

        server.shutdown().await;
    }
}
