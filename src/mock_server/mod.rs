//! Mock Backlog API server for E2E testing.
//!
//! An in-memory server that keeps state across requests, so create/update/
//! delete workflows can be exercised end to end. Per-request HTTP
//! expectations are better served by wiremock.
//!
//! # Example
//!
//! ```ignore
//! use backlog_api::mock_server::{MockServer, FIXTURE_API_KEY};
//! use backlog_api::{ApiKeyConnector, Backlog};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let connector = ApiKeyConnector::with_base_url(FIXTURE_API_KEY, &server.api_url()).unwrap();
//!     let backlog = Backlog::new(connector);
//!
//!     let project = backlog.projects().find("DEMO").await.unwrap();
//!     assert_eq!(project["name"], "Demo Project");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{Fixtures, FIXTURE_API_KEY};
pub use server::MockServer;
pub use state::{MockState, StoredFile};
