//! Test data fixtures for the mock server.

use serde_json::{json, Value};

use super::state::{MockState, StoredFile};

/// API key accepted by the default scenario.
pub const FIXTURE_API_KEY: &str = "test-api-key";

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    /// A project with the given id, key and name.
    pub fn project(id: u64, key: &str, name: &str) -> Value {
        json!({
            "id": id,
            "projectKey": key,
            "name": name,
            "chartEnabled": false,
            "subtaskingEnabled": false,
            "textFormattingRule": "markdown",
            "archived": false,
        })
    }

    /// An open issue.
    pub fn issue(id: u64, project_id: u64, issue_key: &str, summary: &str) -> Value {
        json!({
            "id": id,
            "projectId": project_id,
            "issueKey": issue_key,
            "summary": summary,
            "description": "",
            "issueType": { "id": 1, "name": "Bug" },
            "priority": { "id": 3, "name": "Normal" },
            "status": { "id": 1, "name": "Open" },
            "created": "2024-04-01T09:00:00Z",
            "updated": "2024-04-01T09:00:00Z",
        })
    }

    /// A wiki page.
    pub fn wiki(id: u64, project_id: u64, name: &str, content: &str) -> Value {
        json!({
            "id": id,
            "projectId": project_id,
            "name": name,
            "content": content,
            "tags": [{ "id": 1, "name": "guide" }],
            "created": "2024-04-01T09:00:00Z",
            "updated": "2024-04-01T09:00:00Z",
        })
    }

    /// A comment.
    pub fn comment(id: u64, content: &str) -> Value {
        json!({
            "id": id,
            "content": content,
            "created": "2024-04-02T10:30:00Z",
        })
    }

    /// A plain-text attachment.
    pub fn text_file(issue_id: u64, name: &str, content: &str) -> StoredFile {
        StoredFile {
            issue_id,
            name: name.to_string(),
            content_type: "text/plain".to_string(),
            bytes: content.as_bytes().to_vec(),
        }
    }

    /// One project `DEMO` (id 1) with two issues, a comment, an attachment
    /// on `DEMO-1` and a wiki home page. Requests must use [`FIXTURE_API_KEY`].
    pub fn default_state() -> MockState {
        MockState::new()
            .with_required_api_key(FIXTURE_API_KEY)
            .with_project(Self::project(1, "DEMO", "Demo Project"))
            .with_issue(Self::issue(100, 1, "DEMO-1", "Login button is misaligned"))
            .with_issue(Self::issue(101, 1, "DEMO-2", "Crash on empty search"))
            .with_comment(100, Self::comment(200, "Reproduced on Android"))
            .with_file(300, Self::text_file(100, "仕様.txt", "expected layout"))
            .with_wiki(Self::wiki(400, 1, "Home", "# Welcome"))
    }
}
