//! Mock server state management.
//!
//! Records are kept as JSON values shaped like Backlog's responses, in
//! insertion order so list endpoints answer deterministically.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use tokio::sync::RwLock;

/// A downloadable issue attachment.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub issue_id: u64,
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Shared state for the mock server.
#[derive(Debug, Default)]
pub struct MockState {
    pub projects: Vec<Value>,
    pub issues: Vec<Value>,
    /// Comments indexed by issue id.
    pub comments: HashMap<u64, Vec<Value>>,
    pub wikis: Vec<Value>,
    /// Attachments linked to a wiki, indexed by wiki id.
    pub wiki_attachments: HashMap<u64, Vec<Value>>,
    /// Issue attachments indexed by attachment id.
    pub files: HashMap<u64, StoredFile>,
    /// If set, every request must carry this `apiKey`.
    pub required_api_key: Option<String>,
    next_id: u64,
}

pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn id_of(value: &Value) -> Option<u64> {
    value.get("id").and_then(Value::as_u64)
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Allocate an id unused by any record.
    pub fn next_id(&mut self) -> u64 {
        self.next_id = self.next_id.max(1);
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn reserve(&mut self, id: u64) {
        self.next_id = self.next_id.max(id + 1);
    }

    /// Add a project record (must carry `id` and `projectKey`).
    pub fn with_project(mut self, project: Value) -> Self {
        if let Some(id) = id_of(&project) {
            self.reserve(id);
        }
        self.projects.push(project);
        self
    }

    /// Add an issue record (must carry `id`, `issueKey` and `projectId`).
    pub fn with_issue(mut self, issue: Value) -> Self {
        if let Some(id) = id_of(&issue) {
            self.reserve(id);
        }
        self.issues.push(issue);
        self
    }

    /// Add a comment to an issue.
    pub fn with_comment(mut self, issue_id: u64, comment: Value) -> Self {
        if let Some(id) = id_of(&comment) {
            self.reserve(id);
        }
        self.comments.entry(issue_id).or_default().push(comment);
        self
    }

    /// Add a wiki page record (must carry `id` and `projectId`).
    pub fn with_wiki(mut self, wiki: Value) -> Self {
        if let Some(id) = id_of(&wiki) {
            self.reserve(id);
        }
        self.wikis.push(wiki);
        self
    }

    /// Add a downloadable attachment to an issue.
    pub fn with_file(mut self, attachment_id: u64, file: StoredFile) -> Self {
        self.reserve(attachment_id);
        self.files.insert(attachment_id, file);
        self
    }

    /// Set the required API key.
    pub fn with_required_api_key(mut self, api_key: &str) -> Self {
        self.required_api_key = Some(api_key.to_string());
        self
    }

    /// Find a project by numeric id or project key.
    pub fn find_project(&self, id_or_key: &str) -> Option<&Value> {
        self.projects.iter().find(|p| {
            p["projectKey"].as_str() == Some(id_or_key)
                || id_of(p).map(|id| id.to_string()).as_deref() == Some(id_or_key)
        })
    }

    fn project_index(&self, id_or_key: &str) -> Option<usize> {
        let id = id_of(self.find_project(id_or_key)?)?;
        self.projects.iter().position(|p| id_of(p) == Some(id))
    }

    /// Find an issue by numeric id or issue key.
    pub fn find_issue(&self, id_or_key: &str) -> Option<&Value> {
        self.issues.iter().find(|i| {
            i["issueKey"].as_str() == Some(id_or_key)
                || id_of(i).map(|id| id.to_string()).as_deref() == Some(id_or_key)
        })
    }

    fn issue_index(&self, id_or_key: &str) -> Option<usize> {
        let id = id_of(self.find_issue(id_or_key)?)?;
        self.issues.iter().position(|i| id_of(i) == Some(id))
    }

    /// Find a wiki page by id.
    pub fn find_wiki(&self, wiki_id: u64) -> Option<&Value> {
        self.wikis.iter().find(|w| id_of(w) == Some(wiki_id))
    }

    /// Issues belonging to the given project ids; all issues if empty.
    pub fn list_issues(&self, project_ids: &[u64]) -> Vec<&Value> {
        self.issues
            .iter()
            .filter(|i| {
                project_ids.is_empty()
                    || i["projectId"]
                        .as_u64()
                        .is_some_and(|id| project_ids.contains(&id))
            })
            .collect()
    }

    /// Wiki pages of one project.
    pub fn list_wikis(&self, project_id: u64) -> Vec<&Value> {
        self.wikis
            .iter()
            .filter(|w| w["projectId"].as_u64() == Some(project_id))
            .collect()
    }

    /// Insert a new project and return it.
    pub fn create_project(&mut self, key: &str, name: &str, fields: &[(&str, Value)]) -> Value {
        let id = self.next_id();
        let mut project = json!({
            "id": id,
            "projectKey": key,
            "name": name,
            "chartEnabled": false,
            "subtaskingEnabled": false,
            "textFormattingRule": "markdown",
            "archived": false,
        });
        for (field, value) in fields {
            project[*field] = value.clone();
        }
        self.projects.push(project.clone());
        project
    }

    /// Apply field updates to a project and return the updated record.
    pub fn update_project(&mut self, id_or_key: &str, fields: &[(&str, Value)]) -> Option<&Value> {
        let index = self.project_index(id_or_key)?;
        let project = &mut self.projects[index];
        for (field, value) in fields {
            project[*field] = value.clone();
        }
        Some(&self.projects[index])
    }

    /// Remove a project and return it.
    pub fn delete_project(&mut self, id_or_key: &str) -> Option<Value> {
        let index = self.project_index(id_or_key)?;
        Some(self.projects.remove(index))
    }

    /// Insert a new issue into a project and return it.
    ///
    /// Returns `None` if the project does not exist.
    pub fn create_issue(
        &mut self,
        project_id: u64,
        summary: &str,
        issue_type_id: u64,
        priority_id: u64,
        description: Option<&str>,
    ) -> Option<Value> {
        let project = self.find_project(&project_id.to_string())?;
        let project_key = project["projectKey"].as_str().unwrap_or_default().to_string();
        let key_id = self
            .issues
            .iter()
            .filter(|i| i["projectId"].as_u64() == Some(project_id))
            .count()
            + 1;

        let id = self.next_id();
        let now = timestamp();
        let issue = json!({
            "id": id,
            "projectId": project_id,
            "issueKey": format!("{project_key}-{key_id}"),
            "keyId": key_id,
            "issueType": { "id": issue_type_id },
            "summary": summary,
            "description": description.unwrap_or_default(),
            "priority": { "id": priority_id },
            "status": { "id": 1, "name": "Open" },
            "created": now,
            "updated": now,
        });
        self.issues.push(issue.clone());
        Some(issue)
    }

    /// Apply field updates to an issue and return the updated record.
    pub fn update_issue(&mut self, id_or_key: &str, fields: &[(&str, Value)]) -> Option<&Value> {
        let index = self.issue_index(id_or_key)?;
        let issue = &mut self.issues[index];
        for (field, value) in fields {
            issue[*field] = value.clone();
        }
        issue["updated"] = Value::String(timestamp());
        Some(&self.issues[index])
    }

    /// Remove an issue and its comments, returning the issue.
    pub fn delete_issue(&mut self, id_or_key: &str) -> Option<Value> {
        let index = self.issue_index(id_or_key)?;
        let issue = self.issues.remove(index);
        if let Some(id) = id_of(&issue) {
            self.comments.remove(&id);
        }
        Some(issue)
    }

    /// Append a comment to an issue and return it.
    pub fn add_comment(&mut self, issue_id: u64, content: &str) -> Value {
        let id = self.next_id();
        let comment = json!({
            "id": id,
            "content": content,
            "created": timestamp(),
        });
        self.comments.entry(issue_id).or_default().push(comment.clone());
        comment
    }

    /// Insert a wiki page and return it.
    pub fn create_wiki(&mut self, project_id: u64, name: &str, content: &str) -> Value {
        let id = self.next_id();
        let now = timestamp();
        let wiki = json!({
            "id": id,
            "projectId": project_id,
            "name": name,
            "content": content,
            "tags": [],
            "created": now,
            "updated": now,
        });
        self.wikis.push(wiki.clone());
        wiki
    }

    /// Remove a wiki page and return it.
    pub fn delete_wiki(&mut self, wiki_id: u64) -> Option<Value> {
        let index = self.wikis.iter().position(|w| id_of(w) == Some(wiki_id))?;
        self.wiki_attachments.remove(&wiki_id);
        Some(self.wikis.remove(index))
    }

    /// Link attachments to a wiki page, returning the newly linked records.
    pub fn attach_to_wiki(&mut self, wiki_id: u64, attachment_ids: &[u64]) -> Vec<Value> {
        let linked: Vec<Value> = attachment_ids
            .iter()
            .map(|id| {
                json!({
                    "id": id,
                    "name": format!("attachment-{id}"),
                    "created": timestamp(),
                })
            })
            .collect();
        self.wiki_attachments
            .entry(wiki_id)
            .or_default()
            .extend(linked.iter().cloned());
        linked
    }
}
