//! Issue endpoints.

use std::fmt::Display;

use serde_json::Value;

use crate::connector::{ApiKeyConnector, Connector};
use crate::error::Result;
use crate::params::Params;
use crate::response::RawResponse;

/// Client for `/issues` and its sub-resources.
///
/// # Example
///
/// ```no_run
/// use backlog_api::{ApiKeyConnector, Issues, Params};
///
/// # async fn example() -> backlog_api::Result<()> {
/// let connector = ApiKeyConnector::from_env()?;
/// let issues = Issues::new(&connector);
///
/// let created = issues
///     .create(12, "Login button is misaligned", 3, 2, Params::new().with("description", "On mobile"))
///     .await?;
/// println!("created {}", created["issueKey"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Issues<'a, C: ?Sized = ApiKeyConnector> {
    connector: &'a C,
}

impl<C: ?Sized> Clone for Issues<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for Issues<'_, C> {}

impl<'a, C: Connector + ?Sized> Issues<'a, C> {
    /// Bind the client to a connector.
    pub fn new(connector: &'a C) -> Self {
        Self { connector }
    }

    /// List issues. `GET /issues`
    ///
    /// Filters such as `projectId[]` take one value per key, since [`Params`]
    /// keys are unique. Filtering on several projects at once is not
    /// expressible; issue one call per project instead.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query_options: Params) -> Result<Value> {
        let query = Params::merge(Params::new(), query_options);
        self.connector
            .get("issues", &Params::new(), &query, &Params::new())
            .await
    }

    /// Count issues matching the filter. `GET /issues/count`
    ///
    /// Same single-value filter rules as [`Issues::list`].
    pub async fn count(&self, query_options: Params) -> Result<Value> {
        let query = Params::merge(Params::new(), query_options);
        self.connector
            .get("issues/count", &Params::new(), &query, &Params::new())
            .await
    }

    /// Add an issue. `POST /issues`
    ///
    /// `form_options` carries the optional fields (`description`,
    /// `assigneeId`, `dueDate`, ...) and overrides any of the positional ones.
    #[tracing::instrument(skip(self, form_options))]
    pub async fn create(
        &self,
        project_id: u64,
        summary: &str,
        issue_type_id: u64,
        priority_id: u64,
        form_options: Params,
    ) -> Result<Value> {
        let defaults = Params::new()
            .with("projectId", project_id)
            .with("summary", summary)
            .with("issueTypeId", issue_type_id)
            .with("priorityId", priority_id);
        let form = Params::merge(defaults, form_options);

        self.connector
            .post("issues", &form, &Params::new(), &Params::form_headers())
            .await
    }

    /// Get one issue by id or key. `GET /issues/:idOrKey`
    pub async fn find(&self, issue_id_or_key: impl Display) -> Result<Value> {
        self.connector
            .get(
                &format!("issues/{issue_id_or_key}"),
                &Params::new(),
                &Params::new(),
                &Params::new(),
            )
            .await
    }

    /// Update an issue. `PATCH /issues/:idOrKey`
    pub async fn update(&self, issue_id_or_key: impl Display, form_options: Params) -> Result<Value> {
        let form = Params::merge(Params::new(), form_options);
        self.connector
            .patch(
                &format!("issues/{issue_id_or_key}"),
                &form,
                &Params::new(),
                &Params::form_headers(),
            )
            .await
    }

    /// Delete an issue. `DELETE /issues/:idOrKey`
    pub async fn delete(&self, issue_id_or_key: impl Display) -> Result<Value> {
        self.connector
            .delete(
                &format!("issues/{issue_id_or_key}"),
                &Params::new(),
                &Params::new(),
                &Params::new(),
            )
            .await
    }

    /// `GET /issues/:idOrKey/comments`
    pub async fn comments(&self, issue_id_or_key: impl Display, query_options: Params) -> Result<Value> {
        let query = Params::merge(Params::new(), query_options);
        self.connector
            .get(
                &format!("issues/{issue_id_or_key}/comments"),
                &Params::new(),
                &query,
                &Params::new(),
            )
            .await
    }

    /// `POST /issues/:idOrKey/comments`
    pub async fn create_comment(
        &self,
        issue_id_or_key: impl Display,
        content: &str,
        form_options: Params,
    ) -> Result<Value> {
        let form = Params::merge(Params::new().with("content", content), form_options);
        self.connector
            .post(
                &format!("issues/{issue_id_or_key}/comments"),
                &form,
                &Params::new(),
                &Params::form_headers(),
            )
            .await
    }

    /// `GET /issues/:idOrKey/comments/count`
    pub async fn comment_count(&self, issue_id_or_key: impl Display) -> Result<Value> {
        self.connector
            .get(
                &format!("issues/{issue_id_or_key}/comments/count"),
                &Params::new(),
                &Params::new(),
                &Params::new(),
            )
            .await
    }

    /// `GET /issues/:idOrKey/comments/:commentId`
    pub async fn find_comment(&self, issue_id_or_key: impl Display, comment_id: u64) -> Result<Value> {
        self.connector
            .get(
                &format!("issues/{issue_id_or_key}/comments/{comment_id}"),
                &Params::new(),
                &Params::new(),
                &Params::new(),
            )
            .await
    }

    /// `PATCH /issues/:idOrKey/comments/:commentId`
    pub async fn update_comment(
        &self,
        issue_id_or_key: impl Display,
        comment_id: u64,
        form_options: Params,
    ) -> Result<Value> {
        let form = Params::merge(Params::new(), form_options);
        self.connector
            .patch(
                &format!("issues/{issue_id_or_key}/comments/{comment_id}"),
                &form,
                &Params::new(),
                &Params::form_headers(),
            )
            .await
    }

    /// `GET /issues/:idOrKey/comments/:commentId/notifications`
    pub async fn comment_notifications(
        &self,
        issue_id_or_key: impl Display,
        comment_id: u64,
    ) -> Result<Value> {
        self.connector
            .get(
                &format!("issues/{issue_id_or_key}/comments/{comment_id}/notifications"),
                &Params::new(),
                &Params::new(),
                &Params::new(),
            )
            .await
    }

    /// Notify users about a comment. `POST /issues/:idOrKey/comments/:commentId/notifications`
    pub async fn create_comment_notification(
        &self,
        issue_id_or_key: impl Display,
        comment_id: u64,
        form_options: Params,
    ) -> Result<Value> {
        let form = Params::merge(Params::new(), form_options);
        self.connector
            .post(
                &format!("issues/{issue_id_or_key}/comments/{comment_id}/notifications"),
                &form,
                &Params::new(),
                &Params::form_headers(),
            )
            .await
    }

    /// `GET /issues/:idOrKey/attachments`
    pub async fn attachments(&self, issue_id_or_key: impl Display) -> Result<Value> {
        self.connector
            .get(
                &format!("issues/{issue_id_or_key}/attachments"),
                &Params::new(),
                &Params::new(),
                &Params::new(),
            )
            .await
    }

    /// Download an attachment. `GET /issues/:idOrKey/attachments/:attachmentId`
    pub async fn attachment(
        &self,
        issue_id_or_key: impl Display,
        attachment_id: impl Display,
    ) -> Result<RawResponse> {
        self.connector
            .get_file(
                &format!("issues/{issue_id_or_key}/attachments/{attachment_id}"),
                &Params::new(),
                &Params::new(),
                &Params::new(),
            )
            .await
    }

    /// `GET /issues/:idOrKey/sharedFiles`
    pub async fn shared_files(&self, issue_id_or_key: impl Display) -> Result<Value> {
        self.connector
            .get(
                &format!("issues/{issue_id_or_key}/sharedFiles"),
                &Params::new(),
                &Params::new(),
                &Params::new(),
            )
            .await
    }
}
