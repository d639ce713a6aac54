//! Project endpoints and project-scoped settings (users, statuses, issue
//! types, categories, versions, custom fields, files and webhooks).

use std::fmt::Display;

use serde_json::Value;

use crate::connector::{ApiKeyConnector, Connector};
use crate::error::Result;
use crate::params::Params;
use crate::response::RawResponse;

/// Client for `/projects` and its sub-resources.
#[derive(Debug)]
pub struct Projects<'a, C: ?Sized = ApiKeyConnector> {
    connector: &'a C,
}

impl<C: ?Sized> Clone for Projects<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for Projects<'_, C> {}

impl<'a, C: Connector + ?Sized> Projects<'a, C> {
    /// Bind the client to a connector.
    pub fn new(connector: &'a C) -> Self {
        Self { connector }
    }

    async fn read(&self, path: &str, query: &Params) -> Result<Value> {
        self.connector
            .get(path, &Params::new(), query, &Params::new())
            .await
    }

    async fn create_at(&self, path: &str, form: &Params) -> Result<Value> {
        self.connector
            .post(path, form, &Params::new(), &Params::form_headers())
            .await
    }

    async fn modify(&self, path: &str, form: &Params) -> Result<Value> {
        self.connector
            .patch(path, form, &Params::new(), &Params::form_headers())
            .await
    }

    async fn remove(&self, path: &str, form: &Params) -> Result<Value> {
        // Bodiless deletes carry no form content type.
        let headers = if form.is_empty() {
            Params::new()
        } else {
            Params::form_headers()
        };
        self.connector
            .delete(path, form, &Params::new(), &headers)
            .await
    }

    // =========================================================================
    // Projects
    // =========================================================================

    /// List projects. `GET /projects`
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query_options: Params) -> Result<Value> {
        let query = Params::merge(Params::new(), query_options);
        self.read("projects", &query).await
    }

    /// Add a project. `POST /projects`
    ///
    /// The positional arguments are defaults; any key in `form_options`
    /// (including `key` itself) replaces them. `name` is expected in
    /// `form_options`.
    #[tracing::instrument(skip(self, form_options))]
    pub async fn create(
        &self,
        project_key: &str,
        text_formatting_rule: &str,
        chart_enabled: bool,
        subtasking_enabled: bool,
        form_options: Params,
    ) -> Result<Value> {
        let defaults = Params::new()
            .with("key", project_key)
            .with("textFormattingRule", text_formatting_rule)
            .with("chartEnabled", chart_enabled)
            .with("subtaskingEnabled", subtasking_enabled);
        let form = Params::merge(defaults, form_options);
        self.create_at("projects", &form).await
    }

    /// Get a project. `GET /projects/:idOrKey`
    pub async fn find(&self, project_id_or_key: impl Display) -> Result<Value> {
        self.read(&format!("projects/{project_id_or_key}"), &Params::new())
            .await
    }

    /// Update a project. `PATCH /projects/:idOrKey`
    pub async fn update(&self, project_id_or_key: impl Display, form_options: Params) -> Result<Value> {
        let form = Params::merge(Params::new(), form_options);
        self.modify(&format!("projects/{project_id_or_key}"), &form)
            .await
    }

    /// Delete a project. `DELETE /projects/:idOrKey`
    pub async fn delete(&self, project_id_or_key: impl Display) -> Result<Value> {
        self.remove(&format!("projects/{project_id_or_key}"), &Params::new())
            .await
    }

    /// Download the project icon. `GET /projects/:idOrKey/image`
    pub async fn image(&self, project_id_or_key: impl Display) -> Result<RawResponse> {
        self.connector
            .get_file(
                &format!("projects/{project_id_or_key}/image"),
                &Params::new(),
                &Params::new(),
                &Params::new(),
            )
            .await
    }

    /// Recent activity. `GET /projects/:idOrKey/activities`
    pub async fn activities(&self, project_id_or_key: impl Display, query_options: Params) -> Result<Value> {
        let query = Params::merge(Params::new(), query_options);
        self.read(&format!("projects/{project_id_or_key}/activities"), &query)
            .await
    }

    // =========================================================================
    // Members and administrators
    // =========================================================================

    /// `GET /projects/:idOrKey/users`
    pub async fn users(&self, project_id_or_key: impl Display, query_options: Params) -> Result<Value> {
        let query = Params::merge(Params::new(), query_options);
        self.read(&format!("projects/{project_id_or_key}/users"), &query)
            .await
    }

    /// `POST /projects/:idOrKey/users`
    pub async fn add_user(&self, project_id_or_key: impl Display, user_id: u64) -> Result<Value> {
        let form = Params::new().with("userId", user_id);
        self.create_at(&format!("projects/{project_id_or_key}/users"), &form)
            .await
    }

    /// `DELETE /projects/:idOrKey/users` with the user in the body.
    pub async fn remove_user(&self, project_id_or_key: impl Display, user_id: u64) -> Result<Value> {
        let form = Params::new().with("userId", user_id);
        self.remove(&format!("projects/{project_id_or_key}/users"), &form)
            .await
    }

    /// `GET /projects/:idOrKey/administrators`
    pub async fn administrators(&self, project_id_or_key: impl Display) -> Result<Value> {
        self.read(
            &format!("projects/{project_id_or_key}/administrators"),
            &Params::new(),
        )
        .await
    }

    /// `POST /projects/:idOrKey/administrators`
    pub async fn add_administrator(&self, project_id_or_key: impl Display, user_id: u64) -> Result<Value> {
        let form = Params::new().with("userId", user_id);
        self.create_at(&format!("projects/{project_id_or_key}/administrators"), &form)
            .await
    }

    /// `DELETE /projects/:idOrKey/administrators`
    pub async fn remove_administrator(
        &self,
        project_id_or_key: impl Display,
        user_id: u64,
    ) -> Result<Value> {
        let form = Params::new().with("userId", user_id);
        self.remove(&format!("projects/{project_id_or_key}/administrators"), &form)
            .await
    }

    // =========================================================================
    // Statuses
    // =========================================================================

    /// `GET /projects/:idOrKey/statuses`
    pub async fn statuses(&self, project_id_or_key: impl Display) -> Result<Value> {
        self.read(&format!("projects/{project_id_or_key}/statuses"), &Params::new())
            .await
    }

    /// `POST /projects/:idOrKey/statuses`
    pub async fn create_status(
        &self,
        project_id_or_key: impl Display,
        name: &str,
        color: &str,
    ) -> Result<Value> {
        let form = Params::new().with("name", name).with("color", color);
        self.create_at(&format!("projects/{project_id_or_key}/statuses"), &form)
            .await
    }

    /// `PATCH /projects/:idOrKey/statuses/:id`
    pub async fn update_status(
        &self,
        project_id_or_key: impl Display,
        status_id: u64,
        form_options: Params,
    ) -> Result<Value> {
        let form = Params::merge(Params::new(), form_options);
        self.modify(
            &format!("projects/{project_id_or_key}/statuses/{status_id}"),
            &form,
        )
        .await
    }

    /// Delete a status, moving its issues to `substitute_status_id`.
    /// `DELETE /projects/:idOrKey/statuses/:id`
    pub async fn delete_status(
        &self,
        project_id_or_key: impl Display,
        status_id: u64,
        substitute_status_id: u64,
    ) -> Result<Value> {
        let form = Params::new().with("substituteStatusId", substitute_status_id);
        self.remove(
            &format!("projects/{project_id_or_key}/statuses/{status_id}"),
            &form,
        )
        .await
    }

    /// `PATCH /projects/:idOrKey/statuses/updateDisplayOrder`
    pub async fn update_status_order(
        &self,
        project_id_or_key: impl Display,
        form_options: Params,
    ) -> Result<Value> {
        let form = Params::merge(Params::new(), form_options);
        self.modify(
            &format!("projects/{project_id_or_key}/statuses/updateDisplayOrder"),
            &form,
        )
        .await
    }

    // =========================================================================
    // Issue types
    // =========================================================================

    /// `GET /projects/:idOrKey/issueTypes`
    pub async fn issue_types(&self, project_id_or_key: impl Display) -> Result<Value> {
        self.read(&format!("projects/{project_id_or_key}/issueTypes"), &Params::new())
            .await
    }

    /// `POST /projects/:idOrKey/issueTypes`
    pub async fn create_issue_type(
        &self,
        project_id_or_key: impl Display,
        name: &str,
        color: &str,
        form_options: Params,
    ) -> Result<Value> {
        let defaults = Params::new().with("name", name).with("color", color);
        let form = Params::merge(defaults, form_options);
        self.create_at(&format!("projects/{project_id_or_key}/issueTypes"), &form)
            .await
    }

    /// `PATCH /projects/:idOrKey/issueTypes/:id`
    pub async fn update_issue_type(
        &self,
        project_id_or_key: impl Display,
        issue_type_id: u64,
        form_options: Params,
    ) -> Result<Value> {
        let form = Params::merge(Params::new(), form_options);
        self.modify(
            &format!("projects/{project_id_or_key}/issueTypes/{issue_type_id}"),
            &form,
        )
        .await
    }

    /// `DELETE /projects/:idOrKey/issueTypes/:id`
    pub async fn delete_issue_type(
        &self,
        project_id_or_key: impl Display,
        issue_type_id: u64,
        substitute_issue_type_id: u64,
    ) -> Result<Value> {
        let form = Params::new().with("substituteIssueTypeId", substitute_issue_type_id);
        self.remove(
            &format!("projects/{project_id_or_key}/issueTypes/{issue_type_id}"),
            &form,
        )
        .await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// `GET /projects/:idOrKey/categories`
    pub async fn categories(&self, project_id_or_key: impl Display) -> Result<Value> {
        self.read(&format!("projects/{project_id_or_key}/categories"), &Params::new())
            .await
    }

    /// `POST /projects/:idOrKey/categories`
    pub async fn create_category(&self, project_id_or_key: impl Display, name: &str) -> Result<Value> {
        let form = Params::new().with("name", name);
        self.create_at(&format!("projects/{project_id_or_key}/categories"), &form)
            .await
    }

    /// `PATCH /projects/:idOrKey/categories/:id`
    pub async fn update_category(
        &self,
        project_id_or_key: impl Display,
        category_id: u64,
        name: &str,
    ) -> Result<Value> {
        let form = Params::new().with("name", name);
        self.modify(
            &format!("projects/{project_id_or_key}/categories/{category_id}"),
            &form,
        )
        .await
    }

    /// `DELETE /projects/:idOrKey/categories/:id`
    pub async fn delete_category(&self, project_id_or_key: impl Display, category_id: u64) -> Result<Value> {
        self.remove(
            &format!("projects/{project_id_or_key}/categories/{category_id}"),
            &Params::new(),
        )
        .await
    }

    // =========================================================================
    // Versions (milestones)
    // =========================================================================

    /// `GET /projects/:idOrKey/versions`
    pub async fn versions(&self, project_id_or_key: impl Display) -> Result<Value> {
        self.read(&format!("projects/{project_id_or_key}/versions"), &Params::new())
            .await
    }

    /// `POST /projects/:idOrKey/versions`
    pub async fn create_version(
        &self,
        project_id_or_key: impl Display,
        name: &str,
        form_options: Params,
    ) -> Result<Value> {
        let form = Params::merge(Params::new().with("name", name), form_options);
        self.create_at(&format!("projects/{project_id_or_key}/versions"), &form)
            .await
    }

    /// `PATCH /projects/:idOrKey/versions/:id`
    pub async fn update_version(
        &self,
        project_id_or_key: impl Display,
        version_id: u64,
        name: &str,
        form_options: Params,
    ) -> Result<Value> {
        let form = Params::merge(Params::new().with("name", name), form_options);
        self.modify(
            &format!("projects/{project_id_or_key}/versions/{version_id}"),
            &form,
        )
        .await
    }

    /// `DELETE /projects/:idOrKey/versions/:id`
    pub async fn delete_version(&self, project_id_or_key: impl Display, version_id: u64) -> Result<Value> {
        self.remove(
            &format!("projects/{project_id_or_key}/versions/{version_id}"),
            &Params::new(),
        )
        .await
    }

    // =========================================================================
    // Custom fields
    // =========================================================================

    /// `GET /projects/:idOrKey/customFields`
    pub async fn custom_fields(&self, project_id_or_key: impl Display) -> Result<Value> {
        self.read(&format!("projects/{project_id_or_key}/customFields"), &Params::new())
            .await
    }

    /// `POST /projects/:idOrKey/customFields`
    pub async fn create_custom_field(
        &self,
        project_id_or_key: impl Display,
        type_id: u64,
        name: &str,
        form_options: Params,
    ) -> Result<Value> {
        let defaults = Params::new().with("typeId", type_id).with("name", name);
        let form = Params::merge(defaults, form_options);
        self.create_at(&format!("projects/{project_id_or_key}/customFields"), &form)
            .await
    }

    /// `PATCH /projects/:idOrKey/customFields/:id`
    pub async fn update_custom_field(
        &self,
        project_id_or_key: impl Display,
        custom_field_id: u64,
        form_options: Params,
    ) -> Result<Value> {
        let form = Params::merge(Params::new(), form_options);
        self.modify(
            &format!("projects/{project_id_or_key}/customFields/{custom_field_id}"),
            &form,
        )
        .await
    }

    /// `DELETE /projects/:idOrKey/customFields/:id`
    pub async fn delete_custom_field(
        &self,
        project_id_or_key: impl Display,
        custom_field_id: u64,
    ) -> Result<Value> {
        self.remove(
            &format!("projects/{project_id_or_key}/customFields/{custom_field_id}"),
            &Params::new(),
        )
        .await
    }

    /// Add a list item to a list-type custom field.
    /// `POST /projects/:idOrKey/customFields/:id/items`
    pub async fn create_custom_field_item(
        &self,
        project_id_or_key: impl Display,
        custom_field_id: u64,
        name: &str,
    ) -> Result<Value> {
        let form = Params::new().with("name", name);
        self.create_at(
            &format!("projects/{project_id_or_key}/customFields/{custom_field_id}/items"),
            &form,
        )
        .await
    }

    /// `PATCH /projects/:idOrKey/customFields/:id/items/:itemId`
    pub async fn update_custom_field_item(
        &self,
        project_id_or_key: impl Display,
        custom_field_id: u64,
        item_id: u64,
        name: &str,
    ) -> Result<Value> {
        let form = Params::new().with("name", name);
        self.modify(
            &format!("projects/{project_id_or_key}/customFields/{custom_field_id}/items/{item_id}"),
            &form,
        )
        .await
    }

    /// `DELETE /projects/:idOrKey/customFields/:id/items/:itemId`
    pub async fn delete_custom_field_item(
        &self,
        project_id_or_key: impl Display,
        custom_field_id: u64,
        item_id: u64,
    ) -> Result<Value> {
        self.remove(
            &format!("projects/{project_id_or_key}/customFields/{custom_field_id}/items/{item_id}"),
            &Params::new(),
        )
        .await
    }

    // =========================================================================
    // Shared files
    // =========================================================================

    /// List shared files under a directory.
    /// `GET /projects/:idOrKey/files/metadata/:path`
    ///
    /// `path` is interpolated as given, slashes included.
    pub async fn shared_files(
        &self,
        project_id_or_key: impl Display,
        path: &str,
        query_options: Params,
    ) -> Result<Value> {
        let query = Params::merge(Params::new(), query_options);
        self.read(
            &format!("projects/{project_id_or_key}/files/metadata/{path}"),
            &query,
        )
        .await
    }

    /// Download a shared file. `GET /projects/:idOrKey/files/:sharedFileId`
    pub async fn file(&self, project_id_or_key: impl Display, shared_file_id: u64) -> Result<RawResponse> {
        self.connector
            .get_file(
                &format!("projects/{project_id_or_key}/files/{shared_file_id}"),
                &Params::new(),
                &Params::new(),
                &Params::new(),
            )
            .await
    }

    /// `GET /projects/:idOrKey/diskUsage`
    pub async fn disk_usage(&self, project_id_or_key: impl Display) -> Result<Value> {
        self.read(&format!("projects/{project_id_or_key}/diskUsage"), &Params::new())
            .await
    }

    // =========================================================================
    // Webhooks
    // =========================================================================

    /// `GET /projects/:idOrKey/webhooks`
    pub async fn webhooks(&self, project_id_or_key: impl Display) -> Result<Value> {
        self.read(&format!("projects/{project_id_or_key}/webhooks"), &Params::new())
            .await
    }

    /// `POST /projects/:idOrKey/webhooks`
    pub async fn create_webhook(&self, project_id_or_key: impl Display, form_options: Params) -> Result<Value> {
        let form = Params::merge(Params::new(), form_options);
        self.create_at(&format!("projects/{project_id_or_key}/webhooks"), &form)
            .await
    }

    /// `GET /projects/:idOrKey/webhooks/:webhookId`
    pub async fn find_webhook(&self, project_id_or_key: impl Display, webhook_id: impl Display) -> Result<Value> {
        self.read(
            &format!("projects/{project_id_or_key}/webhooks/{webhook_id}"),
            &Params::new(),
        )
        .await
    }

    /// `PATCH /projects/:idOrKey/webhooks/:webhookId`
    pub async fn update_webhook(
        &self,
        project_id_or_key: impl Display,
        webhook_id: impl Display,
        form_options: Params,
    ) -> Result<Value> {
        let form = Params::merge(Params::new(), form_options);
        self.modify(
            &format!("projects/{project_id_or_key}/webhooks/{webhook_id}"),
            &form,
        )
        .await
    }

    /// `DELETE /projects/:idOrKey/webhooks/:webhookId`
    pub async fn delete_webhook(&self, project_id_or_key: impl Display, webhook_id: impl Display) -> Result<Value> {
        self.remove(
            &format!("projects/{project_id_or_key}/webhooks/{webhook_id}"),
            &Params::new(),
        )
        .await
    }
}
