//! Wiki endpoints.

use serde_json::Value;

use crate::connector::{ApiKeyConnector, Connector};
use crate::error::Result;
use crate::params::{Multipart, Params};

/// Multipart field naming each attachment to link.
const ATTACHMENT_ID_FIELD: &str = "attachmentId[]";

/// Client for `/wikis` and its sub-resources.
///
/// Listing endpoints are scoped to one project through the
/// `projectIdOrKey` query parameter.
#[derive(Debug)]
pub struct Wikis<'a, C: ?Sized = ApiKeyConnector> {
    connector: &'a C,
}

impl<C: ?Sized> Clone for Wikis<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C: ?Sized> Copy for Wikis<'_, C> {}

impl<'a, C: Connector + ?Sized> Wikis<'a, C> {
    /// Bind the client to a connector.
    pub fn new(connector: &'a C) -> Self {
        Self { connector }
    }

    async fn read(&self, path: &str, query: &Params) -> Result<Value> {
        self.connector
            .get(path, &Params::new(), query, &Params::new())
            .await
    }

    fn project_scope(project_id_or_key: &str) -> Params {
        Params::new().with("projectIdOrKey", project_id_or_key)
    }

    /// `GET /wikis?projectIdOrKey=`
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, project_id_or_key: &str) -> Result<Value> {
        self.read("wikis", &Self::project_scope(project_id_or_key))
            .await
    }

    /// `GET /wikis/count?projectIdOrKey=`
    pub async fn count(&self, project_id_or_key: &str) -> Result<Value> {
        self.read("wikis/count", &Self::project_scope(project_id_or_key))
            .await
    }

    /// `GET /wikis/tags?projectIdOrKey=`
    pub async fn tags(&self, project_id_or_key: &str) -> Result<Value> {
        self.read("wikis/tags", &Self::project_scope(project_id_or_key))
            .await
    }

    /// Add a wiki page. `POST /wikis`
    #[tracing::instrument(skip(self, content, form_options))]
    pub async fn create(
        &self,
        project_id: u64,
        name: &str,
        content: &str,
        form_options: Params,
    ) -> Result<Value> {
        let defaults = Params::new()
            .with("projectId", project_id)
            .with("name", name)
            .with("content", content);
        let form = Params::merge(defaults, form_options);

        self.connector
            .post("wikis", &form, &Params::new(), &Params::form_headers())
            .await
    }

    /// `GET /wikis/:wikiId`
    pub async fn find(&self, wiki_id: u64) -> Result<Value> {
        self.read(&format!("wikis/{wiki_id}"), &Params::new()).await
    }

    /// `PATCH /wikis/:wikiId`
    pub async fn update(&self, wiki_id: u64, form_options: Params) -> Result<Value> {
        let form = Params::merge(Params::new(), form_options);
        self.connector
            .patch(
                &format!("wikis/{wiki_id}"),
                &form,
                &Params::new(),
                &Params::form_headers(),
            )
            .await
    }

    /// `DELETE /wikis/:wikiId`
    pub async fn delete(&self, wiki_id: u64) -> Result<Value> {
        self.connector
            .delete(
                &format!("wikis/{wiki_id}"),
                &Params::new(),
                &Params::new(),
                &Params::new(),
            )
            .await
    }

    /// `GET /wikis/:wikiId/attachments`
    pub async fn attachments(&self, wiki_id: u64) -> Result<Value> {
        self.read(&format!("wikis/{wiki_id}/attachments"), &Params::new())
            .await
    }

    /// Link previously uploaded attachments to a page.
    /// `POST /wikis/:wikiId/attachments` (multipart)
    pub async fn attach(&self, wiki_id: u64, attachment_ids: &[u64]) -> Result<Value> {
        let parts = attachment_ids
            .iter()
            .fold(Multipart::new(), |parts, id| parts.text(ATTACHMENT_ID_FIELD, id));

        self.connector
            .post_file(
                &format!("wikis/{wiki_id}/attachments"),
                parts,
                &Params::new(),
                &Params::new(),
            )
            .await
    }

    /// `DELETE /wikis/:wikiId/attachments/:attachmentId`
    pub async fn delete_attachment(&self, wiki_id: u64, attachment_id: u64) -> Result<Value> {
        self.connector
            .delete(
                &format!("wikis/{wiki_id}/attachments/{attachment_id}"),
                &Params::new(),
                &Params::new(),
                &Params::new(),
            )
            .await
    }

    /// `GET /wikis/:wikiId/history`
    pub async fn history(&self, wiki_id: u64, query_options: Params) -> Result<Value> {
        let query = Params::merge(Params::new(), query_options);
        self.read(&format!("wikis/{wiki_id}/history"), &query).await
    }

    /// `GET /wikis/:wikiId/stars`
    pub async fn stars(&self, wiki_id: u64) -> Result<Value> {
        self.read(&format!("wikis/{wiki_id}/stars"), &Params::new())
            .await
    }
}
