//! Entry point tying resource clients to one connector.

use crate::connector::{ApiKeyConnector, Connector};
use crate::credential::Credential;
use crate::error::Result;
use crate::resources::{Issues, Projects, Wikis};

/// A Backlog space.
///
/// Owns a connector and hands out resource clients that borrow it.
///
/// ```no_run
/// use backlog_api::{Backlog, Credential, Params};
///
/// # async fn example() -> backlog_api::Result<()> {
/// let backlog = Backlog::with_credential(Credential::new("my-space", "API-KEY"))?;
/// let project = backlog.projects().find("DEMO").await?;
/// let issues = backlog
///     .issues()
///     .list(Params::new().with("projectId[]", &project["id"]))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Backlog<C = ApiKeyConnector> {
    connector: C,
}

impl Backlog<ApiKeyConnector> {
    /// Connect with an API key credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector cannot be built.
    pub fn with_credential(credential: Credential) -> Result<Self> {
        Ok(Self::new(ApiKeyConnector::new(credential)?))
    }

    /// Connect using `BACKLOG_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required variables are missing.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ApiKeyConnector::from_env()?))
    }
}

impl<C: Connector> Backlog<C> {
    /// Wrap an existing connector.
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// The underlying connector, for endpoints without a resource client.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn issues(&self) -> Issues<'_, C> {
        Issues::new(&self.connector)
    }

    pub fn projects(&self) -> Projects<'_, C> {
        Projects::new(&self.connector)
    }

    pub fn wikis(&self) -> Wikis<'_, C> {
        Wikis::new(&self.connector)
    }
}
