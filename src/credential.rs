//! Space credentials and base URL construction.

use std::env;

use url::Url;

use crate::error::{BacklogError, Result};

/// Domain suffix used when none is configured.
pub const DEFAULT_DOMAIN: &str = "jp";

/// Credentials for one Backlog space.
///
/// Identifies the space, the API key used to authenticate, and the regional
/// domain suffix (`jp` for `backlog.jp`, `com` for `backlog.com`).
///
/// # Example
///
/// ```
/// use backlog_api::Credential;
///
/// let credential = Credential::new("my-space", "API-KEY").with_domain("com");
/// assert_eq!(
///     credential.base_url().unwrap().as_str(),
///     "https://my-space.backlog.com/api/v2/"
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    space_id: String,
    api_key: String,
    domain: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("space_id", &self.space_id)
            .field("domain", &self.domain)
            .finish_non_exhaustive()
    }
}

impl Credential {
    /// Create credentials for a space on the default `jp` domain.
    pub fn new(space_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            api_key: api_key.into(),
            domain: DEFAULT_DOMAIN.to_string(),
        }
    }

    /// Override the domain suffix.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Load credentials from environment variables.
    ///
    /// Reads `BACKLOG_SPACE_ID` and `BACKLOG_API_KEY` (required) and
    /// `BACKLOG_DOMAIN` (optional, defaults to `jp`).
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is not set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| BacklogError::config(format!("{name} environment variable not set")))
        };

        let space_id = required("BACKLOG_SPACE_ID")?;
        let api_key = required("BACKLOG_API_KEY")?;
        let mut credential = Self::new(space_id, api_key);
        if let Some(domain) = lookup("BACKLOG_DOMAIN").filter(|d| !d.is_empty()) {
            credential = credential.with_domain(domain);
        }
        Ok(credential)
    }

    /// The space identifier.
    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    /// The domain suffix.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The API root for this space, `https://{space}.backlog.{domain}/api/v2/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the space or domain do not form a valid host.
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&format!(
            "https://{}.backlog.{}/api/v2/",
            self.space_id, self.domain
        ))?;
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_domain_base_url() {
        let credential = Credential::new("test", "KEY");
        assert_eq!(credential.domain(), "jp");
        assert_eq!(
            credential.base_url().unwrap().as_str(),
            "https://test.backlog.jp/api/v2/"
        );
    }

    #[test]
    fn test_domain_override_changes_host() {
        let credential = Credential::new("test", "KEY").with_domain("com");
        assert_eq!(
            credential.base_url().unwrap().host_str(),
            Some("test.backlog.com")
        );
    }

    #[test]
    fn test_debug_hides_api_key() {
        let credential = Credential::new("test", "SECRET-KEY");
        let debug = format!("{:?}", credential);
        assert!(debug.contains("test"));
        assert!(!debug.contains("SECRET-KEY"));
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let credential = Credential::from_lookup(lookup_from(&[
            ("BACKLOG_SPACE_ID", "acme"),
            ("BACKLOG_API_KEY", "KEY"),
            ("BACKLOG_DOMAIN", "com"),
        ]))
        .unwrap();

        assert_eq!(credential.space_id(), "acme");
        assert_eq!(credential.api_key(), "KEY");
        assert_eq!(credential.domain(), "com");
    }

    #[test]
    fn test_from_lookup_defaults_domain() {
        let credential = Credential::from_lookup(lookup_from(&[
            ("BACKLOG_SPACE_ID", "acme"),
            ("BACKLOG_API_KEY", "KEY"),
        ]))
        .unwrap();

        assert_eq!(credential.domain(), DEFAULT_DOMAIN);
    }

    #[test]
    fn test_from_lookup_requires_api_key() {
        let err = Credential::from_lookup(lookup_from(&[("BACKLOG_SPACE_ID", "acme")]))
            .unwrap_err();
        assert_eq!(err.code(), 0);
        assert!(err.message().contains("BACKLOG_API_KEY"));
    }
}
