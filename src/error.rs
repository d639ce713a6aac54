//! Error type for Backlog API operations.
//!
//! Every failure surfaced by the connector has the same shape: a message,
//! a numeric code and an optional underlying cause. The code is the HTTP
//! status when one is known and `0` otherwise. Interpreting the code
//! (not found, rate limited, validation) is left to the caller.

use thiserror::Error;

type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A failed Backlog API call.
#[derive(Debug, Error)]
#[error("{}", describe(.message, .code))]
pub struct BacklogError {
    message: String,
    code: u16,
    #[source]
    cause: Option<Cause>,
}

impl BacklogError {
    /// Create an error with a message and code and no underlying cause.
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: message.into(),
            code,
            cause: None,
        }
    }

    /// The service answered with an unexpected HTTP status.
    ///
    /// The message is left empty: the status code is the whole signal.
    pub fn status(code: u16) -> Self {
        Self::new(String::new(), code)
    }

    /// The request never produced a usable response.
    pub fn transport(err: reqwest::Error) -> Self {
        let code = err.status().map(|s| s.as_u16()).unwrap_or(0);
        Self {
            message: err.to_string(),
            code,
            cause: Some(Box::new(err)),
        }
    }

    /// The response body was not valid JSON.
    pub fn decode(err: serde_json::Error) -> Self {
        Self {
            message: format!("failed to decode response body: {err}"),
            code: 0,
            cause: Some(Box::new(err)),
        }
    }

    /// Configuration is missing or invalid.
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(message, 0)
    }

    /// Attach an underlying cause.
    #[must_use]
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Human-readable message. Empty for status failures.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code, or `0` when the failure happened below HTTP.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Returns true if the code is an HTTP status.
    pub fn is_status(&self) -> bool {
        (100..=999).contains(&self.code)
    }
}

fn describe(message: &str, code: &u16) -> String {
    match (message.is_empty(), *code) {
        (false, 0) => message.to_string(),
        (false, code) => format!("{message} (code {code})"),
        (true, 0) => "Backlog API request failed".to_string(),
        (true, code) => format!("Backlog API responded with HTTP status {code}"),
    }
}

impl From<reqwest::Error> for BacklogError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err)
    }
}

impl From<serde_json::Error> for BacklogError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err)
    }
}

impl From<url::ParseError> for BacklogError {
    fn from(err: url::ParseError) -> Self {
        Self {
            message: format!("invalid URL: {err}"),
            code: 0,
            cause: Some(Box::new(err)),
        }
    }
}

/// Result type alias for Backlog operations.
pub type Result<T> = core::result::Result<T, BacklogError>;
