//! Backlog API client library.
//!
//! Typed access to the Backlog project-management REST API (`/api/v2`).
//! Every call goes through a [`Connector`], which injects the API key,
//! dispatches the request and normalizes the outcome into either a decoded
//! JSON value, a [`RawResponse`] for file downloads, or a [`BacklogError`].
//! Response payloads are not modeled per endpoint; they come back as
//! [`serde_json::Value`] with object keys in the order the service sent them.
//!
//! # Quick Start
//!
//! ```no_run
//! use backlog_api::{Backlog, Params};
//!
//! #[tokio::main]
//! async fn main() -> backlog_api::Result<()> {
//!     // Reads BACKLOG_SPACE_ID, BACKLOG_API_KEY and optionally BACKLOG_DOMAIN
//!     let backlog = Backlog::from_env()?;
//!
//!     let projects = backlog.projects().list(Params::new()).await?;
//!     println!("{} projects", projects.as_array().map_or(0, Vec::len));
//!
//!     let issue = backlog.issues().find("DEMO-1").await?;
//!     println!("{}", issue["summary"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Status handling
//!
//! `get` and `get_file` fail with the HTTP status as the error code when the
//! service answers anything but 200. `post`, `put`, `patch`, `delete` and
//! `post_file` do not check the status and decode the body as returned, so
//! an error document from the service arrives as an `Ok` value.
//!
//! # Configuration
//!
//! - `BACKLOG_SPACE_ID` (required) - the space, as in `{space}.backlog.jp`
//! - `BACKLOG_API_KEY` (required) - personal API key
//! - `BACKLOG_DOMAIN` (optional) - domain suffix, `jp` by default

mod backlog;
mod connector;
mod credential;
mod error;
mod params;
mod resources;
mod response;

#[cfg(feature = "test-server")]
pub mod mock_server;

pub use backlog::Backlog;
pub use connector::{ApiKeyConnector, Connector, API_KEY_PARAM};
pub use credential::{Credential, DEFAULT_DOMAIN};
pub use error::{BacklogError, Result};
pub use params::{Headers, Multipart, Params, Part, PartBody, FORM_URLENCODED};
pub use resources::{Issues, Projects, Wikis};
pub use response::RawResponse;

// Decoded bodies are plain JSON values.
pub use serde_json::Value;
