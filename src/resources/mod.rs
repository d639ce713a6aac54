//! Resource clients.
//!
//! Each client borrows a [`Connector`](crate::Connector), builds the path,
//! merges default parameters with caller overrides (caller wins), picks the
//! verb and hands back the connector's result untouched. Identifiers are
//! interpolated into paths without escaping.

mod issues;
mod projects;
mod wikis;

pub use issues::Issues;
pub use projects::Projects;
pub use wikis::Wikis;
