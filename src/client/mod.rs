//! CDS API client and authentication.
//!
//! This module provides the [`CdsClient`] request primitive and the import,
//! push and pull operations built on it, along with authentication
//! ([`Auth`]), per-request [`RequestModifier`]s and [`ImportFormat`] dispatch.

mod auth;
mod cds;
mod error;
mod format;
mod import;
mod modifier;
mod workflow;

pub use auth::Auth;
pub use cds::{ApiResponse, CdsClient, path_segment};
pub use error::ClientError;
pub use format::ImportFormat;
pub use modifier::RequestModifier;
pub use workflow::{WorkflowArchive, WorkflowPushResult};
