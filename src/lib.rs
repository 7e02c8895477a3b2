//! CDS client
//!
//! Async client for importing resources as code into CDS and for pushing and
//! pulling workflow bundles.

pub mod cli;
pub mod client;
pub mod config;
pub mod sdk;
pub mod storage;

// Re-exports for convenience
pub use client::{
    ApiResponse, Auth, CdsClient, ClientError, ImportFormat, RequestModifier, WorkflowArchive,
    WorkflowPushResult,
};
pub use config::CdsConfig;
pub use sdk::Model;
pub use storage::DefinitionFile;
