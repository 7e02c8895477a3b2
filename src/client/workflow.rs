//! Workflow push and pull
//!
//! A push uploads a tar bundle of workflow definitions. When the server names
//! the resulting workflow in the `X-Api-Workflow-Name` response header, the
//! workflow is pulled straight back so the caller gets the stored version.

use super::{CdsClient, RequestModifier, path_segment};
use crate::sdk::RESPONSE_WORKFLOW_NAME_HEADER;
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use reqwest::Method;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// A workflow bundle as returned by the pull endpoint.
///
/// The bytes are a tar archive and are kept opaque.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkflowArchive {
    name: String,
    bytes: Vec<u8>,
}

impl WorkflowArchive {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Name of the workflow the archive was pulled for
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the archive to `{dir}/{name}.tar`, creating `dir` if needed.
    ///
    /// # Errors
    /// The name must be a single file name component, so the archive always
    /// lands inside `dir`.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let file_name = format!("{}.tar", self.name);
        let is_plain = !self.name.is_empty()
            && !self.name.contains(['/', '\\'])
            && Path::new(&file_name).file_name() == Some(OsStr::new(&file_name));
        if !is_plain {
            eyre::bail!("Refusing to write archive for workflow name {:?}", self.name);
        }

        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        let path = dir.join(file_name);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("Failed to write archive: {}", path.display()))?;
        Ok(path)
    }
}

/// Outcome of a workflow push
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkflowPushResult {
    /// Status messages reported by the server, in order
    pub messages: Vec<String>,
    /// The pushed workflow pulled back, when the server named it
    pub archive: Option<WorkflowArchive>,
}

impl CdsClient {
    /// Push a tar bundle of workflow definitions to a project.
    ///
    /// `modifiers` are applied to the push and, if one happens, to the
    /// follow-up pull. The request is always sent as `application/tar`.
    ///
    /// # Errors
    /// A status of 400 or above, a body that is not a JSON list of messages,
    /// or a failed follow-up pull.
    pub async fn workflow_push(
        &self,
        project_key: &str,
        tar_content: &[u8],
        modifiers: &[RequestModifier],
    ) -> Result<WorkflowPushResult> {
        let path = format!("/project/{}/push/workflows", path_segment(project_key));

        let mut modifiers = modifiers.to_vec();
        modifiers.push(RequestModifier::header("Content-Type", "application/tar"));

        log::debug!(
            "Pushing {} byte workflow bundle to {}",
            tar_content.len(),
            project_key.cyan()
        );
        let response = self
            .request(Method::POST, &path, Some(tar_content), &modifiers)
            .await?
            .error_for_status()?;

        let messages: Vec<String> = serde_json::from_slice(&response.body)
            .with_context(|| "Failed to decode workflow push response")?;

        let archive = match response.header(RESPONSE_WORKFLOW_NAME_HEADER) {
            Some(name) => {
                log::debug!("Server reported workflow {}, pulling it", name.cyan());
                Some(self.workflow_pull(project_key, name, &modifiers).await?)
            }
            None => None,
        };

        Ok(WorkflowPushResult { messages, archive })
    }

    /// Pull a workflow of a project as a tar bundle.
    pub async fn workflow_pull(
        &self,
        project_key: &str,
        workflow_name: &str,
        modifiers: &[RequestModifier],
    ) -> Result<WorkflowArchive> {
        let path = format!(
            "/project/{}/pull/workflows/{}",
            path_segment(project_key),
            path_segment(workflow_name)
        );

        let response = self
            .request(Method::GET, &path, None, modifiers)
            .await?
            .error_for_status()?;

        log::debug!(
            "Pulled {} ({} bytes)",
            workflow_name.cyan(),
            response.body.len()
        );
        Ok(WorkflowArchive::new(workflow_name, response.body))
    }
}
