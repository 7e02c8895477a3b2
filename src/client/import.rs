//! Import operations
//!
//! Each operation posts one serialized definition to a project scoped (or,
//! for worker models, global) import endpoint.
//!
//! Message-list endpoints tolerate a body that is not a JSON list of strings
//! and return no messages. Worker model import requires a decodable model.

use super::{CdsClient, ImportFormat, RequestModifier, path_segment};
use crate::sdk::Model;
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use reqwest::Method;

/// Build the content-type modifier for a header-dispatched import.
fn format_modifier(format: &str) -> Result<RequestModifier> {
    let format: ImportFormat = format.parse()?;
    Ok(RequestModifier::header("Content-Type", format.content_type()))
}

fn with_force(path: String, force: bool) -> String {
    match force {
        true => format!("{}?force=true", path),
        false => path,
    }
}

/// Decode a JSON list of messages, falling back to an empty list.
fn messages_or_empty(body: &[u8]) -> Vec<String> {
    match serde_json::from_slice(body) {
        Ok(messages) => messages,
        Err(e) => {
            log::warn!("Ignoring undecodable import response: {}", e);
            Vec::new()
        }
    }
}

impl CdsClient {
    /// Import a pipeline definition into a project.
    ///
    /// The format tag is sent verbatim as the `format` query parameter and is
    /// not validated client side. With `force`, `forceUpdate=true` is added.
    pub async fn pipeline_import(
        &self,
        project_key: &str,
        content: &[u8],
        format: &str,
        force: bool,
    ) -> Result<Vec<String>> {
        let mut path = format!(
            "/project/{}/import/pipeline?format={}",
            path_segment(project_key),
            format
        );
        if force {
            path.push_str("&forceUpdate=true");
        }

        log::debug!("Importing pipeline into {}", project_key.cyan());
        let response = self
            .request(Method::POST, &path, Some(content), &[])
            .await?;
        Ok(messages_or_empty(&response.body))
    }

    /// Import an application definition into a project.
    pub async fn application_import(
        &self,
        project_key: &str,
        content: &[u8],
        format: &str,
        force: bool,
    ) -> Result<Vec<String>> {
        let path = format!("/project/{}/import/application", path_segment(project_key));
        self.import_messages(project_key, path, content, format, force)
            .await
    }

    /// Import an environment definition into a project.
    pub async fn environment_import(
        &self,
        project_key: &str,
        content: &[u8],
        format: &str,
        force: bool,
    ) -> Result<Vec<String>> {
        let path = format!("/project/{}/import/environment", path_segment(project_key));
        self.import_messages(project_key, path, content, format, force)
            .await
    }

    /// Import a workflow definition into a project.
    pub async fn workflow_import(
        &self,
        project_key: &str,
        content: &[u8],
        format: &str,
        force: bool,
    ) -> Result<Vec<String>> {
        let path = format!("/project/{}/import/workflows", path_segment(project_key));
        self.import_messages(project_key, path, content, format, force)
            .await
    }

    /// Import a worker model definition.
    ///
    /// # Errors
    /// Unlike the project imports, a status of 400 or above and a body that
    /// does not decode as a [`Model`] are both errors.
    pub async fn worker_model_import(
        &self,
        content: &[u8],
        format: &str,
        force: bool,
    ) -> Result<Model> {
        let modifier = format_modifier(format)?;
        let path = with_force("/worker/model/import".to_string(), force);

        let response = self
            .request(Method::POST, &path, Some(content), &[modifier])
            .await?
            .error_for_status()?;

        let model: Model = serde_json::from_slice(&response.body)
            .with_context(|| "Failed to decode imported worker model")?;
        log::debug!("Imported worker model {}", model.name.cyan());
        Ok(model)
    }

    async fn import_messages(
        &self,
        project_key: &str,
        path: String,
        content: &[u8],
        format: &str,
        force: bool,
    ) -> Result<Vec<String>> {
        let modifier = format_modifier(format)?;
        let path = with_force(path, force);

        log::debug!("Importing {} into {}", path.bright_black(), project_key.cyan());
        let response = self
            .request(Method::POST, &path, Some(content), &[modifier])
            .await?;
        Ok(messages_or_empty(&response.body))
    }
}
