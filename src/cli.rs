//! CLI helper functions

use crate::{
    client::{CdsClient, RequestModifier},
    config::CdsConfig,
    sdk::Model,
    storage::DefinitionFile,
};
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Project scoped resources that are imported from a single definition file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportKind {
    Pipeline,
    Application,
    Environment,
    Workflow,
}

impl std::fmt::Display for ImportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pipeline => write!(f, "pipeline"),
            Self::Application => write!(f, "application"),
            Self::Environment => write!(f, "environment"),
            Self::Workflow => write!(f, "workflow"),
        }
    }
}

/// Load a CDS client from an optional config file and the environment
///
/// See [`CdsConfig`] for the supported environment variables.
pub fn load_cds_client(config_path: Option<&Path>) -> Result<CdsClient> {
    let config = CdsConfig::load(config_path).context("Failed to load CDS configuration")?;
    log::debug!("Connecting to {}", config.host.bright_black());
    config.client().context("Failed to create CDS client")
}

/// Import one definition file into a project
///
/// The format is taken from `format` or inferred from the file extension.
pub async fn import_definition(
    client: &CdsClient,
    kind: ImportKind,
    project_key: &str,
    file: impl AsRef<Path>,
    format: Option<&str>,
    force: bool,
) -> Result<Vec<String>> {
    let definition = DefinitionFile::read(file, format)?;
    log::info!(
        "Importing {} {} into {}",
        kind,
        definition.path.display().bright_black(),
        project_key.cyan()
    );

    let content = &definition.content;
    let format = definition.format.as_str();
    let messages = match kind {
        ImportKind::Pipeline => {
            client
                .pipeline_import(project_key, content, format, force)
                .await?
        }
        ImportKind::Application => {
            client
                .application_import(project_key, content, format, force)
                .await?
        }
        ImportKind::Environment => {
            client
                .environment_import(project_key, content, format, force)
                .await?
        }
        ImportKind::Workflow => {
            client
                .workflow_import(project_key, content, format, force)
                .await?
        }
    };

    for message in &messages {
        log::info!("{}", message);
    }
    Ok(messages)
}

/// Import a worker model definition file
pub async fn import_worker_model(
    client: &CdsClient,
    file: impl AsRef<Path>,
    format: Option<&str>,
    force: bool,
) -> Result<Model> {
    let definition = DefinitionFile::read(file, format)?;
    log::info!(
        "Importing worker model {}",
        definition.path.display().bright_black()
    );

    let model = client
        .worker_model_import(&definition.content, &definition.format, force)
        .await?;

    log::info!("✓ Worker model {} imported", model.to_string().cyan());
    Ok(model)
}

/// Push a tar bundle of workflows to a project
///
/// When the server pulls the workflow back, the archive is written to
/// `output_dir` and its path returned alongside the messages.
pub async fn push_workflows(
    client: &CdsClient,
    project_key: &str,
    archive: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
) -> Result<(Vec<String>, Option<PathBuf>)> {
    let archive = archive.as_ref();
    let content = std::fs::read(archive)
        .with_context(|| format!("Failed to read archive: {}", archive.display()))?;

    log::info!(
        "Pushing {} to {}",
        archive.display().bright_black(),
        project_key.cyan()
    );
    let result = client.workflow_push(project_key, &content, &[]).await?;

    for message in &result.messages {
        log::info!("{}", message);
    }

    let written = match result.archive {
        Some(pulled) => {
            let path = pulled.write_to_dir(output_dir)?;
            log::info!(
                "✓ Workflow {} pulled to {}",
                pulled.name().cyan(),
                path.display()
            );
            Some(path)
        }
        None => None,
    };

    Ok((result.messages, written))
}

/// Pull a workflow of a project into `{output_dir}/{name}.tar`
pub async fn pull_workflow(
    client: &CdsClient,
    project_key: &str,
    workflow_name: &str,
    with_permissions: bool,
    output_dir: impl AsRef<Path>,
) -> Result<PathBuf> {
    log::info!(
        "Pulling workflow {} from {}",
        workflow_name.cyan(),
        project_key.cyan()
    );

    let modifiers = match with_permissions {
        true => vec![RequestModifier::query("withPermissions", "true")],
        false => Vec::new(),
    };
    let archive = client
        .workflow_pull(project_key, workflow_name, &modifiers)
        .await?;
    if archive.is_empty() {
        log::warn!("Workflow {} came back as an empty archive", workflow_name.cyan());
    }
    let path = archive.write_to_dir(output_dir)?;

    log::info!("✓ Pulled {} bytes to {}", archive.len(), path.display());
    Ok(path)
}
