use cds_client::cli::{
    ImportKind, import_definition, import_worker_model, load_cds_client, pull_workflow,
    push_workflows,
};
use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::PathBuf;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// cdsctl: import, push and pull CDS resources as code
#[derive(Parser)]
#[command(name = "cdsctl", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source credentials from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// A YAML context file with host and token, overridden by CDS_* variables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check connectivity to the CDS API
    Ping,

    /// Manage pipelines
    Pipeline {
        #[command(subcommand)]
        command: ImportCommand,
    },

    /// Manage applications
    Application {
        #[command(subcommand)]
        command: ImportCommand,
    },

    /// Manage environments
    Environment {
        #[command(subcommand)]
        command: ImportCommand,
    },

    /// Manage workflows
    Workflow {
        #[command(subcommand)]
        command: WorkflowCommand,
    },

    /// Manage worker models
    WorkerModel {
        #[command(subcommand)]
        command: WorkerModelCommand,
    },
}

#[derive(Subcommand)]
enum ImportCommand {
    /// Import a definition file into a project
    Import {
        /// Project key
        project: String,

        /// A JSON or YAML definition file
        file: PathBuf,

        /// Format tag (json, yaml, yml), inferred from the extension by default
        #[arg(short, long)]
        format: Option<String>,

        /// Overwrite existing resources
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum WorkflowCommand {
    /// Import a workflow definition file into a project
    Import {
        /// Project key
        project: String,

        /// A JSON or YAML workflow file
        file: PathBuf,

        /// Format tag (json, yaml, yml), inferred from the extension by default
        #[arg(short, long)]
        format: Option<String>,

        /// Overwrite an existing workflow
        #[arg(long)]
        force: bool,
    },

    /// Push a tar bundle of workflow files to a project
    Push {
        /// Project key
        project: String,

        /// Tar archive containing the workflow, pipelines, applications and environments
        archive: PathBuf,

        /// Directory to write the pulled-back workflow archive to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Pull a workflow and its dependencies as a tar bundle
    Pull {
        /// Project key
        project: String,

        /// Workflow name
        name: String,

        /// Include group permissions in the bundle
        #[arg(long)]
        with_permissions: bool,

        /// Directory to write {name}.tar to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum WorkerModelCommand {
    /// Import a worker model definition file
    Import {
        /// A JSON or YAML worker model file
        file: PathBuf,

        /// Format tag (json, yaml, yml), inferred from the extension by default
        #[arg(short, long)]
        format: Option<String>,

        /// Overwrite an existing worker model
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dotenv = match dotenvy::from_filename(&cli.env) {
        Ok(_) => true,
        Err(e) if e.not_found() => false,
        Err(e) => return Err(e.into()),
    };

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    if dotenv {
        log::debug!("Sourced environment from {}", cli.env.bright_black());
    }

    let client = load_cds_client(cli.config.as_deref())?;

    match cli.command {
        Commands::Ping => {
            let version = client.ping().await?;
            log::info!("✓ Connected to {} (version {})", client, version.cyan());
        }
        Commands::Pipeline { command } => run_import(&client, ImportKind::Pipeline, command).await?,
        Commands::Application { command } => {
            run_import(&client, ImportKind::Application, command).await?
        }
        Commands::Environment { command } => {
            run_import(&client, ImportKind::Environment, command).await?
        }
        Commands::Workflow { command } => match command {
            WorkflowCommand::Import {
                project,
                file,
                format,
                force,
            } => {
                import_definition(
                    &client,
                    ImportKind::Workflow,
                    &project,
                    file,
                    format.as_deref(),
                    force,
                )
                .await?;
            }
            WorkflowCommand::Push {
                project,
                archive,
                output_dir,
            } => {
                push_workflows(&client, &project, archive, output_dir).await?;
            }
            WorkflowCommand::Pull {
                project,
                name,
                with_permissions,
                output_dir,
            } => {
                pull_workflow(&client, &project, &name, with_permissions, output_dir).await?;
            }
        },
        Commands::WorkerModel { command } => match command {
            WorkerModelCommand::Import {
                file,
                format,
                force,
            } => {
                import_worker_model(&client, file, format.as_deref(), force).await?;
            }
        },
    }

    Ok(())
}

async fn run_import(
    client: &cds_client::CdsClient,
    kind: ImportKind,
    command: ImportCommand,
) -> Result<()> {
    let ImportCommand::Import {
        project,
        file,
        format,
        force,
    } = command;
    import_definition(client, kind, &project, file, format.as_deref(), force).await?;
    Ok(())
}
