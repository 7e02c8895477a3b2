//! Integration tests for definition imports

use cds_client::cli::{ImportKind, import_definition, import_worker_model};
use cds_client::{Auth, CdsClient, ClientError};
use eyre::Result;
use mockito::{Matcher, Server};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use url::Url;

fn client_for(server: &Server) -> Result<CdsClient> {
    let url = Url::parse(&server.url())?;
    CdsClient::try_new(url, Auth::Token("integration".to_string()))
}

fn write_definition(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, content)?;
    Ok(path)
}

#[tokio::test]
async fn test_application_import_infers_yaml_from_extension() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let file = write_definition(
        temp_dir.path(),
        "my-app.yml",
        "version: v1.0\nname: my-app\nvariables:\n  env: prod\n",
    )?;

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/project/PROJ/import/application")
        .match_header("content-type", "application/x-yaml")
        .match_header("authorization", "Bearer integration")
        .match_body(Matcher::Regex("name: my-app".to_string()))
        .with_status(200)
        .with_body(r#"["Application my-app successfully created"]"#)
        .create_async()
        .await;

    let client = client_for(&server)?;
    let messages =
        import_definition(&client, ImportKind::Application, "PROJ", &file, None, false).await?;

    assert_eq!(messages, vec!["Application my-app successfully created"]);
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_environment_import_with_format_override_and_force() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let file = write_definition(temp_dir.path(), "prod.env", r#"{"name":"prod"}"#)?;

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/project/PROJ/import/environment")
        .match_query(Matcher::UrlEncoded("force".into(), "true".into()))
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_body(r#"["Environment prod successfully updated"]"#)
        .create_async()
        .await;

    let client = client_for(&server)?;
    let messages = import_definition(
        &client,
        ImportKind::Environment,
        "PROJ",
        &file,
        Some("json"),
        true,
    )
    .await?;

    assert_eq!(messages.len(), 1);
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_pipeline_import_passes_extension_as_query() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let file = write_definition(temp_dir.path(), "build.yml", "version: v1.0\nname: build\n")?;

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/project/PROJ/import/pipeline")
        .match_query(Matcher::UrlEncoded("format".into(), "yml".into()))
        .with_status(200)
        .with_body(r#"["Pipeline build successfully created","Stage Compile created"]"#)
        .create_async()
        .await;

    let client = client_for(&server)?;
    let messages =
        import_definition(&client, ImportKind::Pipeline, "PROJ", &file, None, false).await?;

    assert_eq!(
        messages,
        vec!["Pipeline build successfully created", "Stage Compile created"]
    );
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_workflow_import_from_unknown_extension_makes_no_request() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let file = write_definition(temp_dir.path(), "workflow.xml", "<workflow/>")?;

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server)?;
    let err = import_definition(&client, ImportKind::Workflow, "PROJ", &file, None, false)
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<ClientError>(),
        Some(&ClientError::UnsupportedFormat("xml".to_string()))
    );
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_workflow_import_error_body_is_tolerated() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let file = write_definition(temp_dir.path(), "wf.yaml", "name: wf\n")?;

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/project/PROJ/import/workflows")
        .with_status(500)
        .with_body(r#"{"message":"internal server error"}"#)
        .create_async()
        .await;

    let client = client_for(&server)?;
    let messages =
        import_definition(&client, ImportKind::Workflow, "PROJ", &file, None, false).await?;

    assert!(messages.is_empty());
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_worker_model_import_from_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let file = write_definition(
        temp_dir.path(),
        "model.yml",
        "name: rust-builder\ngroup: shared.infra\nimage: rust:1.89\n",
    )?;

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/worker/model/import")
        .match_header("content-type", "application/x-yaml")
        .with_status(200)
        .with_body(
            r#"{"id":12,"name":"rust-builder","type":"docker",
                "group":{"id":1,"name":"shared.infra"},
                "model_docker":{"image":"rust:1.89"}}"#,
        )
        .create_async()
        .await;

    let client = client_for(&server)?;
    let model = import_worker_model(&client, &file, None, false).await?;

    assert_eq!(model.path(), "shared.infra/rust-builder");
    assert!(model.is_docker());
    mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_missing_definition_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = Server::new_async().await;
    let client = client_for(&server)?;

    let err = import_definition(
        &client,
        ImportKind::Application,
        "PROJ",
        temp_dir.path().join("missing.yml"),
        None,
        false,
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("Failed to read definition file"));
    Ok(())
}

#[tokio::test]
async fn test_application_import_transport_failure() -> Result<()> {
    // Nothing listens on port 9 of localhost
    let client = CdsClient::try_new(Url::parse("http://127.0.0.1:9")?, Auth::None)?;
    let err = client
        .application_import("PROJ", b"name: my-app", "yml", false)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Failed to send request"));
    assert!(err.downcast_ref::<ClientError>().is_none());
    Ok(())
}
