//! Resource definitions on disk

use eyre::{Context, Result};
use std::path::{Path, PathBuf};

/// A serialized resource definition read from a file, with its format tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionFile {
    pub path: PathBuf,
    pub content: Vec<u8>,
    /// Format tag, e.g. `json`, `yaml` or `yml`
    pub format: String,
}

impl DefinitionFile {
    /// Read a definition file.
    ///
    /// The format tag is `format` when given, otherwise the lowercased file
    /// extension. The tag is not validated here; the import call does that.
    pub fn read(path: impl AsRef<Path>, format: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let format = match format {
            Some(format) => format.to_string(),
            None => infer_format(path)?,
        };

        let content = std::fs::read(path)
            .with_context(|| format!("Failed to read definition file: {}", path.display()))?;
        log::debug!(
            "Read {} ({} bytes, format {})",
            path.display(),
            content.len(),
            format
        );

        Ok(Self {
            path: path.to_path_buf(),
            content,
            format,
        })
    }
}

/// Format tag from a file extension
pub fn infer_format(path: &Path) -> Result<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .ok_or_else(|| {
            eyre::eyre!(
                "Cannot infer format of {}, use --format",
                path.display()
            )
        })
}
