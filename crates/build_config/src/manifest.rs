//! Project manifest (`package.json`) access.
//!
//! The manifest is consulted by several steps of a resolution (the `build`
//! field, dependency-based preset detection). [`ProjectManifest`] reads it at
//! most once; concurrent first requests wait for the same read.

use crate::errors::{ConfigurationError, ConfigurationResult};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::OnceCell;
use tracing::debug;

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;

/// File name of the project manifest.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Reads and parses a JSON manifest.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// * `ConfigurationError::FileAccessError` - the file exists but cannot be read
/// * `ConfigurationError::ParseError` - the file is not valid JSON
pub async fn read_manifest(path: &Path) -> ConfigurationResult<Option<Value>> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No manifest at {}", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(ConfigurationError::FileAccessError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        }
    };

    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| ConfigurationError::ParseError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

/// Lazily loaded, memoized project manifest.
#[derive(Debug)]
pub struct ProjectManifest {
    path: PathBuf,
    content: OnceCell<Option<Value>>,
}

impl ProjectManifest {
    /// A manifest read from `<project_dir>/package.json` on first access.
    pub fn for_project(project_dir: &Path) -> Self {
        Self {
            path: project_dir.join(MANIFEST_FILE_NAME),
            content: OnceCell::new(),
        }
    }

    /// A manifest whose content is already known. No file is read.
    pub fn preloaded(path: impl Into<PathBuf>, content: Option<Value>) -> Self {
        Self {
            path: path.into(),
            content: OnceCell::new_with(Some(content)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the manifest content, reading it on first call.
    ///
    /// A failed read is not cached; the next call tries again.
    pub async fn get(&self) -> ConfigurationResult<Option<&Value>> {
        let content = self
            .content
            .get_or_try_init(|| read_manifest(&self.path))
            .await?;
        Ok(content.as_ref())
    }

    /// Whether `name` appears in the manifest's `dependencies`.
    pub async fn has_dependency(&self, name: &str) -> ConfigurationResult<bool> {
        Ok(self
            .get()
            .await?
            .is_some_and(|manifest| section_contains(manifest, "dependencies", name)))
    }

    /// Whether `name` appears in the manifest's `devDependencies`.
    pub async fn has_dev_dependency(&self, name: &str) -> ConfigurationResult<bool> {
        Ok(self
            .get()
            .await?
            .is_some_and(|manifest| section_contains(manifest, "devDependencies", name)))
    }
}

fn section_contains(manifest: &Value, section: &str, name: &str) -> bool {
    manifest
        .get(section)
        .and_then(Value::as_object)
        .is_some_and(|dependencies| dependencies.contains_key(name))
}
