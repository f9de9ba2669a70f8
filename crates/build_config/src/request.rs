//! Configuration resolution request.
//!
//! A [`ConfigRequest`] carries everything one resolution needs to know about
//! the project: where it lives, an optional explicit configuration file,
//! programmatic options, and the memoized project manifest.
//!
//! # Examples
//!
//! ```
//! use build_config::{ConfigRequest, Configuration};
//! use serde_json::json;
//!
//! // Only the project directory is required
//! let request = ConfigRequest::new("/work/my-app");
//!
//! // Optional fields use the builder pattern
//! let options = Configuration::from_value(json!({ "publish": { "provider": "github" } }))?;
//! let request = ConfigRequest::new("/work/my-app")
//!     .with_config_path("config/builder.yml")
//!     .with_options(options);
//!
//! assert_eq!(request.config_filename(), "electron-builder");
//! # Ok::<(), build_config::ConfigurationError>(())
//! ```

use crate::configuration::Configuration;
use crate::manifest::ProjectManifest;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;

/// Stem of the configuration files searched in the project directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "electron-builder";

/// Manifest field that may hold the configuration inline.
pub const DEFAULT_PACKAGE_KEY: &str = "build";

#[derive(Debug)]
pub struct ConfigRequest {
    project_dir: PathBuf,

    config_path: Option<PathBuf>,

    options: Option<Configuration>,

    config_filename: String,

    package_key: String,

    manifest: ProjectManifest,
}

impl ConfigRequest {
    /// Creates a request for the project rooted at `project_dir`.
    ///
    /// The manifest is read from `<project_dir>/package.json` when first
    /// needed.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let manifest = ProjectManifest::for_project(&project_dir);
        Self {
            project_dir,
            config_path: None,
            options: None,
            config_filename: DEFAULT_CONFIG_FILENAME.to_string(),
            package_key: DEFAULT_PACKAGE_KEY.to_string(),
            manifest,
        }
    }

    /// Reads the configuration from this file (relative to the project
    /// directory) instead of searching for one.
    pub fn with_config_path(mut self, config_path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(config_path.into());
        self
    }

    /// Programmatic options, layered over the loaded configuration.
    pub fn with_options(mut self, options: Configuration) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_config_filename(mut self, config_filename: impl Into<String>) -> Self {
        self.config_filename = config_filename.into();
        self
    }

    pub fn with_package_key(mut self, package_key: impl Into<String>) -> Self {
        self.package_key = package_key.into();
        self
    }

    /// Uses already-parsed manifest content instead of reading the file.
    pub fn with_manifest(mut self, manifest: Option<Value>) -> Self {
        let path = self.manifest.path().to_path_buf();
        self.manifest = ProjectManifest::preloaded(path, manifest);
        self
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    pub fn options(&self) -> Option<&Configuration> {
        self.options.as_ref()
    }

    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    pub fn package_key(&self) -> &str {
        &self.package_key
    }

    pub fn manifest(&self) -> &ProjectManifest {
        &self.manifest
    }
}
