//! Configuration file loading.
//!
//! The merge engine never touches storage itself; it goes through the
//! [`ConfigLoader`] trait. [`FileConfigLoader`] is the file-system backed
//! implementation.
//!
//! # Lookup order for the user configuration
//!
//! 1. An explicit path from the request (must exist)
//! 2. The manifest's `build` field
//! 3. `electron-builder.yml`, `.yaml`, `.json`, `.toml` in the project directory
//!
//! # Parent configuration specs
//!
//! * `file:<path>` - a file relative to the project directory, nothing else
//! * `<path>` - a file relative to the project directory, falling back to an
//!   installed package under `node_modules/`

use crate::configuration::Configuration;
use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::request::ConfigRequest;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;

/// Extensions tried, in order, when searching for a configuration file.
pub const CONFIG_FILE_EXTENSIONS: [&str; 4] = ["yml", "yaml", "json", "toml"];

/// Prefix restricting a parent spec to a file path.
pub const FILE_SPEC_PREFIX: &str = "file:";

/// Directory holding installed packages.
const PACKAGES_DIR: &str = "node_modules";

/// A parsed configuration and the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfiguration {
    pub result: Configuration,

    /// `None` when the configuration came from the manifest's `build` field.
    pub config_file: Option<PathBuf>,
}

/// Interface for reading configurations from storage.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// Loads the user's configuration.
    ///
    /// Returns `Ok(None)` when no configuration exists and no explicit path
    /// was given.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError::FileNotFound` - the explicit path does not exist
    /// * `ConfigurationError::ParseError` - the file cannot be parsed
    async fn load(
        &self,
        request: &ConfigRequest,
        explicit_path: Option<&Path>,
    ) -> ConfigurationResult<Option<LoadedConfiguration>>;

    /// Loads the parent configuration named by an `extends` spec.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError::ParentConfigNotFound` - the spec resolves to nothing
    /// * `ConfigurationError::ParseError` - the file cannot be parsed
    async fn load_parent(
        &self,
        request: &ConfigRequest,
        spec: &str,
    ) -> ConfigurationResult<LoadedConfiguration>;
}

impl fmt::Debug for dyn ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn ConfigLoader")
    }
}

/// File-system backed [`ConfigLoader`].
#[derive(Debug, Clone, Default)]
pub struct FileConfigLoader {}

impl FileConfigLoader {
    pub fn new() -> Self {
        Self {}
    }

    async fn find_in_directory(
        &self,
        dir: &Path,
        filename: &str,
    ) -> ConfigurationResult<Option<LoadedConfiguration>> {
        for extension in CONFIG_FILE_EXTENSIONS {
            let candidate = dir.join(format!("{}.{}", filename, extension));
            if let Some(loaded) = read_config_file(&candidate).await? {
                return Ok(Some(loaded));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl ConfigLoader for FileConfigLoader {
    async fn load(
        &self,
        request: &ConfigRequest,
        explicit_path: Option<&Path>,
    ) -> ConfigurationResult<Option<LoadedConfiguration>> {
        if let Some(path) = explicit_path {
            let path = request.project_dir().join(path);
            debug!("Loading configuration from explicit path {}", path.display());
            return match read_config_file(&path).await? {
                Some(loaded) => Ok(Some(loaded)),
                None => Err(ConfigurationError::FileNotFound {
                    path: path.display().to_string(),
                }),
            };
        }

        if let Some(manifest) = request.manifest().get().await? {
            match manifest.get(request.package_key()) {
                Some(Value::Null) | None => {}
                Some(inline) => {
                    debug!(
                        "Using '{}' field of {}",
                        request.package_key(),
                        request.manifest().path().display()
                    );
                    let result = Configuration::from_value(inline.clone()).map_err(|_| {
                        ConfigurationError::InvalidConfiguration {
                            field: request.package_key().to_string(),
                            reason: "manifest field must be an object".to_string(),
                        }
                    })?;
                    return Ok(Some(LoadedConfiguration {
                        result,
                        config_file: None,
                    }));
                }
            }
        }

        self.find_in_directory(request.project_dir(), request.config_filename())
            .await
    }

    async fn load_parent(
        &self,
        request: &ConfigRequest,
        spec: &str,
    ) -> ConfigurationResult<LoadedConfiguration> {
        let (path_spec, file_only) = match spec.strip_prefix(FILE_SPEC_PREFIX) {
            Some(path) => (path, true),
            None => (spec, false),
        };

        let local = request.project_dir().join(path_spec);
        if let Some(loaded) = read_config_file(&local).await? {
            return Ok(loaded);
        }

        if !file_only {
            let installed = request.project_dir().join(PACKAGES_DIR).join(path_spec);
            debug!(
                "Parent config not found at {}, trying {}",
                local.display(),
                installed.display()
            );
            if is_directory(&installed).await {
                if let Some(loaded) = self
                    .find_in_directory(&installed, request.config_filename())
                    .await?
                {
                    return Ok(loaded);
                }
            } else if let Some(loaded) = read_config_file(&installed).await? {
                return Ok(loaded);
            }
        }

        Err(ConfigurationError::ParentConfigNotFound {
            spec: spec.to_string(),
        })
    }
}

async fn is_directory(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|metadata| metadata.is_dir())
        .unwrap_or(false)
}

/// Reads and parses one configuration file.
///
/// Returns `Ok(None)` when the file does not exist. The format follows the
/// extension: `.json` and `.toml` are parsed as such, anything else as YAML.
pub async fn read_config_file(path: &Path) -> ConfigurationResult<Option<LoadedConfiguration>> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) if is_directory(path).await => {
            debug!("Skipping directory {}: {}", path.display(), e);
            return Ok(None);
        }
        Err(e) => {
            return Err(ConfigurationError::FileAccessError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        }
    };

    let value = parse_config_text(path, &text)?;
    let result = Configuration::from_value(value).map_err(|e| match e {
        ConfigurationError::InvalidConfiguration { reason, .. } => ConfigurationError::ParseError {
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })?;

    debug!("Loaded configuration file {}", path.display());
    Ok(Some(LoadedConfiguration {
        result,
        config_file: Some(path.to_path_buf()),
    }))
}

fn parse_config_text(path: &Path, text: &str) -> ConfigurationResult<Value> {
    let parse_error = |reason: String| ConfigurationError::ParseError {
        path: path.display().to_string(),
        reason,
    };

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(text).map_err(|e| parse_error(e.to_string())),
        Some("toml") => toml::from_str(text).map_err(|e| parse_error(e.to_string())),
        _ => {
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_yaml::from_str(text).map_err(|e| parse_error(e.to_string()))
        }
    }
}
