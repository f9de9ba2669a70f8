//! Inheritance (`extends`) resolution.
//!
//! The `extends` key has three states:
//!
//! | Value           | State                                |
//! |-----------------|--------------------------------------|
//! | absent          | [`ExtendsSpec::Unset`], auto-detect  |
//! | `null`          | [`ExtendsSpec::Disabled`]            |
//! | `"<spec>"`      | [`ExtendsSpec::Named`]               |
//!
//! Auto-detection only runs for `Unset`, so an explicit `null` always wins
//! over what the project dependencies suggest.

use crate::configuration::{value_kind, Configuration, EXTENDS_KEY};
use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::loader::{ConfigLoader, FILE_SPEC_PREFIX};
use crate::manifest::ProjectManifest;
use crate::presets::{PresetRegistry, REACT_CRA_PRESET};
use crate::request::ConfigRequest;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[cfg(test)]
#[path = "extends_tests.rs"]
mod tests;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtendsSpec {
    Unset,
    Disabled,
    Named(String),
}

impl ExtendsSpec {
    /// Reads the `extends` key of `config`.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError::InvalidConfiguration` - `extends` is neither a
    ///   string nor `null`
    pub fn from_configuration(config: &Configuration) -> ConfigurationResult<Self> {
        match config.get(EXTENDS_KEY) {
            None => Ok(ExtendsSpec::Unset),
            Some(Value::Null) => Ok(ExtendsSpec::Disabled),
            Some(Value::String(spec)) => Ok(ExtendsSpec::Named(spec.clone())),
            Some(other) => Err(ConfigurationError::InvalidConfiguration {
                field: EXTENDS_KEY.to_string(),
                reason: format!("expected a string or null, found {}", value_kind(other)),
            }),
        }
    }
}

/// Chooses a parent from the project's dependencies.
///
/// `react-scripts` (runtime or development dependency) selects the
/// `react-cra` preset; an `electron-webpack` development dependency selects
/// the configuration file shipped with it.
pub async fn detect_preset(
    manifest: &ProjectManifest,
    project_dir: &Path,
) -> ConfigurationResult<Option<String>> {
    if manifest.has_dependency("react-scripts").await?
        || manifest.has_dev_dependency("react-scripts").await?
    {
        return Ok(Some(REACT_CRA_PRESET.to_string()));
    }

    if manifest.has_dev_dependency("electron-webpack").await? {
        let parent = project_dir
            .join("node_modules")
            .join("electron-webpack")
            .join("electron-builder.yml");
        return Ok(Some(format!("{}{}", FILE_SPEC_PREFIX, parent.display())));
    }

    Ok(None)
}

/// Outcome of [`ExtendsResolver::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedExtends {
    /// The child configuration, with a detected spec written to `extends`.
    pub child: Configuration,

    pub parent: Option<Configuration>,
}

/// Resolves the parent configuration of a child configuration.
#[derive(Debug, Clone)]
pub struct ExtendsResolver {
    loader: Arc<dyn ConfigLoader>,
    presets: PresetRegistry,
}

impl ExtendsResolver {
    /// Creates a resolver with the built-in presets.
    pub fn new(loader: Arc<dyn ConfigLoader>) -> Self {
        Self::with_presets(loader, PresetRegistry::default())
    }

    pub fn with_presets(loader: Arc<dyn ConfigLoader>, presets: PresetRegistry) -> Self {
        Self { loader, presets }
    }

    pub fn presets(&self) -> &PresetRegistry {
        &self.presets
    }

    /// Determines and loads the parent of `child`.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError::InvalidConfiguration` - malformed `extends`
    /// * `ConfigurationError::PresetFailed` - a preset generator failed
    /// * `ConfigurationError::ParentConfigNotFound` - the parent cannot be found
    pub async fn resolve(
        &self,
        request: &ConfigRequest,
        mut child: Configuration,
    ) -> ConfigurationResult<ResolvedExtends> {
        let spec = match ExtendsSpec::from_configuration(&child)? {
            ExtendsSpec::Disabled => {
                debug!("Inheritance disabled by explicit null extends");
                None
            }
            ExtendsSpec::Named(spec) => Some(spec),
            ExtendsSpec::Unset => {
                let detected = detect_preset(request.manifest(), request.project_dir()).await?;
                if let Some(spec) = &detected {
                    debug!("Detected parent configuration '{}'", spec);
                    child.insert(EXTENDS_KEY, Value::String(spec.clone()));
                }
                detected
            }
        };

        let Some(spec) = spec else {
            return Ok(ResolvedExtends {
                child,
                parent: None,
            });
        };

        let parent = match self.presets.get(&spec) {
            Some(preset) => {
                let config = preset
                    .configuration(request.project_dir())
                    .await
                    .map_err(|e| {
                        warn!("Preset '{}' failed: {}", spec, e);
                        ConfigurationError::PresetFailed {
                            preset: spec.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                info!(preset = spec.as_str(), "loaded parent configuration");
                config
            }
            None => {
                let loaded = self.loader.load_parent(request, &spec).await?;
                match &loaded.config_file {
                    Some(file) => info!(file = %file.display(), "loaded parent configuration"),
                    None => info!(spec = spec.as_str(), "loaded parent configuration"),
                }
                loaded.result
            }
        };

        Ok(ResolvedExtends {
            child,
            parent: Some(parent),
        })
    }
}
