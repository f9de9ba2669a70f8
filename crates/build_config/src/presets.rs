//! Built-in parent configurations.
//!
//! An `extends` spec that names a registered preset resolves to a
//! configuration computed from the project instead of a file.

use crate::configuration::Configuration;
use crate::errors::ConfigurationResult;
use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

#[cfg(test)]
#[path = "presets_tests.rs"]
mod tests;

/// Name of the preset for projects bootstrapped with `react-scripts`.
pub const REACT_CRA_PRESET: &str = "react-cra";

/// A named parent configuration.
#[async_trait]
pub trait Preset: Send + Sync {
    /// Produces the preset configuration for the project at `project_dir`.
    async fn configuration(&self, project_dir: &Path) -> ConfigurationResult<Configuration>;
}

/// Preset for create-react-app projects.
///
/// The React build places the Electron entry point at `build/electron.js`,
/// copied from `public/electron.js`.
#[derive(Debug, Clone, Default)]
pub struct ReactCraPreset {}

#[async_trait]
impl Preset for ReactCraPreset {
    async fn configuration(&self, project_dir: &Path) -> ConfigurationResult<Configuration> {
        let entry = project_dir.join("public").join("electron.js");
        let entry_exists = tokio::fs::metadata(&entry)
            .await
            .map(|metadata| metadata.is_file())
            .unwrap_or(false);
        if !entry_exists {
            warn!(
                "public/electron.js not found. Please see https://medium.com/@kitze/%EF%B8%8F-from-react-to-an-electron-app-ready-for-production-a0468ecb1da3"
            );
        }

        Configuration::from_value(json!({
            "directories": {
                "buildResources": "assets"
            },
            "files": ["build/**/*"],
            "extraMetadata": {
                "main": "build/electron.js"
            }
        }))
    }
}

/// Preset lookup by name.
#[derive(Clone)]
pub struct PresetRegistry {
    presets: HashMap<String, Arc<dyn Preset>>,
}

impl PresetRegistry {
    /// A registry without any presets.
    pub fn empty() -> Self {
        Self {
            presets: HashMap::new(),
        }
    }

    /// Registers `preset` under `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, preset: Arc<dyn Preset>) {
        self.presets.insert(name.into(), preset);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Preset>> {
        self.presets.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(REACT_CRA_PRESET, Arc::new(ReactCraPreset::default()));
        registry
    }
}

impl fmt::Debug for PresetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.presets.keys().collect();
        names.sort();
        f.debug_struct("PresetRegistry")
            .field("presets", &names)
            .finish()
    }
}
