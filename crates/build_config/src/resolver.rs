//! End-to-end configuration resolution.
//!
//! [`ConfigurationResolver`] wires the loader, the inheritance resolver, the
//! merger and the validator together:
//!
//! 1. Load the user configuration (explicit file, manifest field, or search)
//! 2. Layer the programmatic options on top
//! 3. Resolve `extends` and load the parent
//! 4. Merge defaults, parent and child
//! 5. Validate the result
//!
//! Any step failing aborts the whole resolution.

use crate::app_directory::resolve_app_directory;
use crate::configuration::Configuration;
use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::extends::ExtendsResolver;
use crate::loader::{ConfigLoader, FileConfigLoader};
use crate::merger::ConfigurationMerger;
use crate::presets::PresetRegistry;
use crate::request::ConfigRequest;
use crate::validator::ConfigurationValidator;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;

/// Resolves the effective build configuration of a project.
///
/// # Examples
///
/// ```rust,no_run
/// use build_config::{ConfigRequest, ConfigurationResolver};
///
/// # async fn example() -> Result<(), build_config::ConfigurationError> {
/// let resolver = ConfigurationResolver::with_file_system();
/// let request = ConfigRequest::new("/work/my-app");
///
/// let config = resolver.resolve(&request).await?;
/// println!("{:?}", config.get_path(&["directories", "output"]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConfigurationResolver {
    loader: Arc<dyn ConfigLoader>,
    extends: ExtendsResolver,
    merger: ConfigurationMerger,
    validator: ConfigurationValidator,
}

impl ConfigurationResolver {
    /// Creates a resolver reading through `loader`, with the built-in presets.
    pub fn new(loader: Arc<dyn ConfigLoader>) -> Self {
        Self::with_presets(loader, PresetRegistry::default())
    }

    pub fn with_presets(loader: Arc<dyn ConfigLoader>, presets: PresetRegistry) -> Self {
        Self {
            extends: ExtendsResolver::with_presets(Arc::clone(&loader), presets),
            loader,
            merger: ConfigurationMerger::new(),
            validator: ConfigurationValidator::new(),
        }
    }

    /// Creates a resolver backed by [`FileConfigLoader`].
    pub fn with_file_system() -> Self {
        Self::new(Arc::new(FileConfigLoader::new()))
    }

    /// Resolves and validates the configuration described by `request`.
    ///
    /// # Errors
    ///
    /// Any [`ConfigurationError`] raised while loading, merging or
    /// validating. No partial configuration is returned.
    #[instrument(
        skip(self, request),
        fields(
            project_dir = %request.project_dir().display(),
            config_path = ?request.config_path()
        )
    )]
    pub async fn resolve(&self, request: &ConfigRequest) -> ConfigurationResult<Configuration> {
        info!("Starting configuration resolution");

        // Step 1: Load the user configuration
        debug!("Loading user configuration");
        let loaded = self
            .loader
            .load(request, request.config_path())
            .await
            .map_err(|e| {
                warn!("Failed to load configuration: {}", e);
                e
            })?;

        let mut child = match loaded {
            Some(loaded) => {
                match &loaded.config_file {
                    Some(file) => info!("Using configuration file {}", file.display()),
                    None => info!(
                        "Using '{}' field of {}",
                        request.package_key(),
                        request.manifest().path().display()
                    ),
                }
                loaded.result
            }
            None => {
                debug!("No user configuration found");
                Configuration::new()
            }
        };

        // Step 2: Programmatic options win over the loaded configuration
        if let Some(options) = request.options() {
            debug!("Applying programmatic options");
            child.merge_layer(options.clone());
        }

        // Step 3: Resolve inheritance
        debug!("Resolving parent configuration");
        let resolved = self
            .extends
            .resolve(request, child)
            .await
            .map_err(|e| {
                warn!("Failed to resolve parent configuration: {}", e);
                e
            })?;

        // Step 4: Merge defaults, parent and child
        let merged = self
            .merger
            .merge(Configuration::defaults(), resolved.parent, resolved.child)
            .map_err(|e| {
                warn!("Failed to merge configuration: {}", e);
                e
            })?;

        // Step 5: Validate
        let validated = self.validator.validate(merged).map_err(|e| {
            warn!("Configuration validation failed");
            e
        })?;

        info!("Configuration resolution completed");
        Ok(validated)
    }

    /// Resolves the application directory for a resolved configuration,
    /// honouring `directories.app`.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError::InvalidConfiguration` - `directories.app` is not a string
    /// * `ConfigurationError::AppDirectoryNotFound` - the directory is missing
    /// * `ConfigurationError::AppDirectoryNotDirectory` - the path is a file
    pub async fn app_directory(
        &self,
        request: &ConfigRequest,
        config: &Configuration,
    ) -> ConfigurationResult<PathBuf> {
        let user_app_dir = match config.get_path(&["directories", "app"]) {
            None | Some(Value::Null) => None,
            Some(Value::String(dir)) => Some(dir.as_str()),
            Some(_) => {
                return Err(ConfigurationError::InvalidConfiguration {
                    field: "directories.app".to_string(),
                    reason: "expected a string".to_string(),
                })
            }
        };

        resolve_app_directory(request.project_dir(), user_app_dir).await
    }
}
