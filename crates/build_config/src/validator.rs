//! Validation of merged configurations.
//!
//! Validation runs in two phases:
//!
//! 1. **Deprecation checks and compatibility shims** - options that were moved
//!    or removed are rejected with a message pointing at the replacement, and
//!    legacy toggles are translated to their modern equivalent. These run
//!    first so their messages take precedence over generic schema errors.
//! 2. **Schema validation** - the configuration is checked against
//!    [`crate::schema::schema_document`]. Every violation is reported with a
//!    remediation footer.
//!
//! # Examples
//!
//! ```rust
//! use build_config::{Configuration, ConfigurationValidator};
//! use serde_json::json;
//!
//! let validator = ConfigurationValidator::new();
//! let config = Configuration::from_value(json!({ "extraMetadata": { "build": {} } }))?;
//!
//! let error = validator.validate(config).unwrap_err();
//! assert!(error.to_string().contains("extraMetadata.build"));
//! # Ok::<(), build_config::ConfigurationError>(())
//! ```

use crate::configuration::Configuration;
use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::schema::compiled_schema;
use serde_json::Value;
use tracing::{debug, enabled, Level};

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

/// Documentation site referenced by the remediation footer.
pub const DOCUMENTATION_SITE: &str = "https://www.electron.build";

/// Options that are rejected outright, with guidance for the replacement.
const DEPRECATED_OPTIONS: &[(&[&str], &str)] = &[
    (
        &["extraMetadata", "build"],
        "specify the build configuration at the top level of the configuration instead",
    ),
    (
        &["extraMetadata", "directories"],
        "specify it as `directories` at the top level of the configuration instead",
    ),
    (
        &["appImage", "systemIntegration"],
        "desktop integration is handled by AppImageLauncher",
    ),
];

/// Appended to every schema violation message.
pub fn remediation_footer() -> String {
    format!(
        "\n\nHow to fix:\n  \
         1. Open {site}/configuration\n  \
         2. Search the option name on the page (or type it into Search to find across the docs).\n    \
         * Not found? The option was deprecated or does not exist (check spelling).\n    \
         * Found? Check that the option is in the appropriate place, e.g. \"title\" only in \"dmg\", not in the root.\n",
        site = DOCUMENTATION_SITE
    )
}

/// Validates merged configurations.
///
/// Stateless; the compiled schema is shared process-wide.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationValidator {}

impl ConfigurationValidator {
    pub fn new() -> Self {
        Self {}
    }

    /// Validates a merged configuration, failing on the first problem class.
    ///
    /// Returns the configuration with compatibility shims applied.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError::DeprecatedOption` - a removed option is present
    /// * `ConfigurationError::SchemaViolations` - the schema rejected the
    ///   configuration; one message per violation
    /// * `ConfigurationError::SchemaUnavailable` - the schema did not compile
    pub fn validate(&self, config: Configuration) -> ConfigurationResult<Configuration> {
        check_deprecated_options(&config)?;
        let config = apply_compatibility_shims(config);

        let schema = compiled_schema()?;
        let instance = config.into_value();

        if schema.is_valid(&instance) {
            return Configuration::from_value(instance);
        }

        let violations: Vec<_> = schema.iter_errors(&instance).collect();

        if enabled!(Level::DEBUG) {
            debug!(errors = ?violations, "Configuration schema validation failed");
        }

        let footer = remediation_footer();
        let messages = violations
            .iter()
            .map(|violation| format!("{}{}", violation, footer))
            .collect();

        Err(ConfigurationError::SchemaViolations { messages })
    }
}

fn check_deprecated_options(config: &Configuration) -> ConfigurationResult<()> {
    for (path, guidance) in DEPRECATED_OPTIONS {
        if config.get_path(path).is_some() {
            return Err(ConfigurationError::DeprecatedOption {
                option: path.join("."),
                guidance: (*guidance).to_string(),
            });
        }
    }
    Ok(())
}

/// `npmSkipBuildFromSource: false` predates `buildDependenciesFromSource`.
fn apply_compatibility_shims(mut config: Configuration) -> Configuration {
    if config.get("npmSkipBuildFromSource") == Some(&Value::Bool(false)) {
        debug!("Translating npmSkipBuildFromSource=false to buildDependenciesFromSource=true");
        config.remove("npmSkipBuildFromSource");
        config.insert("buildDependenciesFromSource", Value::Bool(true));
    }
    config
}
