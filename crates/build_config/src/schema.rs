//! JSON Schema describing every recognized configuration option.
//!
//! The schema document is generated from the typed models in this module with
//! `schemars` and compiled with `jsonschema`. Both happen at most once per
//! process; later calls share the cached values.
//!
//! Unknown keys are rejected at the root and inside structured sections so
//! that misspelled or misplaced options surface as validation errors.
//! Platform-specific sections (`mac`, `win`, `linux`, ...) are accepted as
//! free-form objects.

use crate::errors::{ConfigurationError, ConfigurationResult};
use jsonschema::Validator;
use schemars::{schema_for, JsonSchema};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::debug;

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;

/// Version of the schema document, recorded in its `$comment`.
pub const SCHEMA_VERSION: &str = "1";

static SCHEMA_DOCUMENT: OnceLock<Value> = OnceLock::new();
static COMPILED_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Root of the build configuration.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schemars(title = "Build configuration")]
pub struct BuildConfigurationSchema {
    /// Application identifier, e.g. `com.example.app`.
    pub app_id: Option<String>,
    pub product_name: Option<String>,
    pub copyright: Option<String>,
    /// Parent configuration: a built-in preset name, a `file:` spec, a path
    /// or an installed package. `null` disables preset auto-detection.
    pub extends: Option<String>,
    pub directories: Option<DirectoriesSchema>,
    pub files: Option<FileSelectionSchema>,
    pub extra_files: Option<FileSelectionSchema>,
    pub extra_resources: Option<FileSelectionSchema>,
    pub publish: Option<PublishSchema>,
    /// Values injected into the packaged application manifest.
    pub extra_metadata: Option<Map<String, Value>>,
    pub asar: Option<AsarSchema>,
    /// Globs of files kept outside the asar archive.
    pub asar_unpack: Option<StringOrList>,
    pub disable_sanity_check_asar: Option<bool>,
    pub compression: Option<Compression>,
    pub build_version: Option<String>,
    pub build_number: Option<String>,
    pub icon: Option<String>,
    pub include_pdb: Option<bool>,
    pub include_sub_node_modules: Option<bool>,
    pub disable_default_ignored_files: Option<bool>,
    pub detect_update_channel: Option<bool>,
    pub generate_update_files_for_all_channels: Option<bool>,
    pub electron_languages: Option<StringOrList>,
    pub framework: Option<String>,
    pub node_version: Option<String>,
    pub concurrency: Option<Map<String, Value>>,
    pub electron_download: Option<Map<String, Value>>,
    pub electron_fuses: Option<Map<String, Value>>,
    pub release_info: Option<Map<String, Value>>,
    pub build_dependencies_from_source: Option<bool>,
    pub node_gyp_rebuild: Option<bool>,
    pub npm_rebuild: Option<bool>,
    pub npm_args: Option<StringOrList>,
    pub electron_version: Option<String>,
    pub electron_dist: Option<String>,
    pub artifact_name: Option<String>,
    pub executable_name: Option<String>,
    pub remove_package_scripts: Option<bool>,
    pub force_code_signing: Option<bool>,
    pub protocols: Option<OneOrMany<Map<String, Value>>>,
    pub file_associations: Option<OneOrMany<Map<String, Value>>>,
    pub before_build: Option<String>,
    pub before_pack: Option<String>,
    pub after_extract: Option<String>,
    pub after_pack: Option<String>,
    pub after_sign: Option<String>,
    pub artifact_build_started: Option<String>,
    pub artifact_build_completed: Option<String>,
    pub after_all_artifact_build: Option<String>,
    pub on_node_module_file: Option<String>,
    pub msi_project_created: Option<String>,
    pub appx_manifest_created: Option<String>,
    pub mac: Option<Map<String, Value>>,
    pub mas: Option<Map<String, Value>>,
    pub mas_dev: Option<Map<String, Value>>,
    pub dmg: Option<Map<String, Value>>,
    pub pkg: Option<Map<String, Value>>,
    pub win: Option<Map<String, Value>>,
    pub nsis: Option<Map<String, Value>>,
    pub nsis_web: Option<Map<String, Value>>,
    pub squirrel_windows: Option<Map<String, Value>>,
    pub msi: Option<Map<String, Value>>,
    pub msi_wrapped: Option<Map<String, Value>>,
    pub portable: Option<Map<String, Value>>,
    pub appx: Option<Map<String, Value>>,
    pub linux: Option<Map<String, Value>>,
    pub deb: Option<Map<String, Value>>,
    pub rpm: Option<Map<String, Value>>,
    pub snap: Option<Map<String, Value>>,
    pub flatpak: Option<Map<String, Value>>,
    pub pacman: Option<Map<String, Value>>,
    pub apk: Option<Map<String, Value>>,
    pub freebsd: Option<Map<String, Value>>,
    pub p5p: Option<Map<String, Value>>,
    pub app_image: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DirectoriesSchema {
    /// Output directory, relative to the project directory.
    pub output: Option<String>,
    pub build_resources: Option<String>,
    /// Application source directory.
    pub app: Option<String>,
}

/// `files`, `extraFiles` and `extraResources`.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FileSelectionSchema {
    Pattern(String),
    Set(FileSetSchema),
    List(Vec<PatternOrFileSet>),
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PatternOrFileSet {
    Pattern(String),
    Set(FileSetSchema),
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FileSetSchema {
    pub from: Option<String>,
    pub to: Option<String>,
    pub filter: Option<StringOrList>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PublishSchema {
    Provider(String),
    Target(PublishTargetSchema),
    List(Vec<ProviderOrTarget>),
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ProviderOrTarget {
    Provider(String),
    Target(PublishTargetSchema),
}

/// A publish target. Provider-specific options (`bucket`, `owner`, ...) are
/// passed through untouched.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct PublishTargetSchema {
    pub provider: String,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AsarSchema {
    Enabled(bool),
    Options(Map<String, Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    Store,
    Normal,
    Maximum,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum StringOrList {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

/// The versioned schema document, generated on first use.
pub fn schema_document() -> &'static Value {
    SCHEMA_DOCUMENT.get_or_init(|| {
        debug!("Generating configuration schema v{}", SCHEMA_VERSION);
        let mut document = schema_for!(BuildConfigurationSchema).to_value();
        if let Some(root) = document.as_object_mut() {
            root.insert(
                "$comment".to_string(),
                Value::String(format!("build configuration schema v{}", SCHEMA_VERSION)),
            );
        }
        document
    })
}

/// The compiled validator for [`schema_document`], built on first use.
///
/// # Errors
///
/// Returns `ConfigurationError::SchemaUnavailable` if the document does not
/// compile. The failure is cached like a success.
pub fn compiled_schema() -> ConfigurationResult<&'static Validator> {
    COMPILED_SCHEMA
        .get_or_init(|| {
            debug!("Compiling configuration schema");
            jsonschema::validator_for(schema_document()).map_err(|e| e.to_string())
        })
        .as_ref()
        .map_err(|reason| ConfigurationError::SchemaUnavailable {
            reason: reason.clone(),
        })
}
