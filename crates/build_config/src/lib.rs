//! Build configuration resolution for application packaging.
//!
//! The effective configuration of a project is assembled from three layers:
//! built-in defaults, an optional parent (a preset or a file named by
//! `extends`) and the user's own configuration. This crate loads the layers,
//! merges them and validates the result against a versioned schema.
//!
//! # Examples
//!
//! ```rust,no_run
//! use build_config::{ConfigRequest, ConfigurationResolver};
//!
//! # async fn example() -> Result<(), build_config::ConfigurationError> {
//! let resolver = ConfigurationResolver::with_file_system();
//! let config = resolver.resolve(&ConfigRequest::new("/work/my-app")).await?;
//! # Ok(())
//! # }
//! ```

// Configuration tree and merging primitives
pub mod configuration;
pub mod errors;
pub mod file_set;
pub mod merge;
pub mod publish;

// Layer combination and validation
pub mod merger;
pub mod schema;
pub mod validator;

// Sources
pub mod extends;
pub mod loader;
pub mod manifest;
pub mod presets;
pub mod request;

// Resolution
pub mod app_directory;
pub mod resolver;

// Re-export for convenient access
pub use app_directory::{resolve_app_directory, DEFAULT_APP_DIR_NAMES};
pub use configuration::Configuration;
pub use errors::{ConfigurationError, ConfigurationResult};
pub use extends::{detect_preset, ExtendsResolver, ExtendsSpec, ResolvedExtends};
pub use file_set::{merge_file_sets, normalize_file_sets, FileSet, FileSetField};
pub use loader::{ConfigLoader, FileConfigLoader, LoadedConfiguration};
pub use manifest::{read_manifest, ProjectManifest};
pub use merger::ConfigurationMerger;
pub use presets::{Preset, PresetRegistry, ReactCraPreset};
pub use publish::merge_publish;
pub use request::ConfigRequest;
pub use resolver::ConfigurationResolver;
pub use validator::ConfigurationValidator;
