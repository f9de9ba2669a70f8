//! Configuration merging engine.
//!
//! Combines the built-in defaults, an optional parent (preset or `extends`
//! file) and the user's configuration into one tree.
//!
//! # Precedence
//!
//! From lowest to highest:
//! 1. **Defaults** - [`Configuration::defaults`]
//! 2. **Parent** - the configuration named by `extends`, if any
//! 3. **Child** - the user's own configuration
//!
//! Objects merge recursively and the higher layer wins everything else. Two
//! fields get dedicated treatment: `publish` (see [`crate::publish`]) and the
//! file-selection fields (see [`crate::file_set`]), whose parent and child
//! lists are merged structurally instead of being replaced.
//!
//! # Examples
//!
//! ```rust
//! use build_config::{Configuration, ConfigurationMerger};
//! use serde_json::json;
//!
//! let merger = ConfigurationMerger::new();
//! let child = Configuration::from_value(json!({ "directories": { "output": "release" } }))?;
//!
//! let merged = merger.merge(Configuration::defaults(), None, child)?;
//!
//! assert_eq!(merged.get_path(&["directories", "output"]), Some(&json!("release")));
//! assert_eq!(merged.get_path(&["directories", "buildResources"]), Some(&json!("build")));
//! # Ok::<(), build_config::ConfigurationError>(())
//! ```

use crate::configuration::Configuration;
use crate::errors::ConfigurationResult;
use crate::file_set::{
    file_sets, merge_file_sets, normalize_configuration, set_file_sets, FileSet, FileSetField,
};
use tracing::debug;

#[cfg(test)]
#[path = "merger_tests.rs"]
mod tests;

/// Configuration merging engine.
///
/// Stateless. Inputs are taken by value: a configuration handed to
/// [`ConfigurationMerger::merge`] is consumed and cannot be merged again.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationMerger {}

impl ConfigurationMerger {
    pub fn new() -> Self {
        Self {}
    }

    /// Merges `defaults`, then `parent` (if any), then `child`.
    ///
    /// File-selection fields of the child and parent are normalized before
    /// anything else reads them. When both the parent and the child define a
    /// file-selection field, the merged field is the structural merge of the
    /// two normalized lists rather than the child's list alone.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidFileSet` when a file-selection
    /// field of either input cannot be normalized.
    pub fn merge(
        &self,
        defaults: Configuration,
        parent: Option<Configuration>,
        child: Configuration,
    ) -> ConfigurationResult<Configuration> {
        let child = normalize_configuration(child)?;

        let Some(parent) = parent else {
            debug!("Merging configuration without parent");
            let mut merged = defaults;
            merged.merge_layer(child);
            return Ok(merged);
        };

        let parent = normalize_configuration(parent)?;

        let mut structural: Vec<(FileSetField, Vec<FileSet>)> = Vec::new();
        for field in FileSetField::ALL {
            if let (Some(child_sets), Some(parent_sets)) =
                (file_sets(&child, field)?, file_sets(&parent, field)?)
            {
                debug!(
                    "Merging {} structurally ({} child, {} parent entries)",
                    field,
                    child_sets.len(),
                    parent_sets.len()
                );
                structural.push((field, merge_file_sets(child_sets, parent_sets)));
            }
        }

        let mut merged = defaults;
        merged.merge_layer(parent);
        merged.merge_layer(child);

        for (field, sets) in structural {
            set_file_sets(&mut merged, field, sets);
        }

        Ok(merged)
    }
}
