//! File-selection fields: `files`, `extraFiles` and `extraResources`.
//!
//! A file-selection field accepts a single pattern string, a single
//! [`FileSet`] record, or a list mixing both. Bare strings are shorthand for
//! filter patterns of the nearest preceding FileSet that has no `from`/`to`.
//! Before any merge step touches these fields they are normalized into a
//! canonical `Vec<FileSet>`.
//!
//! # Examples
//!
//! ```
//! use build_config::{normalize_file_sets, FileSet, FileSetField};
//! use serde_json::json;
//!
//! let sets = normalize_file_sets(FileSetField::Files, json!(["app/**/*", "!app/tmp/**"]))?;
//!
//! assert_eq!(sets, vec![FileSet::with_filter(["app/**/*", "!app/tmp/**"])]);
//! # Ok::<(), build_config::ConfigurationError>(())
//! ```

use crate::configuration::{value_kind, Configuration};
use crate::errors::{ConfigurationError, ConfigurationResult};
use serde_json::{Map, Value};
use std::fmt;

#[cfg(test)]
#[path = "file_set_tests.rs"]
mod tests;

/// Literal meaning "the current directory"; normalized to an absent value.
const CURRENT_DIR: &str = ".";

/// The three file-selection fields of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileSetField {
    Files,
    ExtraFiles,
    ExtraResources,
}

impl FileSetField {
    pub const ALL: [FileSetField; 3] = [
        FileSetField::Files,
        FileSetField::ExtraFiles,
        FileSetField::ExtraResources,
    ];

    /// The configuration key of this field.
    pub fn key(self) -> &'static str {
        match self {
            FileSetField::Files => "files",
            FileSetField::ExtraFiles => "extraFiles",
            FileSetField::ExtraResources => "extraResources",
        }
    }
}

impl fmt::Display for FileSetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Copy files matching `filter` from `from` to `to`.
///
/// Two file sets address the same target when both `from` and `to` are equal,
/// including both being absent. Keys other than `from`, `to` and `filter` are
/// carried along untouched so schema validation can report them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileSet {
    pub from: Option<String>,
    pub to: Option<String>,
    pub filter: Option<Vec<String>>,
    pub extra: Map<String, Value>,
}

impl FileSet {
    /// A file set with only filter patterns.
    pub fn with_filter<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter: Some(patterns.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// A file set copying from `from` to `to`.
    pub fn copy(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            ..Self::default()
        }
    }

    /// Adds filter patterns, builder style.
    pub fn filtered<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filter
            .get_or_insert_with(Vec::new)
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn same_target(&self, other: &FileSet) -> bool {
        self.from == other.from && self.to == other.to
    }

    fn has_no_target(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    fn from_record(
        field: FileSetField,
        index: usize,
        mut record: Map<String, Value>,
    ) -> ConfigurationResult<Self> {
        let invalid = |reason: String| ConfigurationError::InvalidFileSet {
            field: field.key().to_string(),
            index,
            reason,
        };

        let from = directory_value(record.remove("from"), "from").map_err(invalid)?;
        let to = directory_value(record.remove("to"), "to").map_err(invalid)?;
        let filter = match record.remove("filter") {
            None | Some(Value::Null) => None,
            Some(Value::String(pattern)) => Some(vec![pattern]),
            Some(Value::Array(patterns)) => Some(
                patterns
                    .into_iter()
                    .map(|pattern| match pattern {
                        Value::String(pattern) => Ok(pattern),
                        other => Err(invalid(format!(
                            "filter patterns must be strings, got {}",
                            value_kind(&other)
                        ))),
                    })
                    .collect::<ConfigurationResult<Vec<_>>>()?,
            ),
            Some(other) => {
                return Err(invalid(format!(
                    "filter must be a string or a list of strings, got {}",
                    value_kind(&other)
                )))
            }
        };

        Ok(Self {
            from,
            to,
            filter,
            extra: record,
        })
    }

    pub fn into_value(self) -> Value {
        let mut record = self.extra;
        if let Some(from) = self.from {
            record.insert("from".to_string(), Value::String(from));
        }
        if let Some(to) = self.to {
            record.insert("to".to_string(), Value::String(to));
        }
        if let Some(filter) = self.filter {
            record.insert(
                "filter".to_string(),
                Value::Array(filter.into_iter().map(Value::String).collect()),
            );
        }
        Value::Object(record)
    }
}

fn directory_value(value: Option<Value>, name: &str) -> Result<Option<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(dir)) if dir == CURRENT_DIR => Ok(None),
        Some(Value::String(dir)) => Ok(Some(dir)),
        Some(other) => Err(format!(
            "'{}' must be a string, got {}",
            name,
            value_kind(&other)
        )),
    }
}

/// Normalizes the value of a file-selection field into a list of file sets.
///
/// A bare string folds into the last file set built so far when that set has
/// neither `from` nor `to`; otherwise it starts a new `{ filter: [string] }`.
/// Folded strings never occupy a slot of their own, so a string can fold into
/// a set that was several entries back in the input.
///
/// # Errors
///
/// Returns `ConfigurationError::InvalidFileSet` naming the field and the
/// index for nested lists, non-string scalars, and malformed records.
pub fn normalize_file_sets(field: FileSetField, value: Value) -> ConfigurationResult<Vec<FileSet>> {
    let items = match value {
        Value::Array(items) => items,
        single => vec![single],
    };

    let mut sets: Vec<FileSet> = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::String(pattern) => {
                if let Some(previous) = sets.last_mut().filter(|set| set.has_no_target()) {
                    previous.filter.get_or_insert_with(Vec::new).push(pattern);
                } else {
                    sets.push(FileSet::with_filter([pattern]));
                }
            }
            Value::Object(record) => sets.push(FileSet::from_record(field, index, record)?),
            Value::Null => {}
            Value::Array(_) => {
                return Err(ConfigurationError::InvalidFileSet {
                    field: field.key().to_string(),
                    index,
                    reason: "nested array not expected".to_string(),
                })
            }
            other => {
                return Err(ConfigurationError::InvalidFileSet {
                    field: field.key().to_string(),
                    index,
                    reason: format!(
                        "expected a pattern string or a file set, got {}",
                        value_kind(&other)
                    ),
                })
            }
        }
    }

    Ok(sets)
}

/// Reads a file-selection field as normalized file sets.
///
/// Returns `None` when the field is absent or `null`.
pub fn file_sets(
    config: &Configuration,
    field: FileSetField,
) -> ConfigurationResult<Option<Vec<FileSet>>> {
    match config.get(field.key()) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => normalize_file_sets(field, value.clone()).map(Some),
    }
}

/// Writes file sets into a file-selection field.
pub fn set_file_sets(config: &mut Configuration, field: FileSetField, sets: Vec<FileSet>) {
    config.insert(
        field.key(),
        Value::Array(sets.into_iter().map(FileSet::into_value).collect()),
    );
}

/// Normalizes every file-selection field of a configuration.
///
/// Absent and `null` fields are left untouched.
pub fn normalize_configuration(mut config: Configuration) -> ConfigurationResult<Configuration> {
    for field in FileSetField::ALL {
        let Some(value) = config.remove(field.key()) else {
            continue;
        };
        if value.is_null() {
            config.insert(field.key(), value);
            continue;
        }
        let sets = normalize_file_sets(field, value)?;
        set_file_sets(&mut config, field, sets);
    }
    Ok(config)
}

/// Merges a child's normalized file sets with its parent's.
///
/// The child's entries come first, in order. A parent set addressing the same
/// target as a child set prepends its filter patterns to the child's (parent
/// patterns apply first). Parent sets with no counterpart in the child are
/// appended in parent order.
pub fn merge_file_sets(child: Vec<FileSet>, parent: Vec<FileSet>) -> Vec<FileSet> {
    let child_count = child.len();
    let mut merged = child;

    for parent_set in parent {
        let counterpart = merged[..child_count]
            .iter()
            .position(|existing| existing.same_target(&parent_set));
        match counterpart {
            Some(position) => {
                if let Some(parent_filter) = parent_set.filter.filter(|f| !f.is_empty()) {
                    let existing = &mut merged[position];
                    let child_filter = existing.filter.take().unwrap_or_default();
                    let mut combined = parent_filter;
                    combined.extend(child_filter);
                    existing.filter = Some(combined);
                }
            }
            None => merged.push(parent_set),
        }
    }

    merged
}
