//! The configuration tree handed between loaders, mergers and the validator.
//!
//! A [`Configuration`] is an arbitrarily nested JSON object. Key order is
//! irrelevant; only the order inside sequences carries meaning.
//!
//! # Examples
//!
//! ```
//! use build_config::Configuration;
//! use serde_json::json;
//!
//! let config = Configuration::from_value(json!({
//!     "appId": "com.example.app",
//!     "directories": { "output": "release" }
//! }))?;
//!
//! assert_eq!(config.get_path(&["directories", "output"]), Some(&json!("release")));
//! # Ok::<(), build_config::ConfigurationError>(())
//! ```

use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::publish::merge_publish;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[cfg(test)]
#[path = "configuration_tests.rs"]
mod tests;

/// Key holding the inheritance specification.
pub const EXTENDS_KEY: &str = "extends";

/// Key holding the publish target(s).
pub const PUBLISH_KEY: &str = "publish";

/// A configuration tree rooted at a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    values: Map<String, Value>,
}

impl Configuration {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in lowest-precedence configuration.
    ///
    /// Output goes to `dist`, build resources are read from `build`.
    pub fn defaults() -> Self {
        let mut values = Map::new();
        values.insert(
            "directories".to_string(),
            json!({ "output": "dist", "buildResources": "build" }),
        );
        Self { values }
    }

    /// Wraps a parsed document.
    ///
    /// `null` is accepted as an empty configuration (an empty YAML file parses
    /// to `null`). Any other non-object value is rejected.
    pub fn from_value(value: Value) -> ConfigurationResult<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::new()),
            other => Err(ConfigurationError::InvalidConfiguration {
                field: "<root>".to_string(),
                reason: format!(
                    "configuration must be an object, got {}",
                    value_kind(&other)
                ),
            }),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Looks up a nested value, e.g. `&["directories", "output"]`.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        let mut current = self.values.get(*first)?;
        for segment in rest {
            current = current.as_object()?.get(*segment)?;
        }
        Some(current)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Layers `overlay` on top of `self`.
    ///
    /// This is the generic deep merge with the publish-target rule applied:
    /// when `self` already carries a list of publish targets, the overlay's
    /// `publish` augments the first target instead of replacing the list.
    pub fn merge_layer(&mut self, overlay: Configuration) {
        merge_publish(&mut self.values, overlay.values);
    }
}

impl From<Map<String, Value>> for Configuration {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

/// Human readable name of a JSON value's shape, used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
