//! Configuration resolution error types.
//!
//! Domain-specific errors for configuration loading, merging,
//! and validation operations.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Configuration resolution errors.
///
/// Every variant except [`ConfigurationError::FileAccessError`] and
/// [`ConfigurationError::SchemaUnavailable`] describes a problem the user can
/// fix in their configuration. None of them are retryable: a resolution that
/// produces an error never yields a partial configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to access configuration file: {path} - {reason}")]
    FileAccessError { path: String, reason: String },

    #[error("Failed to parse configuration file {path}: {reason}")]
    ParseError { path: String, reason: String },

    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("{field} configuration is invalid at index {index}: {reason}")]
    InvalidFileSet {
        field: String,
        index: usize,
        reason: String,
    },

    #[error("Cannot find parent config file: {spec}")]
    ParentConfigNotFound { spec: String },

    #[error("Preset '{preset}' failed to produce a configuration: {reason}")]
    PresetFailed { preset: String, reason: String },

    #[error("'{option}' is deprecated: {guidance}")]
    DeprecatedOption { option: String, guidance: String },

    #[error("Invalid configuration object:\n\n{}", .messages.join("\n\n"))]
    SchemaViolations { messages: Vec<String> },

    #[error("Configuration schema is unavailable: {reason}")]
    SchemaUnavailable { reason: String },

    #[error("Application directory {path} doesn't exist")]
    AppDirectoryNotFound { path: String },

    #[error("Application directory {path} is not a directory")]
    AppDirectoryNotDirectory { path: String },
}

impl ConfigurationError {
    /// Returns `true` when the error describes a configuration mistake rather
    /// than an internal failure (I/O, broken schema).
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            ConfigurationError::FileAccessError { .. }
                | ConfigurationError::SchemaUnavailable { .. }
        )
    }
}

/// Result type alias for configuration operations.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;
