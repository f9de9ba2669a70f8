//! Tests for configuration error types.

use super::*;

#[test]
fn invalid_file_set_names_field_and_index() {
    let error = ConfigurationError::InvalidFileSet {
        field: "extraResources".to_string(),
        index: 2,
        reason: "nested array not expected".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "extraResources configuration is invalid at index 2: nested array not expected"
    );
}

#[test]
fn deprecated_option_message_contains_option_path() {
    let error = ConfigurationError::DeprecatedOption {
        option: "extraMetadata.build".to_string(),
        guidance: "specify the build configuration at the top level".to_string(),
    };

    let message = error.to_string();
    assert!(message.contains("'extraMetadata.build' is deprecated"));
    assert!(message.contains("top level"));
}

#[test]
fn schema_violations_render_every_message() {
    let error = ConfigurationError::SchemaViolations {
        messages: vec!["first problem".to_string(), "second problem".to_string()],
    };

    let message = error.to_string();
    assert!(message.starts_with("Invalid configuration object:"));
    assert!(message.contains("first problem"));
    assert!(message.contains("second problem"));
}

#[test]
fn parent_config_not_found_message() {
    let error = ConfigurationError::ParentConfigNotFound {
        spec: "file:missing.yml".to_string(),
    };

    assert_eq!(
        error.to_string(),
        "Cannot find parent config file: file:missing.yml"
    );
}

#[test]
fn io_and_schema_failures_are_not_user_facing() {
    let io = ConfigurationError::FileAccessError {
        path: "/project/package.json".to_string(),
        reason: "permission denied".to_string(),
    };
    let schema = ConfigurationError::SchemaUnavailable {
        reason: "compilation failed".to_string(),
    };

    assert!(!io.is_user_facing());
    assert!(!schema.is_user_facing());
}

#[test]
fn configuration_mistakes_are_user_facing() {
    let errors = vec![
        ConfigurationError::AppDirectoryNotFound {
            path: "app".to_string(),
        },
        ConfigurationError::InvalidConfiguration {
            field: "extends".to_string(),
            reason: "must be a string or null".to_string(),
        },
        ConfigurationError::SchemaViolations { messages: vec![] },
    ];

    for error in errors {
        assert!(error.is_user_facing(), "{error} should be user facing");
    }
}

#[test]
fn errors_are_cloneable_and_comparable() {
    let error = ConfigurationError::FileNotFound {
        path: "electron-builder.yml".to_string(),
    };

    assert_eq!(error.clone(), error);
}
