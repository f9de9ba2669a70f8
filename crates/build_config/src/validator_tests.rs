//! Tests for configuration validation.

use super::*;
use serde_json::json;

fn config(value: Value) -> Configuration {
    Configuration::from_value(value).expect("test configuration must be an object")
}

// ============================================================================
// Deprecated Options
// ============================================================================

/// Verify extraMetadata.build is rejected even when everything else is valid.
#[test]
fn test_extra_metadata_build_is_rejected() {
    let validator = ConfigurationValidator::new();

    let result = validator.validate(config(json!({
        "appId": "com.example.app",
        "extraMetadata": { "build": { "appId": "other" } }
    })));

    match result {
        Err(ConfigurationError::DeprecatedOption { option, .. }) => {
            assert_eq!(option, "extraMetadata.build");
        }
        other => panic!("Expected DeprecatedOption, got {:?}", other),
    }
}

/// Verify extraMetadata.directories is rejected.
#[test]
fn test_extra_metadata_directories_is_rejected() {
    let validator = ConfigurationValidator::new();

    let result = validator.validate(config(json!({
        "extraMetadata": { "directories": { "output": "x" } }
    })));

    match result {
        Err(ConfigurationError::DeprecatedOption { option, guidance }) => {
            assert_eq!(option, "extraMetadata.directories");
            assert!(guidance.contains("directories"));
        }
        other => panic!("Expected DeprecatedOption, got {:?}", other),
    }
}

/// Verify deprecation errors take precedence over schema errors.
#[test]
fn test_deprecation_checked_before_schema() {
    let validator = ConfigurationValidator::new();

    let result = validator.validate(config(json!({
        "unknownOption": true,
        "extraMetadata": { "build": null }
    })));

    assert!(matches!(
        result,
        Err(ConfigurationError::DeprecatedOption { .. })
    ));
}

#[test]
fn test_app_image_system_integration_is_rejected() {
    let validator = ConfigurationValidator::new();

    let result = validator.validate(config(json!({
        "appImage": { "systemIntegration": "ask" }
    })));

    match result {
        Err(ConfigurationError::DeprecatedOption { option, .. }) => {
            assert_eq!(option, "appImage.systemIntegration");
        }
        other => panic!("Expected DeprecatedOption, got {:?}", other),
    }
}

// ============================================================================
// Compatibility Shims
// ============================================================================

/// Verify the legacy toggle is translated before schema validation.
#[test]
fn test_npm_skip_build_from_source_false_is_translated() {
    let validator = ConfigurationValidator::new();

    let validated = validator
        .validate(config(json!({ "npmSkipBuildFromSource": false })))
        .unwrap();

    assert_eq!(validated.get("npmSkipBuildFromSource"), None);
    assert_eq!(
        validated.get("buildDependenciesFromSource"),
        Some(&json!(true))
    );
}

// ============================================================================
// Schema Validation
// ============================================================================

/// Verify the defaults pass validation unchanged.
#[test]
fn test_defaults_are_valid() {
    let validator = ConfigurationValidator::new();

    let validated = validator.validate(Configuration::defaults()).unwrap();

    assert_eq!(validated, Configuration::defaults());
}

/// Verify every schema violation carries the remediation footer.
#[test]
fn test_schema_violations_carry_footer() {
    let validator = ConfigurationValidator::new();

    let result = validator.validate(config(json!({
        "productNmae": "Typo",
        "compression": "ultra"
    })));

    match result {
        Err(ConfigurationError::SchemaViolations { messages }) => {
            assert!(!messages.is_empty());
            for message in &messages {
                assert!(message.contains("How to fix:"), "missing footer: {message}");
                assert!(message.contains("https://www.electron.build/configuration"));
                assert!(message.contains("check spelling"));
            }
        }
        other => panic!("Expected SchemaViolations, got {:?}", other),
    }
}

/// Verify a misplaced option is reported.
#[test]
fn test_misplaced_option_is_reported() {
    let validator = ConfigurationValidator::new();

    let result = validator.validate(config(json!({ "output": "dist" })));

    let error = result.unwrap_err();
    assert!(error.is_user_facing());
    assert!(error.to_string().contains("Invalid configuration object"));
}

#[test]
fn test_footer_mentions_nesting() {
    let footer = remediation_footer();

    assert!(footer.contains("appropriate place"));
    assert!(footer.starts_with("\n\nHow to fix:"));
}

/// Verify commonly used packaging options pass validation.
#[test]
fn test_common_packaging_options_are_accepted() {
    let validator = ConfigurationValidator::new();

    for option in [
        json!({ "asarUnpack": ["**/*.node"] }),
        json!({ "buildVersion": "1" }),
        json!({ "icon": "build/icon.icns" }),
        json!({ "beforePack": "hooks/before-pack.js" }),
        json!({ "afterAllArtifactBuild": "hooks/after-all.js" }),
        json!({ "electronDownload": {} }),
        json!({ "releaseInfo": {} }),
        json!({ "squirrelWindows": {} }),
        json!({ "nsisWeb": {} }),
        json!({ "msi": {} }),
    ] {
        let result = validator.validate(config(option.clone()));
        assert!(result.is_ok(), "{option} should be valid, got {result:?}");
    }
}
