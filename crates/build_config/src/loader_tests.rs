//! Tests for configuration file loading.

use super::*;
use serde_json::json;
use tempfile::TempDir;

fn write_file(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn request_for(dir: &TempDir) -> ConfigRequest {
    ConfigRequest::new(dir.path()).with_manifest(None)
}

// ============================================================================
// read_config_file Tests
// ============================================================================

/// Verify the file extension selects the parser.
#[tokio::test]
async fn test_read_config_file_formats() {
    let dir = TempDir::new().unwrap();
    let yaml = write_file(dir.path(), "a.yml", "appId: yaml.app\nfiles:\n  - dist\n");
    let json = write_file(dir.path(), "a.json", r#"{ "appId": "json.app" }"#);
    let toml = write_file(dir.path(), "a.toml", "appId = \"toml.app\"\n");

    let yaml = read_config_file(&yaml).await.unwrap().unwrap();
    let json = read_config_file(&json).await.unwrap().unwrap();
    let toml = read_config_file(&toml).await.unwrap().unwrap();

    assert_eq!(
        yaml.result.into_value(),
        json!({ "appId": "yaml.app", "files": ["dist"] })
    );
    assert_eq!(json.result.get("appId"), Some(&json!("json.app")));
    assert_eq!(toml.result.get("appId"), Some(&json!("toml.app")));
}

#[tokio::test]
async fn test_read_config_file_missing_is_none() {
    let dir = TempDir::new().unwrap();

    let result = read_config_file(&dir.path().join("absent.yml")).await;

    assert_eq!(result, Ok(None));
}

/// Verify an empty YAML document is an empty configuration.
#[tokio::test]
async fn test_read_config_file_empty_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "empty.yml", "\n");

    let loaded = read_config_file(&path).await.unwrap().unwrap();

    assert!(loaded.result.is_empty());
    assert_eq!(loaded.config_file, Some(path));
}

#[tokio::test]
async fn test_read_config_file_malformed_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "bad.json", "{ \"appId\": ");

    let result = read_config_file(&path).await;

    assert!(matches!(result, Err(ConfigurationError::ParseError { .. })));
}

/// Verify a document whose root is not a mapping is rejected.
#[tokio::test]
async fn test_read_config_file_non_mapping_root_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "list.yml", "- one\n- two\n");

    let result = read_config_file(&path).await;

    match result {
        Err(ConfigurationError::ParseError { path: reported, .. }) => {
            assert!(reported.ends_with("list.yml"));
        }
        other => panic!("Expected ParseError, got {:?}", other),
    }
}

// ============================================================================
// load Tests
// ============================================================================

#[tokio::test]
async fn test_load_explicit_path() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "config/custom.yml", "appId: custom\n");
    write_file(dir.path(), "electron-builder.yml", "appId: default\n");
    let loader = FileConfigLoader::new();

    let loaded = loader
        .load(&request_for(&dir), Some(Path::new("config/custom.yml")))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(loaded.result.get("appId"), Some(&json!("custom")));
}

/// Verify a missing explicit file is an error rather than a silent miss.
#[tokio::test]
async fn test_load_explicit_path_missing_is_error() {
    let dir = TempDir::new().unwrap();
    let loader = FileConfigLoader::new();

    let result = loader
        .load(&request_for(&dir), Some(Path::new("missing.yml")))
        .await;

    assert!(matches!(result, Err(ConfigurationError::FileNotFound { .. })));
}

/// Verify the manifest's build field wins over configuration files.
#[tokio::test]
async fn test_load_prefers_manifest_field() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "electron-builder.yml", "appId: file\n");
    let request = ConfigRequest::new(dir.path())
        .with_manifest(Some(json!({ "name": "app", "build": { "appId": "manifest" } })));
    let loader = FileConfigLoader::new();

    let loaded = loader.load(&request, None).await.unwrap().unwrap();

    assert_eq!(loaded.result.get("appId"), Some(&json!("manifest")));
    assert_eq!(loaded.config_file, None);
}

#[tokio::test]
async fn test_load_manifest_field_must_be_object() {
    let dir = TempDir::new().unwrap();
    let request = ConfigRequest::new(dir.path()).with_manifest(Some(json!({ "build": "oops" })));
    let loader = FileConfigLoader::new();

    let result = loader.load(&request, None).await;

    match result {
        Err(ConfigurationError::InvalidConfiguration { field, .. }) => assert_eq!(field, "build"),
        other => panic!("Expected InvalidConfiguration, got {:?}", other),
    }
}

/// Verify the search order over configuration file extensions.
#[tokio::test]
async fn test_load_searches_extensions_in_order() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "electron-builder.json", r#"{ "appId": "json" }"#);
    write_file(dir.path(), "electron-builder.yaml", "appId: yaml\n");
    let loader = FileConfigLoader::new();

    let loaded = loader.load(&request_for(&dir), None).await.unwrap().unwrap();

    assert_eq!(loaded.result.get("appId"), Some(&json!("yaml")));
    assert_eq!(
        loaded.config_file,
        Some(dir.path().join("electron-builder.yaml"))
    );
}

#[tokio::test]
async fn test_load_reads_manifest_from_disk() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "package.json",
        r#"{ "name": "app", "build": { "productName": "Disk" } }"#,
    );
    let loader = FileConfigLoader::new();

    let loaded = loader
        .load(&ConfigRequest::new(dir.path()), None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(loaded.result.get("productName"), Some(&json!("Disk")));
}

#[tokio::test]
async fn test_load_nothing_found() {
    let dir = TempDir::new().unwrap();
    let loader = FileConfigLoader::new();

    let result = loader.load(&request_for(&dir), None).await;

    assert_eq!(result, Ok(None));
}

// ============================================================================
// load_parent Tests
// ============================================================================

#[tokio::test]
async fn test_load_parent_file_spec() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "base/common.yml", "copyright: Example\n");
    let loader = FileConfigLoader::new();

    let loaded = loader
        .load_parent(&request_for(&dir), "file:base/common.yml")
        .await
        .unwrap();

    assert_eq!(loaded.result.get("copyright"), Some(&json!("Example")));
    assert_eq!(
        loaded.config_file,
        Some(dir.path().join("base/common.yml"))
    );
}

/// Verify an absolute file spec is used as-is.
#[tokio::test]
async fn test_load_parent_absolute_file_spec() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "shared.json", r#"{ "asar": false }"#);
    let spec = format!("file:{}", path.display());
    let project = TempDir::new().unwrap();
    let loader = FileConfigLoader::new();

    let loaded = loader
        .load_parent(&request_for(&project), &spec)
        .await
        .unwrap();

    assert_eq!(loaded.result.get("asar"), Some(&json!(false)));
}

/// Verify a bare spec falls back to an installed package directory.
#[tokio::test]
async fn test_load_parent_installed_package_directory() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "node_modules/shared-config/electron-builder.yml",
        "productName: Shared\n",
    );
    let loader = FileConfigLoader::new();

    let loaded = loader
        .load_parent(&request_for(&dir), "shared-config")
        .await
        .unwrap();

    assert_eq!(loaded.result.get("productName"), Some(&json!("Shared")));
}

#[tokio::test]
async fn test_load_parent_installed_package_file() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "node_modules/shared-config/config/base.json",
        r#"{ "appId": "shared" }"#,
    );
    let loader = FileConfigLoader::new();

    let loaded = loader
        .load_parent(&request_for(&dir), "shared-config/config/base.json")
        .await
        .unwrap();

    assert_eq!(loaded.result.get("appId"), Some(&json!("shared")));
}

/// Verify a `file:` spec never looks into installed packages.
#[tokio::test]
async fn test_load_parent_file_spec_skips_packages() {
    let dir = TempDir::new().unwrap();
    write_file(
        dir.path(),
        "node_modules/base.yml",
        "appId: from-packages\n",
    );
    let loader = FileConfigLoader::new();

    let result = loader
        .load_parent(&request_for(&dir), "file:base.yml")
        .await;

    assert_eq!(
        result,
        Err(ConfigurationError::ParentConfigNotFound {
            spec: "file:base.yml".to_string()
        })
    );
}

#[tokio::test]
async fn test_load_parent_not_found() {
    let dir = TempDir::new().unwrap();
    let loader = FileConfigLoader::new();

    let result = loader
        .load_parent(&request_for(&dir), "missing-config")
        .await;

    match result {
        Err(ConfigurationError::ParentConfigNotFound { spec }) => assert_eq!(spec, "missing-config"),
        other => panic!("Expected ParentConfigNotFound, got {:?}", other),
    }
}
