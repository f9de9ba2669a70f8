//! Application directory resolution.

use crate::errors::{ConfigurationError, ConfigurationResult};
use crate::manifest::MANIFEST_FILE_NAME;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

#[cfg(test)]
#[path = "app_directory_tests.rs"]
mod tests;

/// Conventional application directories, in probe order.
pub const DEFAULT_APP_DIR_NAMES: [&str; 2] = ["app", "www"];

/// Determines the directory holding the application sources.
///
/// With `user_app_dir` (usually `directories.app`), the path is resolved
/// against `project_dir` and must be an existing directory. Without it, the
/// conventional directories are probed for a manifest and the project
/// directory itself is the fallback.
///
/// # Errors
///
/// * `ConfigurationError::AppDirectoryNotFound` - the given directory is missing
/// * `ConfigurationError::AppDirectoryNotDirectory` - the given path is a file
pub async fn resolve_app_directory(
    project_dir: &Path,
    user_app_dir: Option<&str>,
) -> ConfigurationResult<PathBuf> {
    let Some(user_app_dir) = user_app_dir else {
        return Ok(probe_default_app_directory(project_dir).await);
    };

    let absolute = normalize_path(&project_dir.join(user_app_dir));
    let metadata = match tokio::fs::metadata(&absolute).await {
        Ok(metadata) => metadata,
        Err(e) => {
            debug!("Cannot stat {}: {}", absolute.display(), e);
            return Err(ConfigurationError::AppDirectoryNotFound {
                path: absolute.display().to_string(),
            });
        }
    };

    if !metadata.is_dir() {
        return Err(ConfigurationError::AppDirectoryNotDirectory {
            path: absolute.display().to_string(),
        });
    }

    if absolute == normalize_path(project_dir) {
        warn!(
            "Specified application directory equals to project dir - superfluous or wrong configuration. \
             Please remove directories.app or set it to a dedicated application directory"
        );
    }

    Ok(absolute)
}

async fn probe_default_app_directory(project_dir: &Path) -> PathBuf {
    for name in DEFAULT_APP_DIR_NAMES {
        let candidate = project_dir.join(name);
        let manifest_is_file = tokio::fs::metadata(candidate.join(MANIFEST_FILE_NAME))
            .await
            .map(|metadata| metadata.is_file())
            .unwrap_or(false);
        if manifest_is_file {
            debug!("Using application directory {}", candidate.display());
            return candidate;
        }
    }
    project_dir.to_path_buf()
}

/// Resolves `.` and `..` components without touching the file system.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
