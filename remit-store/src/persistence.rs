//! File persistence helpers.
//!
//! Handles loading and saving state to disk with proper security. The
//! async helpers serve the preference store; [`write_atomic`] serves the
//! synchronous key-value store.

use serde::{de::DeserializeOwned, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Directory name used under the platform config and data directories.
const APP_DIR: &str = "remit";

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/remit`
/// - Linux: `~/.config/remit`
/// - Windows: `%APPDATA%\remit`
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|c| c.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default data directory for session and device state.
///
/// - macOS: `~/Library/Application Support/remit`
/// - Linux: `~/.local/share/remit`
/// - Windows: `%LOCALAPPDATA%\remit`
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default configuration file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

/// Returns the default preferences file path.
pub fn default_preferences_path() -> PathBuf {
    default_config_dir().join("preferences.json")
}

/// Returns the default key-value storage file path.
pub fn default_storage_path() -> PathBuf {
    default_data_dir().join("storage.json")
}

// ============================================================================
// Security: File Permissions
// ============================================================================

/// Opens `path` for writing, creating it owner-only (0o600) on Unix.
///
/// The mode is applied at creation, so the bearer token is never readable
/// by other users, not even briefly. An existing file is tightened too.
#[cfg(unix)]
fn create_private_file(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn create_private_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Sets restrictive directory permissions (0o700) on Unix systems.
#[cfg(unix)]
fn set_restrictive_dir_permissions(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o700); // Owner read/write/execute only
    std::fs::set_permissions(path, perms)?;

    debug!(path = %path.display(), mode = "0700", "Set restrictive directory permissions");
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
fn set_restrictive_dir_permissions(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// File Operations
// ============================================================================

/// Creates the parent directory with restrictive permissions if missing.
fn create_secure_parent_dir(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!(path = %parent.display(), "Creating secure directory");
            std::fs::create_dir_all(parent)?;
            set_restrictive_dir_permissions(parent)?;
        }
    }
    Ok(())
}

/// Writes `contents` to `path` atomically with owner-only permissions.
///
/// Writes to a sibling temp file first, then renames it over the target, so
/// a crash never leaves a truncated file behind.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    create_secure_parent_dir(path)?;

    let temp_path = path.with_extension("json.tmp");
    let mut file = create_private_file(&temp_path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(&temp_path, path)?;

    Ok(())
}

/// Saves data to a JSON file with secure permissions.
///
/// Runs [`write_atomic`] on the blocking pool.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    debug!(path = %path.display(), "Saving JSON file");

    let json = serde_json::to_string_pretty(data)?;
    let target = path.to_path_buf();
    tokio::task::spawn_blocking(move || write_atomic(&target, &json))
        .await
        .map_err(|e| StoreError::Io(std::io::Error::other(e)))??;

    debug!(path = %path.display(), "JSON file saved securely");
    Ok(())
}

/// Loads data from a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    debug!(path = %path.display(), "Loading JSON file");

    let content = tokio::fs::read_to_string(path).await?;
    let data = serde_json::from_str(&content)?;

    debug!(path = %path.display(), "JSON file loaded");
    Ok(data)
}

/// Loads data from a JSON file, returning default if missing or corrupted.
pub async fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path).await {
        Ok(data) => data,
        Err(e) => {
            if !e.is_io() {
                warn!(path = %path.display(), error = %e, "Failed to load, using defaults");
            }
            T::default()
        }
    }
}

/// Ensures a directory exists with secure permissions.
pub fn ensure_dir(path: &Path) -> Result<(), StoreError> {
    if !path.exists() {
        debug!(path = %path.display(), "Creating directory");
        std::fs::create_dir_all(path)?;
        set_restrictive_dir_permissions(path)?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_dir() {
        let path = default_config_dir();
        assert!(path.ends_with("remit"));
    }

    #[test]
    fn test_default_paths() {
        assert!(default_config_path().ends_with("config.json"));
        assert!(default_preferences_path().ends_with("preferences.json"));
        assert!(default_storage_path().ends_with("storage.json"));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("storage.json");

        write_atomic(&file, "{}").unwrap();

        let mode = std::fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "File should have 0600 permissions");
        assert!(!file.with_extension("json.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_tightens_stale_temp_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("storage.json");
        let stale = file.with_extension("json.tmp");
        std::fs::write(&stale, "old").unwrap();
        std::fs::set_permissions(&stale, std::fs::Permissions::from_mode(0o644)).unwrap();

        write_atomic(&file, r#"{"access_token":"t"}"#).unwrap();

        let mode = std::fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(std::fs::read_to_string(&file).unwrap(), r#"{"access_token":"t"}"#);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_save_json_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let file = temp_dir.path().join("nested").join("preferences.json");

        save_json(&file, &serde_json::json!({"theme": "dark"})).await.unwrap();

        let mode = std::fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
