//! Store error types.

use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Keychain error.
    #[error("Keychain error: {0}")]
    Keychain(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<keyring::Error> for StoreError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::PlatformFailure(e) => {
                StoreError::Keychain(format!("platform failure: {e}"))
            }
            keyring::Error::NoStorageAccess(_) => {
                StoreError::Keychain("access denied".to_string())
            }
            _ => StoreError::Keychain(err.to_string()),
        }
    }
}

impl StoreError {
    /// Returns true if this error came from the file system.
    pub fn is_io(&self) -> bool {
        matches!(self, StoreError::Io(_))
    }
}
