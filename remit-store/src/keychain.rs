//! Secure token storage using the system keychain.
//!
//! This module provides a [`KeyValueStore`] backed by the system's secure
//! credential storage:
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KDE Wallet)
//!
//! Only the access token is routed here when `token_backend = "keychain"`;
//! the profile blob and device state stay in the file store.
//!
//! ## Usage
//!
//! ```ignore
//! use remit_store::keychain::KeychainStore;
//! use remit_store::KeyValueStore;
//!
//! let keychain = KeychainStore::new();
//! keychain.set("access_token", "eyJ...")?;
//! ```

use keyring::Entry;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::storage::KeyValueStore;

/// Keychain service name for Remit credentials.
const SERVICE: &str = "remit";

/// Keychain-backed key-value store.
///
/// Each key becomes an account under the [`SERVICE`] service.
#[derive(Debug, Clone)]
pub struct KeychainStore {
    service: String,
}

impl Default for KeychainStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeychainStore {
    /// Creates a store under the default service name.
    pub fn new() -> Self {
        Self::with_service(SERVICE)
    }

    /// Creates a store under a custom service name.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    /// Returns the service name.
    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, key: &str) -> Result<Entry, StoreError> {
        Ok(Entry::new(&self.service, key)?)
    }
}

impl KeyValueStore for KeychainStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.entry(key)?.get_password() {
            // Empty password or no entry both mean "not found"
            Ok(secret) if !secret.is_empty() => {
                debug!(service = %self.service, key = %key, "Credential found");
                Ok(Some(secret))
            }
            Ok(_) | Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => {
                warn!(service = %self.service, key = %key, error = %e, "Failed to read credential");
                Err(e.into())
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entry(key)?.set_password(value).map_err(|e| {
            warn!(service = %self.service, key = %key, error = %e, "Failed to store credential");
            StoreError::from(e)
        })?;

        debug!(service = %self.service, key = %key, "Credential stored");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) => {
                debug!(service = %self.service, key = %key, "Credential deleted");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(service = %self.service, key = %key, error = %e, "Failed to delete credential");
                Err(e.into())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_names() {
        assert_eq!(KeychainStore::new().service(), "remit");
        assert_eq!(KeychainStore::with_service("remit-staging").service(), "remit-staging");
    }

    // Note: Actual keychain tests require platform access and are typically
    // run manually, not as unit tests.
}
