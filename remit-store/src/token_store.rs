//! Access token and cached profile storage.
//!
//! [`TokenStore`] is the single owner of the bearer token and the cached raw
//! user. It implements [`SessionStore`] so the API client and auth context
//! receive it by injection and tests can hand them an in-memory store.
//!
//! Storage failures never propagate: a failed read is "no value", a failed
//! write is logged and dropped.

use std::sync::Arc;

use remit_core::{RawUser, SessionStore};
use tracing::{debug, warn};

use crate::storage::{KeyValueStore, MemoryStore};

// ============================================================================
// Constants
// ============================================================================

/// Storage key for the access token.
pub const TOKEN_KEY: &str = "access_token";

/// Storage key for the cached raw user.
pub const USER_KEY: &str = "user";

// ============================================================================
// Token Store
// ============================================================================

/// Token and profile store over pluggable backends.
///
/// The token may live in a separate backend (typically the keychain) from
/// the profile blob.
#[derive(Clone)]
pub struct TokenStore {
    values: Arc<dyn KeyValueStore>,
    secrets: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    /// Creates a store keeping token and profile in the same backend.
    pub fn new(values: Arc<dyn KeyValueStore>) -> Self {
        Self {
            secrets: Arc::clone(&values),
            values,
        }
    }

    /// Creates a store keeping the token in `secrets`.
    pub fn with_secret_store(
        values: Arc<dyn KeyValueStore>,
        secrets: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self { values, secrets }
    }

    /// Creates a store backed by process memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    fn read(store: &dyn KeyValueStore, key: &str) -> Option<String> {
        store.get(key).unwrap_or_else(|e| {
            warn!(key = %key, error = %e, "Failed to read from storage");
            None
        })
    }

    fn write(store: &dyn KeyValueStore, key: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => store.set(key, value),
            None => store.remove(key),
        };

        if let Err(e) = result {
            warn!(key = %key, error = %e, "Failed to write to storage");
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

impl SessionStore for TokenStore {
    fn token(&self) -> Option<String> {
        Self::read(self.secrets.as_ref(), TOKEN_KEY)
    }

    fn set_token(&self, token: Option<&str>) {
        debug!(present = token.is_some(), "Updating access token");
        Self::write(self.secrets.as_ref(), TOKEN_KEY, token);
    }

    fn user(&self) -> Option<RawUser> {
        let raw = Self::read(self.values.as_ref(), USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Cached user is corrupted, treating as absent");
                None
            }
        }
    }

    fn set_user(&self, user: Option<&RawUser>) {
        let Some(user) = user else {
            Self::write(self.values.as_ref(), USER_KEY, None);
            return;
        };

        match serde_json::to_string(user) {
            Ok(json) => Self::write(self.values.as_ref(), USER_KEY, Some(&json)),
            Err(e) => warn!(error = %e, "Failed to serialize user"),
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
    fn test_token_roundtrip() {
        let store = TokenStore::in_memory();

        store.set_token(Some("abc"));
        assert_eq!(store.token().as_deref(), Some("abc"));

        store.set_token(None);
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_user_roundtrip() {
        let store = TokenStore::in_memory();

        store.set_user(Some(&RawUser::named("X")));
        assert_eq!(store.user().unwrap().name.as_deref(), Some("X"));

        store.set_user(None);
        assert!(store.user().is_none());
    }

    #[test]
    fn test_corrupted_user_reads_as_absent() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(USER_KEY, "{\"name\":").unwrap();

        let store = TokenStore::new(backend);
        assert!(store.user().is_none());
    }

    #[test]
    fn test_is_authenticated_requires_non_empty_token() {
        let store = TokenStore::in_memory();
        assert!(!store.is_authenticated());

        store.set_token(Some(""));
        assert!(!store.is_authenticated());

        store.set_token(Some("t"));
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_secret_store_holds_token_only() {
        let values = Arc::new(MemoryStore::new());
        let secrets = Arc::new(MemoryStore::new());
        let store = TokenStore::with_secret_store(values.clone(), secrets.clone());

        store.set_token(Some("t"));
        store.set_user(Some(&RawUser::named("Y")));

        assert_eq!(secrets.get(TOKEN_KEY).unwrap().as_deref(), Some("t"));
        assert_eq!(values.get(TOKEN_KEY).unwrap(), None);
        assert!(values.get(USER_KEY).unwrap().is_some());

        store.clear();
        assert!(secrets.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn test_failed_token_write_reads_back_as_absent() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let store = TokenStore::new(Arc::new(crate::storage::FileStore::open(
            blocker.join("storage.json"),
        )));
        store.set_token(Some("t"));

        assert_eq!(store.token(), None);
        assert!(!store.is_authenticated());
    }
}
