//! Trait definitions for Remit.
//!
//! This module defines the storage seam shared by the API client and the
//! auth context.

use crate::models::RawUser;

/// Persistent holder of the access token and cached raw user.
///
/// The API client reads the token when assembling headers and clears both
/// values when the gateway reports an expired session. Reads and writes are
/// synchronous and atomic per call; storage failures surface as absent data
/// rather than errors.
pub trait SessionStore: Send + Sync {
    /// Returns the stored access token.
    fn token(&self) -> Option<String>;

    /// Stores the access token, or removes it when `None`.
    fn set_token(&self, token: Option<&str>);

    /// Returns the cached raw user.
    ///
    /// A corrupted cache entry reads as `None`.
    fn user(&self) -> Option<RawUser>;

    /// Caches the raw user, or removes it when `None`.
    fn set_user(&self, user: Option<&RawUser>);

    /// Removes both the token and the cached user.
    fn clear(&self) {
        self.set_token(None);
        self.set_user(None);
    }

    /// Returns true if a non-empty token is stored.
    fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.is_empty())
    }
}
