//! Process-wide authentication state.
//!
//! [`AuthContext`] holds the derived profile of the signed-in user and
//! publishes every change on a watch channel. State changes only on
//! hydration at startup or through the explicit setter used by the
//! login/logout flows; there is no polling.

use remit_core::{SessionStore, UserProfile};
use tokio::sync::watch;
use tracing::{debug, info};

// ============================================================================
// Auth State
// ============================================================================

/// Authentication state.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    /// No user is signed in.
    #[default]
    Unauthenticated,
    /// A user is signed in.
    Authenticated(UserProfile),
}

impl AuthState {
    /// Returns the profile if authenticated.
    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            AuthState::Authenticated(profile) => Some(profile),
            AuthState::Unauthenticated => None,
        }
    }

    /// Returns true if a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

// ============================================================================
// Auth Context
// ============================================================================

/// Observable authentication state.
#[derive(Debug)]
pub struct AuthContext {
    state: watch::Sender<AuthState>,
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthContext {
    /// Creates an unauthenticated context.
    pub fn new() -> Self {
        let (state, _) = watch::channel(AuthState::Unauthenticated);
        Self { state }
    }

    /// Restores state from storage.
    ///
    /// Publishes [`AuthState::Authenticated`] only if both a token and a
    /// cached user exist. Returns whether the context is now authenticated.
    pub fn hydrate(&self, store: &dyn SessionStore) -> bool {
        if !store.is_authenticated() {
            debug!("No stored token, staying unauthenticated");
            return false;
        }

        let Some(raw) = store.user() else {
            debug!("Token present but no cached user, staying unauthenticated");
            return false;
        };

        let profile = UserProfile::from_raw(&raw);
        info!(label = %profile.account_label, "Restored session");
        self.state.send_replace(AuthState::Authenticated(profile));
        true
    }

    /// Sets the current user; `None` signs out.
    pub fn set_user(&self, profile: Option<UserProfile>) {
        let next = match profile {
            Some(profile) => AuthState::Authenticated(profile),
            None => AuthState::Unauthenticated,
        };

        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    /// Resets to unauthenticated after the gateway rejected the session.
    pub fn expire(&self) {
        if self.is_authenticated() {
            info!("Session expired");
        }
        self.set_user(None);
    }

    /// Returns a snapshot of the current state.
    pub fn current(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Returns the signed-in profile.
    pub fn user(&self) -> Option<UserProfile> {
        self.state.borrow().user().cloned()
    }

    /// Returns true if a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}

// ============================================================================
// Tests
// ============================================================================
