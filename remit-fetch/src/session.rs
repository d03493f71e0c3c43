//! Session lifecycle: login, logout, profile refresh, and expiry.

use std::sync::Arc;

use remit_core::{LoginRequest, RawUser, SessionStore, UserProfile};
use remit_store::AuthContext;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Route of the login screen.
pub const LOGIN_ROUTE: &str = "/login";

/// Route the shell navigates to after the session expired.
pub const EXPIRED_REDIRECT: &str = "/login?expired=true";

// ============================================================================
// Session Events
// ============================================================================

/// Signals published by the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The gateway answered 401 on a protected path. Stored credentials
    /// have already been cleared.
    Expired {
        /// Path of the rejected request.
        path: String,
    },
}

impl SessionEvent {
    /// Returns where the shell should navigate.
    pub fn redirect_target(&self) -> &'static str {
        match self {
            SessionEvent::Expired { .. } => EXPIRED_REDIRECT,
        }
    }

    /// Returns the navigation target from `current_route`, or `None` if
    /// the shell is already on the login screen.
    pub fn redirect_from(&self, current_route: &str) -> Option<&'static str> {
        let route = current_route.split(['?', '#']).next().unwrap_or_default();
        if route.trim_end_matches('/') == LOGIN_ROUTE {
            None
        } else {
            Some(self.redirect_target())
        }
    }
}

/// Resets `auth` whenever the client reports an expired session.
///
/// The task ends when the client (and with it the event channel) is
/// dropped.
pub fn watch_expiry(
    mut events: broadcast::Receiver<SessionEvent>,
    auth: Arc<AuthContext>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::Expired { path }) => {
                    debug!(path = %path, "Expiring auth context");
                    auth.expire();
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped = skipped, "Missed session events");
                    auth.expire();
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

// ============================================================================
// Flows
// ============================================================================

/// Signs in, stores token and user, and publishes the profile.
///
/// If the login response omits the user it is fetched from `/users/me`.
///
/// # Errors
///
/// Returns the gateway error; nothing is stored on failure.
#[instrument(skip_all)]
pub async fn login(
    client: &ApiClient,
    auth: &AuthContext,
    credentials: &LoginRequest,
) -> Result<UserProfile, ApiError> {
    let response = client.auth().login(credentials).await?;
    let Some(token) = response.token() else {
        return Err(ApiError::Decode("login response carried no token".into()));
    };

    let store = client.session_store();
    store.set_token(Some(token));

    let raw = match response.user {
        Some(user) => user,
        None => match client.users().me().await {
            Ok(user) => user,
            Err(e) => {
                store.clear();
                return Err(e);
            }
        },
    };

    let profile = publish(client, auth, &raw);
    info!(label = %profile.account_label, "Signed in");
    Ok(profile)
}

/// Clears stored credentials and signs the context out.
pub fn logout(client: &ApiClient, auth: &AuthContext) {
    client.session_store().clear();
    auth.set_user(None);
    info!("Signed out");
}

/// Re-fetches the current user and republishes the profile.
///
/// # Errors
///
/// Returns the gateway error. A 401 has already cleared the session.
pub async fn refresh_profile(client: &ApiClient, auth: &AuthContext) -> Result<UserProfile, ApiError> {
    let raw = client.users().me().await?;
    Ok(publish(client, auth, &raw))
}

fn publish(client: &ApiClient, auth: &AuthContext, raw: &RawUser) -> UserProfile {
    client.session_store().set_user(Some(raw));
    let profile = UserProfile::from_raw(raw);
    auth.set_user(Some(profile.clone()));
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expired() -> SessionEvent {
        SessionEvent::Expired {
            path: "/wallets".into(),
        }
    }

    #[test]
    fn test_redirect_target() {
        assert_eq!(expired().redirect_target(), "/login?expired=true");
    }

    #[test]
    fn test_no_redirect_when_already_on_login() {
        assert_eq!(expired().redirect_from("/login"), None);
        assert_eq!(expired().redirect_from("/login?expired=true"), None);
        assert_eq!(expired().redirect_from("/wallets"), Some(EXPIRED_REDIRECT));
        assert_eq!(expired().redirect_from("/login-help"), Some(EXPIRED_REDIRECT));
    }

    #[tokio::test]
    async fn test_watch_expiry_resets_context() {
        let (tx, rx) = broadcast::channel(4);
        let auth = Arc::new(AuthContext::new());
        auth.set_user(Some(UserProfile::from_raw(&RawUser::named("Ada"))));

        let handle = watch_expiry(rx, Arc::clone(&auth));
        let mut state = auth.subscribe();

        tx.send(expired()).unwrap();
        state.changed().await.unwrap();
        assert!(!auth.is_authenticated());

        drop(tx);
        handle.await.unwrap();
    }
}
