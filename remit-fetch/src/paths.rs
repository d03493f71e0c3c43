//! Path helpers: URL joining and the open-auth allowlist.

/// Paths reachable without a bearer token.
///
/// Matched by prefix, so `/auth/password/reset` also covers
/// `/auth/password/reset/confirm` and `/auth/verify` covers
/// `/auth/verify/resend`.
pub const OPEN_AUTH_PATHS: &[&str] = &[
    "/auth/login",
    "/auth/register",
    "/auth/password/reset",
    "/auth/verify",
    "/auth/magic-link",
];

/// Joins a base URL and a path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Returns true if `path` is in the open-auth allowlist.
///
/// The query string and fragment are ignored and a missing leading slash
/// is tolerated.
pub fn is_open_auth_path(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let normalized = format!("/{}", path.trim_start_matches('/'));
    OPEN_AUTH_PATHS
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://a.b/api/v1/", "/wallets"), "https://a.b/api/v1/wallets");
        assert_eq!(join_url("https://a.b/api/v1", "wallets"), "https://a.b/api/v1/wallets");
        assert_eq!(
            join_url("https://a.b/api/v1", "/wallets/search?q=li"),
            "https://a.b/api/v1/wallets/search?q=li"
        );
    }

    #[test]
    fn test_open_auth_paths() {
        for path in [
            "/auth/login",
            "auth/register",
            "/auth/password/reset",
            "/auth/password/reset/confirm",
            "/auth/verify",
            "/auth/verify/resend",
            "/auth/magic-link?next=/wallets",
        ] {
            assert!(is_open_auth_path(path), "{path} should be open");
        }
    }

    #[test]
    fn test_protected_paths() {
        for path in [
            "/wallets",
            "/auth/totp/verify",
            "/auth/totp/status",
            "/users/me",
            "/payments?redirect=/auth/login",
        ] {
            assert!(!is_open_auth_path(path), "{path} should require auth");
        }
    }
}
