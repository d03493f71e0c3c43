//! Device identity.
//!
//! Every request carries a stable device identifier so the gateway can tie
//! sessions to a device. The identifier is generated lazily on first use
//! and never changes afterwards.
//!
//! The device's country is advisory: it is resolved once through a
//! [`CountryResolver`] (an IP-geolocation lookup in practice), cached, and
//! reported as an empty string whenever it cannot be determined.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::storage::KeyValueStore;

/// Storage key for the device identifier.
pub const DEVICE_ID_KEY: &str = "device_id";

/// Storage key for the cached device country.
pub const DEVICE_COUNTRY_KEY: &str = "device_country";

// ============================================================================
// Country Resolver
// ============================================================================

/// Best-effort source for the device's country code.
#[async_trait]
pub trait CountryResolver: Send + Sync {
    /// Returns a country code, or `None` if the lookup failed.
    ///
    /// Implementations must not panic and should log their own failures.
    async fn resolve_country(&self) -> Option<String>;
}

// ============================================================================
// Device Identity
// ============================================================================

/// Persisted device identifier and country cache.
pub struct DeviceIdentity {
    store: Arc<dyn KeyValueStore>,
    init: Mutex<()>,
}

impl DeviceIdentity {
    /// Creates the identity over a storage backend.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            init: Mutex::new(()),
        }
    }

    /// Returns the device identifier, generating and persisting one on
    /// first use.
    ///
    /// If the backend cannot persist the new identifier it is still
    /// returned; the next call will generate a fresh one.
    pub fn device_id(&self) -> String {
        let _guard = self.init.lock().unwrap_or_else(PoisonError::into_inner);

        match self.store.get(DEVICE_ID_KEY) {
            Ok(Some(id)) if !id.is_empty() => return id,
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Failed to read device id"),
        }

        let id = Uuid::new_v4().to_string();
        if let Err(e) = self.store.set(DEVICE_ID_KEY, &id) {
            warn!(error = %e, "Failed to persist device id");
        }
        debug!(device_id = %id, "Generated device id");
        id
    }

    /// Returns the cached country code, if one was resolved before.
    pub fn cached_country(&self) -> Option<String> {
        self.store
            .get(DEVICE_COUNTRY_KEY)
            .ok()
            .flatten()
            .filter(|c| is_country_code(c))
    }

    /// Returns the device country, resolving and caching it on first use.
    ///
    /// Returns an empty string if the country cannot be determined.
    pub async fn device_country<R: CountryResolver + ?Sized>(&self, resolver: &R) -> String {
        if let Some(country) = self.cached_country() {
            return country;
        }

        let Some(country) = resolver
            .resolve_country()
            .await
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| is_country_code(c))
        else {
            debug!("Device country unavailable");
            return String::new();
        };

        if let Err(e) = self.store.set(DEVICE_COUNTRY_KEY, &country) {
            warn!(error = %e, "Failed to cache device country");
        }
        country
    }
}

impl std::fmt::Debug for DeviceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceIdentity").finish_non_exhaustive()
    }
}

fn is_country_code(value: &str) -> bool {
    value.len() == 2 && value.bytes().all(|b| b.is_ascii_alphabetic())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedResolver {
        answer: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FixedResolver {
        fn new(answer: Option<&'static str>) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CountryResolver for FixedResolver {
        async fn resolve_country(&self) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.map(String::from)
        }
    }

    #[test]
    fn test_device_id_is_stable() {
        let identity = DeviceIdentity::new(Arc::new(MemoryStore::new()));

        let first = identity.device_id();
        let second = identity.device_id();
        assert_eq!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn test_device_id_survives_new_identity_over_same_store() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

        let id = DeviceIdentity::new(Arc::clone(&store)).device_id();
        assert_eq!(DeviceIdentity::new(store).device_id(), id);
    }

    #[tokio::test]
    async fn test_country_is_resolved_once_and_cached() {
        let identity = DeviceIdentity::new(Arc::new(MemoryStore::new()));
        let resolver = FixedResolver::new(Some("mw"));

        assert_eq!(identity.device_country(&resolver).await, "MW");
        assert_eq!(identity.device_country(&resolver).await, "MW");
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(identity.cached_country().as_deref(), Some("MW"));
    }

    #[tokio::test]
    async fn test_country_failure_yields_empty_string() {
        let identity = DeviceIdentity::new(Arc::new(MemoryStore::new()));

        assert_eq!(identity.device_country(&FixedResolver::new(None)).await, "");
        assert_eq!(
            identity.device_country(&FixedResolver::new(Some("Malawi"))).await,
            ""
        );
        assert!(identity.cached_country().is_none());
    }
}
