//! Wiring shared by the commands that talk to the gateway.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use remit_core::{SessionStore, UserProfile};
use remit_fetch::{ApiClient, ClientConfig, IpGeolocationResolver, session};
use remit_store::{
    AuthContext, Config, DeviceIdentity, FileStore, KeyValueStore, KeychainStore, TokenBackend,
    TokenStore, default_storage_path,
};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::Cli;

/// Returned by commands that need a signed-in user when there is none.
#[derive(Debug)]
pub struct NotSignedIn;

impl fmt::Display for NotSignedIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Not signed in")
    }
}

impl std::error::Error for NotSignedIn {}

/// Loads the configuration and applies the `--gateway` flag.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load()?;
    if let Some(gateway) = &cli.gateway {
        config.set("gateway_url", gateway)?;
    }
    Ok(config)
}

/// Everything a gateway command needs.
pub struct App {
    /// Effective configuration.
    pub config: Config,
    /// Gateway client.
    pub client: ApiClient,
    /// Signed-in state.
    pub auth: Arc<AuthContext>,
    /// Device identifier and country cache.
    pub device: DeviceIdentity,
    expiry: JoinHandle<()>,
}

impl App {
    /// Opens storage, restores the session, and builds the client.
    pub fn init(cli: &Cli) -> Result<Self> {
        let config = load_config(cli)?;

        let values: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(default_storage_path()));
        let store = match config.token_backend {
            TokenBackend::File => TokenStore::new(Arc::clone(&values)),
            TokenBackend::Keychain => {
                TokenStore::with_secret_store(Arc::clone(&values), Arc::new(KeychainStore::new()))
            }
        };
        let session_store: Arc<dyn SessionStore> = Arc::new(store);
        let device = DeviceIdentity::new(values);

        let client = ApiClient::builder(ClientConfig::from(&config))
            .session_store(Arc::clone(&session_store))
            .device_id(device.device_id())
            .build()?;

        let auth = Arc::new(AuthContext::new());
        let restored = auth.hydrate(session_store.as_ref());
        debug!(restored = restored, gateway = %config.gateway_url, "App initialized");

        let expiry = session::watch_expiry(client.subscribe(), Arc::clone(&auth));

        Ok(Self {
            config,
            client,
            auth,
            device,
            expiry,
        })
    }

    /// Returns the signed-in profile.
    pub fn require_user(&self) -> Result<UserProfile> {
        self.auth.user().ok_or_else(|| NotSignedIn.into())
    }

    /// Returns the geolocation resolver from configuration.
    pub fn country_resolver(&self) -> IpGeolocationResolver {
        IpGeolocationResolver::new(self.config.geolocation_url.clone())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.expiry.abort();
    }
}
