// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Remit Store
//!
//! Client-side state for the Remit application.
//!
//! This crate provides:
//!
//! - **TokenStore**: Access token and cached user, behind [`remit_core::SessionStore`]
//! - **DeviceIdentity**: Persistent device id and best-effort device country
//! - **AuthContext**: Observable signed-in state
//! - **PreferencesStore**: UI preference flags with persistence
//! - **Config**: Gateway location and client tuning
//! - **Storage backends**: JSON file, system keychain, in-memory
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use remit_store::{AuthContext, FileStore, TokenStore, default_storage_path};
//!
//! let storage = Arc::new(FileStore::open(default_storage_path()));
//! let tokens = TokenStore::new(storage);
//!
//! let auth = AuthContext::new();
//! auth.hydrate(&tokens);
//!
//! let mut rx = auth.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("Signed in: {}", rx.borrow().is_authenticated());
//! }
//! ```

pub mod auth_context;
pub mod config;
pub mod device;
pub mod error;
pub mod keychain;
pub mod persistence;
pub mod preferences;
pub mod storage;
pub mod token_store;

pub use auth_context::{AuthContext, AuthState};
pub use config::{Config, TokenBackend};
pub use device::{CountryResolver, DeviceIdentity};
pub use error::StoreError;
pub use keychain::KeychainStore;
pub use persistence::{
    default_config_dir, default_config_path, default_data_dir, default_preferences_path,
    default_storage_path, load_json, load_json_or_default, save_json,
};
pub use preferences::{NotificationPreferences, Preferences, PreferencesStore, ThemeMode};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use token_store::TokenStore;
