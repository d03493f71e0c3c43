// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

//! # Remit Fetch
//!
//! Gateway API client for the Remit wallet.
//!
//! ## Request Pipeline
//!
//! Every call goes through [`ApiClient::request`]:
//!
//! - [`paths`] - URL joining and the open-auth allowlist
//! - [`request`] - Method, caller headers, and body
//! - [`retry::RetryPolicy`] - One retry for safe or keyed requests
//! - [`transport::Transport`] - The network seam (reqwest in production)
//! - [`response::ResponseBody`] - JSON or text, plus error messages
//!
//! A 401 on a protected path clears the injected
//! [`remit_core::SessionStore`] and publishes a [`SessionEvent::Expired`].
//!
//! ## Endpoints
//!
//! The [`api`] module wraps the gateway resources; [`session`] holds the
//! login/logout flows.
//!
//! ## Example
//!
//! ```ignore
//! use remit_fetch::{ApiClient, ClientConfig};
//!
//! let client = ApiClient::builder(ClientConfig::new("https://gw.example.com"))
//!     .session_store(store)
//!     .device_id(identity.device_id())
//!     .build()?;
//!
//! let wallets = client.wallets().list().await?;
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod geo;
pub mod paths;
pub mod request;
pub mod response;
pub mod retry;
pub mod session;
pub mod transport;

pub use client::{ApiClient, ApiClientBuilder};
pub use config::ClientConfig;
pub use error::{ApiError, TransportError};
pub use geo::IpGeolocationResolver;
pub use request::{MultipartForm, RequestBody, RequestOptions};
pub use response::ResponseBody;
pub use retry::RetryPolicy;
pub use session::SessionEvent;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

pub use reqwest::header;
pub use reqwest::{Method, StatusCode};

#[cfg(test)]
mod client_tests;
