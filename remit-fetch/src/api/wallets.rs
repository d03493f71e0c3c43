//! `/wallets` endpoints.

use remit_core::{DepositRequest, Wallet, WalletLookup};

use super::{segment, with_query};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::RequestOptions;

/// Wallet endpoints.
#[derive(Debug, Clone, Copy)]
pub struct WalletsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> WalletsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /wallets`.
    pub async fn list(&self) -> Result<Vec<Wallet>, ApiError> {
        self.client
            .request("/wallets", RequestOptions::get())
            .await?
            .decode_list("wallets")
    }

    /// `GET /wallets/{id}`.
    pub async fn get(&self, id: &str) -> Result<Wallet, ApiError> {
        self.client.get_json(&format!("/wallets/{}", segment(id))).await
    }

    /// `POST /wallets/{id}/deposit`.
    pub async fn deposit(&self, id: &str, request: &DepositRequest) -> Result<Wallet, ApiError> {
        self.client
            .post_json(&format!("/wallets/{}/deposit", segment(id)), request)
            .await
    }

    /// `GET /wallets/lookup?address=`.
    pub async fn lookup(&self, address: &str) -> Result<WalletLookup, ApiError> {
        self.client
            .get_json(&with_query("/wallets/lookup", &[("address", Some(address))]))
            .await
    }

    /// `GET /wallets/search?q=`.
    pub async fn search(&self, query: &str) -> Result<Vec<WalletLookup>, ApiError> {
        self.client
            .request(
                &with_query("/wallets/search", &[("q", Some(query))]),
                RequestOptions::get(),
            )
            .await?
            .decode_list("results")
    }
}
