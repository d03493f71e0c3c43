//! `/forex` endpoints.

use remit_core::{ForexCalculateRequest, ForexQuote, ForexRate, RatePoint};

use super::{segment, with_query};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::RequestOptions;

/// Filters for [`ForexApi::history`].
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    /// Source currency.
    pub from: Option<String>,
    /// Target currency.
    pub to: Option<String>,
    /// Number of days back.
    pub days: Option<u32>,
}

/// Forex endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ForexApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ForexApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /forex/calculate`.
    pub async fn calculate(&self, request: &ForexCalculateRequest) -> Result<ForexQuote, ApiError> {
        self.client.post_json("/forex/calculate", request).await
    }

    /// `GET /forex/rate/{from}/{to}`.
    pub async fn rate(&self, from: &str, to: &str) -> Result<ForexRate, ApiError> {
        let path = format!(
            "/forex/rate/{}/{}",
            segment(&from.to_ascii_uppercase()),
            segment(&to.to_ascii_uppercase())
        );
        self.client.get_json(&path).await
    }

    /// `GET /forex/history`.
    pub async fn history(&self, query: &HistoryQuery) -> Result<Vec<RatePoint>, ApiError> {
        let days = query.days.map(|d| d.to_string());
        let path = with_query(
            "/forex/history",
            &[
                ("from", query.from.as_deref()),
                ("to", query.to.as_deref()),
                ("days", days.as_deref()),
            ],
        );

        self.client
            .request(&path, RequestOptions::get())
            .await?
            .decode_list("history")
    }
}
