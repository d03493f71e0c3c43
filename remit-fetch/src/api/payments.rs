//! `/payments` endpoints.

use remit_core::{Payment, PaymentRequest, Receipt};
use uuid::Uuid;

use super::segment;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::RequestOptions;

/// A reviewed payment ready to submit.
///
/// The idempotency key is fixed when the draft is created, so submitting
/// the same draft again (after a timeout, say) cannot move money twice.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    request: PaymentRequest,
    idempotency_key: String,
}

impl PaymentDraft {
    /// Creates a draft with a fresh idempotency key.
    pub fn new(request: PaymentRequest) -> Self {
        Self::with_key(request, Uuid::new_v4().to_string())
    }

    /// Creates a draft with a known key, e.g. one restored from storage.
    pub fn with_key(request: PaymentRequest, idempotency_key: impl Into<String>) -> Self {
        Self {
            request,
            idempotency_key: idempotency_key.into(),
        }
    }

    /// Returns the payment payload.
    pub fn request(&self) -> &PaymentRequest {
        &self.request
    }

    /// Returns the idempotency key.
    pub fn idempotency_key(&self) -> &str {
        &self.idempotency_key
    }
}

/// Payment endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PaymentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PaymentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /payments`.
    pub async fn list(&self) -> Result<Vec<Payment>, ApiError> {
        self.client
            .request("/payments", RequestOptions::get())
            .await?
            .decode_list("payments")
    }

    /// `POST /payments/initiate`: asks the engine to price and hold a
    /// transfer for review.
    pub async fn initiate(&self, request: &PaymentRequest) -> Result<Payment, ApiError> {
        self.client.post_json("/payments/initiate", request).await
    }

    /// `POST /payments` with the draft's idempotency key.
    pub async fn submit(&self, draft: &PaymentDraft) -> Result<Payment, ApiError> {
        let options = RequestOptions::post()
            .json(draft.request())?
            .idempotency_key(draft.idempotency_key())?;
        self.client.send("/payments", options).await
    }

    /// `GET /payments/{id}/receipt`.
    pub async fn receipt(&self, id: &str) -> Result<Receipt, ApiError> {
        self.client
            .get_json(&format!("/payments/{}/receipt", segment(id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PaymentRequest {
        PaymentRequest {
            from_wallet_id: "w1".into(),
            to_address: "CN-abc".into(),
            amount: 25_000.0,
            currency: "MWK".into(),
            target_currency: Some("CNY".into()),
            note: None,
        }
    }

    #[test]
    fn test_draft_key_is_stable() {
        let draft = PaymentDraft::new(request());
        let copy = draft.clone();
        assert_eq!(draft.idempotency_key(), copy.idempotency_key());
        assert!(Uuid::parse_str(draft.idempotency_key()).is_ok());
    }

    #[test]
    fn test_drafts_get_distinct_keys() {
        assert_ne!(
            PaymentDraft::new(request()).idempotency_key(),
            PaymentDraft::new(request()).idempotency_key()
        );
    }
}
