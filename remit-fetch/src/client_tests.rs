//! Request pipeline tests against a scripted transport.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use remit_core::{RawUser, SessionStore};
use remit_store::TokenStore;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::Instant;
use url::Url;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};
use crate::request::{MultipartForm, RequestOptions};
use crate::response::ResponseBody;
use crate::session::SessionEvent;
use crate::transport::{HttpRequest, HttpResponse, Transport};

// ============================================================================
// Scripted Transport
// ============================================================================

enum Step {
    Respond(HttpResponse),
    Fail(&'static str),
}

#[derive(Default)]
struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    sent: Mutex<Vec<HttpRequest>>,
    sent_at: Mutex<Vec<Instant>>,
    cookies: HashMap<String, String>,
}

impl ScriptedTransport {
    fn new() -> Self {
        Self::default()
    }

    fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    fn respond(&self, response: HttpResponse) {
        self.steps.lock().unwrap().push_back(Step::Respond(response));
    }

    fn fail(&self, reason: &'static str) {
        self.steps.lock().unwrap().push_back(Step::Fail(reason));
    }

    fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn sent_at(&self) -> Vec<Instant> {
        self.sent_at.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request);
        self.sent_at.lock().unwrap().push(Instant::now());
        match self.steps.lock().unwrap().pop_front() {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(reason)) => Err(TransportError::Connect(reason.into())),
            None => Err(TransportError::Connect("script exhausted".into())),
        }
    }

    fn cookie(&self, _url: &Url, name: &str) -> Option<String> {
        self.cookies.get(name).cloned()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn json_response(status: u16, body: &Value) -> HttpResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
    HttpResponse::new(StatusCode::from_u16(status).unwrap(), headers, body.to_string())
}

fn text_response(status: u16, body: &str) -> HttpResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    HttpResponse::new(StatusCode::from_u16(status).unwrap(), headers, body)
}

struct Harness {
    client: ApiClient,
    transport: Arc<ScriptedTransport>,
    store: Arc<TokenStore>,
}

fn harness_with(transport: ScriptedTransport) -> Harness {
    harness_with_backoff(transport, Duration::from_millis(1))
}

fn harness_with_backoff(transport: ScriptedTransport, backoff: Duration) -> Harness {
    let transport = Arc::new(transport);
    let store = Arc::new(TokenStore::in_memory());
    store.set_token(Some("tok-1"));
    store.set_user(Some(&RawUser::named("Chisomo")));

    let config = ClientConfig::new("https://gw.test/").with_retry_backoff(backoff);
    let client = ApiClient::builder(config)
        .transport(transport.clone())
        .session_store(store.clone())
        .device_id("device-1")
        .build()
        .unwrap();

    Harness {
        client,
        transport,
        store,
    }
}

fn harness() -> Harness {
    harness_with(ScriptedTransport::new())
}

fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

// ============================================================================
// Headers
// ============================================================================

#[tokio::test]
async fn test_protected_post_gets_auth_and_idempotency_key() {
    let h = harness();
    h.transport.respond(json_response(201, &json!({"id": "p1"})));

    h.client
        .request("/payments", RequestOptions::post().json(&json!({"amount": 5})).unwrap())
        .await
        .unwrap();

    let sent = h.transport.sent();
    assert_eq!(sent.len(), 1);
    let request = &sent[0];
    assert_eq!(request.url.as_str(), "https://gw.test/api/v1/payments");
    assert_eq!(header(request, "authorization"), Some("Bearer tok-1"));
    assert_eq!(header(request, "x-device-id"), Some("device-1"));
    assert_eq!(header(request, "content-type"), Some("application/json"));

    let key = header(request, "idempotency-key").unwrap();
    assert!(Uuid::parse_str(key).is_ok());
}

#[tokio::test]
async fn test_open_auth_path_has_no_bearer_or_key() {
    let h = harness();
    h.transport.respond(json_response(200, &json!({"token": "new"})));

    h.client
        .request(
            "/auth/login",
            RequestOptions::post().json(&json!({"email": "a@b.c"})).unwrap(),
        )
        .await
        .unwrap();

    let request = &h.transport.sent()[0];
    assert_eq!(header(request, "authorization"), None);
    assert_eq!(header(request, "idempotency-key"), None);
    assert_eq!(header(request, "x-device-id"), Some("device-1"));
}

#[tokio::test]
async fn test_get_has_no_idempotency_key_or_csrf() {
    let h = harness_with(ScriptedTransport::new().with_cookie("csrf_token", "c-1"));
    h.transport.respond(json_response(200, &json!([])));
    h.transport.respond(json_response(200, &json!({})));

    h.client.request("/wallets", RequestOptions::get()).await.unwrap();
    h.client
        .request("/wallets/w1/deposit", RequestOptions::post().json(&json!({"amount": 1})).unwrap())
        .await
        .unwrap();

    let sent = h.transport.sent();
    assert_eq!(header(&sent[0], "idempotency-key"), None);
    assert_eq!(header(&sent[0], "x-csrf-token"), None);
    assert_eq!(header(&sent[1], "x-csrf-token"), Some("c-1"));
}

#[tokio::test]
async fn test_caller_headers_are_not_overwritten() {
    let h = harness();
    h.transport.respond(json_response(200, &json!({})));

    let options = RequestOptions::put()
        .json(&json!({}))
        .unwrap()
        .header("authorization", "Bearer caller")
        .unwrap()
        .idempotency_key("caller-key")
        .unwrap()
        .header("content-type", "application/merge-patch+json")
        .unwrap();
    h.client.request("/users/me", options).await.unwrap();

    let request = &h.transport.sent()[0];
    assert_eq!(header(request, "authorization"), Some("Bearer caller"));
    assert_eq!(header(request, "idempotency-key"), Some("caller-key"));
    assert_eq!(header(request, "content-type"), Some("application/merge-patch+json"));
}

#[tokio::test]
async fn test_no_bearer_without_token() {
    let h = harness();
    h.store.set_token(None);
    h.transport.respond(json_response(200, &json!({})));

    h.client.request("/forex/history", RequestOptions::get()).await.unwrap();
    assert_eq!(header(&h.transport.sent()[0], "authorization"), None);
}

#[tokio::test]
async fn test_multipart_leaves_content_type_to_transport() {
    let h = harness();
    h.transport.respond(json_response(200, &json!({"status": "received"})));

    let form = MultipartForm::new().text("document_type", "passport");
    let _: Value = h
        .client
        .post_multipart("/compliance/kyc/submit", form)
        .await
        .unwrap();

    let request = &h.transport.sent()[0];
    assert_eq!(header(request, "content-type"), None);
    assert!(request.body.is_multipart());
}

#[tokio::test]
async fn test_query_string_is_preserved() {
    let h = harness();
    h.transport.respond(json_response(200, &json!({})));

    h.client
        .request("wallets/lookup?address=CN-1", RequestOptions::get())
        .await
        .unwrap();
    assert_eq!(
        h.transport.sent()[0].url.as_str(),
        "https://gw.test/api/v1/wallets/lookup?address=CN-1"
    );
}

// ============================================================================
// Retry
// ============================================================================

#[tokio::test]
async fn test_get_is_retried_once_then_connectivity_error() {
    let h = harness();
    h.transport.fail("connection refused");
    h.transport.fail("connection refused");

    let err = h.client.request("/wallets", RequestOptions::get()).await.unwrap_err();

    assert_eq!(h.transport.sent().len(), 2);
    match err {
        ApiError::Connectivity { url, attempts, .. } => {
            assert_eq!(attempts, 2);
            assert!(url.ends_with("/api/v1/wallets"));
        }
        other => panic!("expected connectivity error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_recovers_on_retry() {
    let h = harness();
    h.transport.fail("reset");
    h.transport.respond(json_response(200, &json!([{"id": "w1", "currency": "MWK"}])));

    let body = h.client.request("/wallets", RequestOptions::get()).await.unwrap();
    assert_eq!(body.as_json().unwrap()[0]["id"], "w1");
    assert_eq!(h.transport.sent().len(), 2);
}

#[tokio::test]
async fn test_open_auth_post_is_never_retried() {
    let h = harness();
    h.transport.fail("connection refused");

    let err = h
        .client
        .request(
            "/auth/register",
            RequestOptions::post().json(&json!({"email": "a@b.c"})).unwrap(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }));
    assert_eq!(h.transport.sent().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retry_waits_for_backoff() {
    let h = harness_with_backoff(ScriptedTransport::new(), Duration::from_secs(1));
    h.transport.fail("reset");
    h.transport.respond(json_response(200, &json!([])));

    h.client.request("/wallets", RequestOptions::get()).await.unwrap();

    let sent_at = h.transport.sent_at();
    assert_eq!(sent_at.len(), 2);
    assert!(sent_at[1].duration_since(sent_at[0]) >= Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_non_retryable_failure_returns_without_sleeping() {
    let h = harness_with_backoff(ScriptedTransport::new(), Duration::from_secs(1));
    h.transport.fail("connection refused");

    let started = Instant::now();
    let err = h
        .client
        .request("/auth/login", RequestOptions::post().json(&json!({})).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport { .. }));
    assert!(!err.is_timeout());
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(h.transport.sent().len(), 1);
}

#[tokio::test]
async fn test_retry_reuses_idempotency_key() {
    let h = harness();
    h.transport.fail("timeout");
    h.transport.respond(json_response(201, &json!({"id": "p1"})));

    h.client
        .request("/payments", RequestOptions::post().json(&json!({"amount": 5})).unwrap())
        .await
        .unwrap();

    let sent = h.transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(
        header(&sent[0], "idempotency-key"),
        header(&sent[1], "idempotency-key")
    );
}

#[tokio::test]
async fn test_server_errors_are_not_retried() {
    let h = harness();
    h.transport.respond(json_response(503, &json!({"message": "Maintenance"})));

    let err = h.client.request("/wallets", RequestOptions::get()).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "Maintenance");
    assert_eq!(h.transport.sent().len(), 1);
}

// ============================================================================
// Responses
// ============================================================================

#[tokio::test]
async fn test_text_response() {
    let h = harness();
    h.transport.respond(text_response(200, "OK"));

    let body = h.client.request("/health", RequestOptions::get()).await.unwrap();
    assert_eq!(body, ResponseBody::Text("OK".into()));
}

#[tokio::test]
async fn test_error_field_becomes_message() {
    let h = harness();
    h.transport
        .respond(json_response(400, &json!({"error": "Insufficient balance", "code": "E_FUNDS"})));

    let err = h
        .client
        .request("/payments", RequestOptions::post().json(&json!({})).unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Insufficient balance");
    assert_eq!(
        err.data().and_then(ResponseBody::as_json).unwrap()["code"],
        "E_FUNDS"
    );
}

#[tokio::test]
async fn test_decode_mismatch() {
    let h = harness();
    h.transport.respond(json_response(200, &Value::Null));

    let err = h
        .client
        .get_json::<remit_core::Wallet>("/wallets/w1")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

// ============================================================================
// Session Expiry
// ============================================================================

#[tokio::test]
async fn test_unauthorized_clears_session_and_emits_once() {
    let h = harness();
    let mut events = h.client.subscribe();
    h.transport.respond(json_response(401, &json!({"message": "Token expired"})));

    let err = h.client.request("/wallets", RequestOptions::get()).await.unwrap_err();

    assert!(err.is_session_expired());
    assert_eq!(h.store.token(), None);
    assert!(h.store.user().is_none());
    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::Expired {
            path: "/wallets".into()
        }
    );
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_unauthorized_on_login_keeps_session_quiet() {
    let h = harness();
    let mut events = h.client.subscribe();
    h.transport.respond(json_response(401, &json!({"error": "Invalid credentials"})));

    let err = h
        .client
        .request("/auth/login", RequestOptions::post().json(&json!({})).unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(err.status(), Some(401));
    assert!(!err.is_session_expired());
    assert_eq!(h.store.token().as_deref(), Some("tok-1"));
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}
