//! Login, logout, and expiry against a scripted gateway.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use remit_core::{AccountLabel, LoginRequest, SessionStore};
use remit_fetch::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use remit_fetch::session::{self, EXPIRED_REDIRECT};
use remit_fetch::{
    ApiClient, ClientConfig, HttpRequest, HttpResponse, RequestOptions, StatusCode, Transport,
    TransportError,
};
use remit_store::{AuthContext, FileStore, TokenStore};
use serde_json::{Value, json};
use tempfile::TempDir;

#[derive(Default)]
struct Gateway {
    replies: Mutex<VecDeque<(u16, Value)>>,
    paths: Mutex<Vec<String>>,
}

impl Gateway {
    fn reply(&self, status: u16, body: Value) {
        self.replies.lock().unwrap().push_back((status, body));
    }

    fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for Gateway {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.paths.lock().unwrap().push(request.url.path().to_string());
        let Some((status, body)) = self.replies.lock().unwrap().pop_front() else {
            return Err(TransportError::Connect("no reply scripted".into()));
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(HttpResponse::new(
            StatusCode::from_u16(status).unwrap(),
            headers,
            body.to_string(),
        ))
    }
}

fn client(gateway: &Arc<Gateway>, store: Arc<dyn SessionStore>) -> ApiClient {
    ApiClient::builder(ClientConfig::new("https://gw.test").with_retry_backoff(Duration::from_millis(1)))
        .transport(gateway.clone())
        .session_store(store)
        .device_id("device-1")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_login_stores_token_and_publishes_profile() {
    let gateway = Arc::new(Gateway::default());
    gateway.reply(
        200,
        json!({
            "access_token": "tok-9",
            "user": {"firstName": "Li", "lastName": "Wei", "countryCode": "cn", "userType": "merchant"}
        }),
    );

    let store = Arc::new(TokenStore::in_memory());
    let client = client(&gateway, store.clone());
    let auth = AuthContext::new();

    let profile = session::login(&client, &auth, &LoginRequest::new("li@example.com", "pw"))
        .await
        .unwrap();

    assert_eq!(profile.name, "Li Wei");
    assert_eq!(profile.account_label, AccountLabel::ReceiverChina);
    assert_eq!(store.token().as_deref(), Some("tok-9"));
    assert!(store.user().is_some());
    assert_eq!(auth.user(), Some(profile));
}

#[tokio::test]
async fn test_login_fetches_user_when_missing() {
    let gateway = Arc::new(Gateway::default());
    gateway.reply(200, json!({"token": "tok-1"}));
    gateway.reply(200, json!({"user": {"name": "Chisomo", "country": "MW", "user_type": "individual"}}));

    let store = Arc::new(TokenStore::in_memory());
    let client = client(&gateway, store.clone());
    let auth = AuthContext::new();

    let profile = session::login(&client, &auth, &LoginRequest::new("c@example.com", "pw"))
        .await
        .unwrap();

    assert_eq!(profile.account_label, AccountLabel::SenderMalawi);
    assert_eq!(gateway.paths(), ["/api/v1/auth/login", "/api/v1/users/me"]);
}

#[tokio::test]
async fn test_failed_login_leaves_nothing_behind() {
    let gateway = Arc::new(Gateway::default());
    gateway.reply(401, json!({"error": "Invalid credentials"}));

    let store = Arc::new(TokenStore::in_memory());
    let client = client(&gateway, store.clone());
    let auth = AuthContext::new();

    let err = session::login(&client, &auth, &LoginRequest::new("x@example.com", "bad"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(!err.is_session_expired());
    assert_eq!(store.token(), None);
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_login_with_country_name_and_code_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");

    let gateway = Arc::new(Gateway::default());
    gateway.reply(
        200,
        json!({
            "token": "tok-1",
            "user": {
                "name": "Chisomo",
                "country": "Malawi",
                "country_code": "MW",
                "user_type": "individual",
                "avatar": "https://cdn.example.com/a.png",
                "avatar_url": "https://cdn.example.com/b.png"
            }
        }),
    );

    {
        let store = Arc::new(TokenStore::new(Arc::new(FileStore::open(&path))));
        let client = client(&gateway, store);
        let profile = session::login(&client, &AuthContext::new(), &LoginRequest::new("c@example.com", "pw"))
            .await
            .unwrap();
        assert_eq!(profile.account_label, AccountLabel::SenderMalawi);
        assert_eq!(profile.avatar_url.as_deref(), Some("https://cdn.example.com/b.png"));
    }

    let store = TokenStore::new(Arc::new(FileStore::open(&path)));
    let auth = AuthContext::new();
    assert!(auth.hydrate(&store));
    assert_eq!(auth.user().unwrap().account_label, AccountLabel::SenderMalawi);
}

#[tokio::test]
async fn test_expiry_resets_auth_context() {
    let gateway = Arc::new(Gateway::default());
    gateway.reply(200, json!({"token": "tok-1", "user": {"name": "Ada"}}));
    gateway.reply(401, json!({"message": "Token expired"}));

    let store = Arc::new(TokenStore::in_memory());
    let client = client(&gateway, store.clone());
    let auth = Arc::new(AuthContext::new());
    let watcher = session::watch_expiry(client.subscribe(), Arc::clone(&auth));
    let mut events = client.subscribe();

    session::login(&client, &auth, &LoginRequest::new("ada@example.com", "pw"))
        .await
        .unwrap();
    assert!(auth.is_authenticated());

    let mut state = auth.subscribe();
    let err = client.request("/wallets", RequestOptions::get()).await.unwrap_err();
    assert!(err.is_session_expired());

    let event = events.recv().await.unwrap();
    assert_eq!(event.redirect_from("/wallets"), Some(EXPIRED_REDIRECT));

    state.changed().await.unwrap();
    assert!(!auth.is_authenticated());
    assert!(!store.is_authenticated());

    drop(client);
    watcher.await.unwrap();
}

#[tokio::test]
async fn test_session_survives_restart_with_file_store() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("storage.json");

    let gateway = Arc::new(Gateway::default());
    gateway.reply(200, json!({"token": "tok-1", "user": {"name": "Ada", "country": "MW"}}));

    {
        let store = Arc::new(TokenStore::new(Arc::new(FileStore::open(&path))));
        let client = client(&gateway, store);
        session::login(&client, &AuthContext::new(), &LoginRequest::new("ada@example.com", "pw"))
            .await
            .unwrap();
    }

    let store = TokenStore::new(Arc::new(FileStore::open(&path)));
    let auth = AuthContext::new();
    assert!(auth.hydrate(&store));
    assert_eq!(auth.user().unwrap().name, "Ada");

    let client = client(&gateway, Arc::new(store.clone()));
    session::logout(&client, &auth);
    assert!(!auth.is_authenticated());
    assert!(!store.is_authenticated());
}
