//! Shared harness: the real router over in-memory storage.

#![allow(dead_code)]

use std::sync::Arc;

use api_adapters::{router, AppState, SessionCookie};
use auth_adapters::{Argon2Hasher, JwtSessions};
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use domains::{Post, PostId, PostRepository, PostScope};
use secrecy::SecretString;
use storage_adapters::MemoryStore;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse battery";

#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> &str {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("json body")
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let secret = SecretString::from("integration-secret-0123456789".to_string());
        let state = AppState::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(Argon2Hasher::default()),
            Arc::new(JwtSessions::new(&secret, 3600)),
            SessionCookie { secure: false, max_age_secs: 3600 },
        );
        let router = router(state, concat!(env!("CARGO_MANIFEST_DIR"), "/../api-adapters/static"));
        Self { router, store }
    }

    /// Sends one request. `token` goes out as a bearer token, `form` as a urlencoded body.
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, form: Option<&str>) -> TestResponse {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match form {
            Some(form) => {
                req = req.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };
        let res = self.router.clone().oneshot(req.body(body).unwrap()).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        TestResponse { status, headers, body: String::from_utf8_lossy(&bytes).into_owned() }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, form: &str) -> TestResponse {
        self.send(Method::POST, uri, token, Some(form)).await
    }

    /// Registers `username` and returns its session token.
    pub async fn sign_up(&self, username: &str) -> String {
        let res = self
            .post("/auth/register", None, &format!("username={username}&password={}", enc(PASSWORD)))
            .await;
        assert_eq!(res.status, StatusCode::SEE_OTHER, "register {username}: {}", res.body);
        session_token(&res.headers).expect("session cookie")
    }

    /// Creates a top-level post and returns its id.
    pub async fn write_post(&self, token: &str, title: &str, text: &str) -> String {
        let res = self
            .post("/posts/new", Some(token), &format!("title={}&abstract=&text={}", enc(title), enc(text)))
            .await;
        assert_eq!(res.status, StatusCode::SEE_OTHER, "create post: {}", res.body);
        res.location().trim_start_matches("/posts/").to_string()
    }

    pub async fn all_posts(&self) -> Vec<Post> {
        PostRepository::list(self.store.as_ref(), &PostScope::all()).await.unwrap()
    }

    pub async fn stored(&self, id: &str) -> Option<Post> {
        let id = PostId(id.parse().expect("uuid"));
        PostRepository::find(self.store.as_ref(), id, &PostScope::all()).await.unwrap()
    }
}

/// Reads the `blog_session` value out of `Set-Cookie`.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|c| c.strip_prefix("blog_session="))
        .map(|rest| rest.split(';').next().unwrap_or_default().to_string())
        .filter(|t| !t.is_empty())
}

/// Minimal form encoding for test inputs.
pub fn enc(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' => (b as char).to_string(),
            b' ' => "+".to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect()
}
