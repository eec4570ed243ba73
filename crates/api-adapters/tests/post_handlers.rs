//! Handler-level checks that need no signed-in user.

use std::sync::Arc;

use api_adapters::{router, AppState, SessionCookie};
use auth_adapters::{Argon2Hasher, JwtSessions};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use storage_adapters::MemoryStore;
use tower::ServiceExt;

fn app() -> Router {
    let store = Arc::new(MemoryStore::new());
    let secret = SecretString::from("handler-test-secret-0123".to_string());
    let state = AppState::new(
        store.clone(),
        store.clone(),
        store,
        Arc::new(Argon2Hasher::default()),
        Arc::new(JwtSessions::new(&secret, 3600)),
        SessionCookie { secure: false, max_age_secs: 3600 },
    );
    router(state, concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let res = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8_lossy(&body).into_owned())
}

#[tokio::test]
async fn root_redirects_to_post_list() {
    let (status, headers, _) = get(app(), "/").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/posts");
}

#[tokio::test]
async fn empty_list_renders() {
    let (status, headers, body) = get(app(), "/posts").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Nothing here yet."));
    assert!(body.contains("Sign in"));
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
}

#[tokio::test]
async fn new_post_form_needs_a_viewer() {
    let (status, _, _) = get(app(), "/posts/new").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_post_is_not_found() {
    let (status, _, _) = get(app(), "/posts/018f0000-0000-7000-8000-000000000000").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_post_id_is_a_client_error() {
    let (status, _, _) = get(app(), "/posts/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_and_metrics() {
    let (status, _, body) = get(app(), "/health").await;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "ok"));

    let (status, headers, body) = get(app(), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("application/openmetrics-text"));
    assert!(body.contains("blog_posts_created_total 0"));
}

#[tokio::test]
async fn interaction_script_is_served() {
    let (status, _, body) = get(app(), "/static/js/interactions.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/interaction?type="));
}
