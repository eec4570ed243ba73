//! # Request context extraction
//!
//! Builds a [`RequestContext`] from `Authorization: Bearer <token>` or the
//! `blog_session` cookie. A missing or invalid token, or one whose account is
//! gone, is an anonymous caller; handlers decide whether they need a viewer.
//! Only a storage failure while resolving the account rejects the request.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use domains::RequestContext;

use crate::error::ApiError;
use crate::state::{AppState, SessionCookie};

pub const SESSION_COOKIE: &str = "blog_session";

/// The caller of the current request.
#[derive(Debug, Clone)]
pub struct Ctx(pub RequestContext);

impl FromRequestParts<AppState> for Ctx {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).or_else(|| session_token(&parts.headers));
        Ok(Ctx(state.accounts.context_from_token(token).await?))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value)
}

/// `Set-Cookie` value that stores `token` as the session.
pub fn session_cookie(token: &str, cfg: SessionCookie) -> String {
    cookie_with(token, cfg.max_age_secs, cfg.secure)
}

/// `Set-Cookie` value that removes the session.
pub fn cleared_cookie(cfg: SessionCookie) -> String {
    cookie_with("", 0, cfg.secure)
}

fn cookie_with(value: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
