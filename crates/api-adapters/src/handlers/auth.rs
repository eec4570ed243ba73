//! Account pages. Successful sign-in and registration set the session cookie.

use axum::extract::{Form, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use domains::DomainError;
use serde::Deserialize;

use super::page;
use crate::error::ApiResult;
use crate::extract::{cleared_cookie, session_cookie, Ctx};
use crate::state::AppState;
use crate::views::{AuthMode, AuthPage};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub async fn login_form(Ctx(ctx): Ctx) -> ApiResult<Response> {
    page(StatusCode::OK, &AuthPage::new(&ctx, AuthMode::Login))
}

pub async fn register_form(Ctx(ctx): Ctx) -> ApiResult<Response> {
    page(StatusCode::OK, &AuthPage::new(&ctx, AuthMode::Register))
}

pub async fn login(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Form(creds): Form<Credentials>,
) -> ApiResult<Response> {
    match state.accounts.login(&creds.username, &creds.password).await {
        Ok(session) => Ok(signed_in(&state, &session.token)),
        Err(DomainError::Unauthenticated) => {
            let view = AuthPage::new(&ctx, AuthMode::Login)
                .with_error(&creds.username, "invalid username or password");
            page(StatusCode::UNAUTHORIZED, &view)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn register(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Form(creds): Form<Credentials>,
) -> ApiResult<Response> {
    let rejected = |status, msg: String| {
        let view = AuthPage::new(&ctx, AuthMode::Register).with_error(&creds.username, msg);
        page(status, &view)
    };
    match state.accounts.register(&creds.username, &creds.password).await {
        Ok(session) => Ok(signed_in(&state, &session.token)),
        Err(DomainError::Validation(msg)) => rejected(StatusCode::UNPROCESSABLE_ENTITY, msg),
        Err(DomainError::Conflict(_)) => rejected(StatusCode::CONFLICT, "that username is taken".into()),
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(State(state): State<AppState>) -> Response {
    ([(SET_COOKIE, cleared_cookie(state.cookie))], Redirect::to("/posts")).into_response()
}

/// Removes the caller's account. Their posts stay, without an author.
pub async fn delete_account(State(state): State<AppState>, Ctx(ctx): Ctx) -> ApiResult<Response> {
    state.accounts.delete_account(&ctx).await?;
    Ok(([(SET_COOKIE, cleared_cookie(state.cookie))], Redirect::to("/posts")).into_response())
}

fn signed_in(state: &AppState, token: &str) -> Response {
    ([(SET_COOKIE, session_cookie(token, state.cookie))], Redirect::to("/posts")).into_response()
}
