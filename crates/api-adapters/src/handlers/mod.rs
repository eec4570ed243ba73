//! # Handlers
//!
//! Thin adapters between HTTP and the services: extract, call one service
//! method, render or redirect.

pub mod auth;
pub mod comments;
pub mod dashboard;
pub mod interactions;
pub mod posts;
pub mod system;

use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::error::ApiResult;

/// Renders `page` with `status`.
pub(crate) fn page(status: StatusCode, page: &impl Template) -> ApiResult<Response> {
    Ok((status, Html(page.render()?)).into_response())
}
