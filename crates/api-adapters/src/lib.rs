//! # api-adapters
//!
//! The web routing and orchestration layer for Rusty-Blog.
//!
//! Pages ([`views`]) and counters ([`metrics`]) are framework-agnostic; the
//! axum surface (router, handlers, extractors) lives behind `web-axum`.

pub mod metrics;
pub mod views;

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;
#[cfg(feature = "web-axum")]
pub mod routes;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use routes::router;
#[cfg(feature = "web-axum")]
pub use state::{AppState, SessionCookie};
