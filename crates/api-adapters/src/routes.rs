//! The routing table.

use std::path::Path;

use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;

use crate::handlers::{auth, comments, dashboard, interactions, posts, system};
use crate::middleware;
use crate::state::AppState;

/// Builds the full application router. `static_dir` is served under `/static`.
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let app = Router::new()
        .route("/", get(|| async { Redirect::to("/posts") }))
        .route("/posts", get(posts::list))
        .route("/posts/new", get(posts::new_form).post(posts::create))
        .route("/posts/{id}", get(posts::detail))
        .route("/posts/{id}/edit", get(posts::edit_form).post(posts::update))
        .route("/posts/{id}/delete", post(posts::delete))
        .route("/posts/{id}/comments", post(comments::create))
        .route("/posts/{id}/comments/{comment_id}/delete", post(comments::delete))
        .route("/posts/{id}/interaction", post(interactions::toggle))
        .route("/dashboard", get(dashboard::show))
        .route("/auth/register", get(auth::register_form).post(auth::register))
        .route("/auth/login", get(auth::login_form).post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/account/delete", post(auth::delete_account))
        .route("/health", get(system::health))
        .route("/metrics", get(system::metrics))
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .with_state(state);

    middleware::apply(app)
}
