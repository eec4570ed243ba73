use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

use super::page;
use crate::error::ApiResult;
use crate::extract::Ctx;
use crate::state::AppState;
use crate::views::DashboardPage;

pub async fn show(State(state): State<AppState>, Ctx(ctx): Ctx) -> ApiResult<Response> {
    let dashboard = state.posts.dashboard(&ctx).await?;
    page(StatusCode::OK, &DashboardPage::new(&ctx, &dashboard))
}
