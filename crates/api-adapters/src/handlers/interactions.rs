use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{DomainError, InteractionKind, PostId, ToggleOutcome};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::extract::Ctx;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// `POST /posts/{id}/interaction?type=like|dislike`
///
/// Answers `201 Created` with `{state, likes, dislikes}` after the toggle.
pub async fn toggle(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(post_id): Path<PostId>,
    Query(query): Query<ToggleQuery>,
) -> ApiResult<(StatusCode, Json<ToggleOutcome>)> {
    let requested: InteractionKind = query
        .kind
        .as_deref()
        .ok_or_else(|| DomainError::Validation("missing interaction type".into()))?
        .parse()?;

    let outcome = state.interactions.toggle(&ctx, post_id, requested).await?;
    state.metrics.toggled(requested.as_str(), outcome.step.label());
    Ok((StatusCode::CREATED, Json(outcome)))
}
