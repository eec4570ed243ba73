use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use domains::{CommentDraft, DomainError, PostId};
use serde::Deserialize;

use super::page;
use crate::error::ApiResult;
use crate::extract::Ctx;
use crate::state::AppState;
use crate::views::PostDetailPage;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub text: String,
}

/// Anyone may comment; the author is recorded only for signed-in callers.
pub async fn create(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(post_id): Path<PostId>,
    Form(form): Form<CommentForm>,
) -> ApiResult<Response> {
    let draft = CommentDraft { text: form.text };
    match state.comments.create(&ctx, post_id, draft.clone()).await {
        Ok(_) => {
            state.metrics.comment_created();
            Ok(Redirect::to(&format!("/posts/{post_id}")).into_response())
        }
        Err(DomainError::Validation(msg)) => {
            let detail = state.posts.detail(&ctx, post_id).await?;
            let view = PostDetailPage::new(&ctx, &detail).with_rejected_comment(draft.text, msg);
            page(StatusCode::UNPROCESSABLE_ENTITY, &view)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path((post_id, comment_id)): Path<(PostId, PostId)>,
) -> ApiResult<Redirect> {
    state.comments.delete(&ctx, post_id, comment_id).await?;
    Ok(Redirect::to(&format!("/posts/{post_id}")))
}
