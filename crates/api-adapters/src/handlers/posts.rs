use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use domains::{DomainError, PostDraft, PostId};
use serde::Deserialize;

use super::page;
use crate::error::ApiResult;
use crate::extract::Ctx;
use crate::state::AppState;
use crate::views::{PostDetailPage, PostFormPage, PostListPage};

/// Fields of the create/edit form. Missing fields arrive empty and fail validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub text: String,
}

impl From<PostForm> for PostDraft {
    fn from(form: PostForm) -> Self {
        PostDraft { title: form.title, abstract_text: Some(form.abstract_text), text: form.text }
    }
}

pub async fn list(State(state): State<AppState>, Ctx(ctx): Ctx) -> ApiResult<Response> {
    let views = state.posts.list(&ctx).await?;
    page(StatusCode::OK, &PostListPage::new(&ctx, &views))
}

pub async fn new_form(Ctx(ctx): Ctx) -> ApiResult<Response> {
    ctx.require_viewer()?;
    page(StatusCode::OK, &PostFormPage::create(&ctx, PostDraft::default()))
}

pub async fn create(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Form(form): Form<PostForm>,
) -> ApiResult<Response> {
    let draft = PostDraft::from(form);
    match state.posts.create(&ctx, draft.clone()).await {
        Ok(post) => {
            state.metrics.post_created();
            Ok(redirect_to_post(post.id))
        }
        Err(DomainError::Validation(msg)) => {
            page(StatusCode::UNPROCESSABLE_ENTITY, &PostFormPage::create(&ctx, draft).with_error(msg))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn detail(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<PostId>,
) -> ApiResult<Response> {
    let detail = state.posts.detail(&ctx, id).await?;
    page(StatusCode::OK, &PostDetailPage::new(&ctx, &detail))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<PostId>,
) -> ApiResult<Response> {
    let post = state.posts.editable(&ctx, id).await?;
    let draft = PostDraft {
        title: post.title.unwrap_or_default(),
        abstract_text: post.abstract_text,
        text: post.text,
    };
    page(StatusCode::OK, &PostFormPage::edit(&ctx, id, draft))
}

pub async fn update(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<PostId>,
    Form(form): Form<PostForm>,
) -> ApiResult<Response> {
    let draft = PostDraft::from(form);
    match state.posts.update(&ctx, id, draft.clone()).await {
        Ok(post) => Ok(redirect_to_post(post.id)),
        Err(DomainError::Validation(msg)) => {
            page(StatusCode::UNPROCESSABLE_ENTITY, &PostFormPage::edit(&ctx, id, draft).with_error(msg))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    Ctx(ctx): Ctx,
    Path(id): Path<PostId>,
) -> ApiResult<Redirect> {
    state.posts.delete(&ctx, id).await?;
    Ok(Redirect::to("/posts"))
}

fn redirect_to_post(id: PostId) -> Response {
    Redirect::to(&format!("/posts/{id}")).into_response()
}
