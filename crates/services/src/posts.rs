//! # PostService
//!
//! Listing, authoring and reading top-level posts. Update and delete never see
//! posts outside the caller's ownership scope, so acting on another user's
//! post reports not-found and leaves it untouched.

use std::sync::Arc;

use domains::{
    Dashboard, DomainError, InteractionRepository, Post, PostDetail, PostDraft, PostFilter, PostId,
    PostRepository, PostScope, PostView, RequestContext, Result, UserRepository,
};
use tracing::info;

use crate::enrich::Enricher;

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    enricher: Enricher,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        interactions: Arc<dyn InteractionRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { posts, enricher: Enricher::new(users, interactions) }
    }

    /// All top-level posts in natural order.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<PostView>> {
        let posts = self.posts.list(&PostScope::top_level()).await?;
        self.enricher.views(ctx, posts).await
    }

    pub async fn create(&self, ctx: &RequestContext, draft: PostDraft) -> Result<Post> {
        let viewer = ctx.require_viewer()?;
        let post = Post::top_level(viewer.id, draft.validate()?);

        self.posts.insert(&post).await?;
        info!(post_id = %post.id, author_id = %viewer.id, "post created");
        Ok(post)
    }

    /// Loads a post for its edit form. Only the author can see it here.
    pub async fn editable(&self, ctx: &RequestContext, id: PostId) -> Result<Post> {
        let viewer = ctx.require_viewer()?;
        self.posts
            .find(id, &PostScope::owned_by(viewer.id))
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))
    }

    pub async fn update(&self, ctx: &RequestContext, id: PostId, draft: PostDraft) -> Result<Post> {
        let viewer = ctx.require_viewer()?;
        let scope = PostScope::owned_by(viewer.id);

        let mut post = self
            .posts
            .find(id, &scope)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?;
        post.apply(draft.validate()?);

        if !self.posts.update(&post, &scope).await? {
            return Err(DomainError::not_found("post", id));
        }
        info!(post_id = %id, author_id = %viewer.id, "post updated");
        Ok(post)
    }

    /// Deletes an owned post together with its comments and interactions.
    pub async fn delete(&self, ctx: &RequestContext, id: PostId) -> Result<()> {
        let viewer = ctx.require_viewer()?;

        if !self.posts.delete(id, &PostScope::owned_by(viewer.id)).await? {
            return Err(DomainError::not_found("post", id));
        }
        info!(post_id = %id, author_id = %viewer.id, "post deleted");
        Ok(())
    }

    /// One post plus its direct comments, each annotated for the viewer.
    pub async fn detail(&self, ctx: &RequestContext, id: PostId) -> Result<PostDetail> {
        let post = self
            .posts
            .find(id, &PostScope::all())
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))?;
        let comments = self.posts.list(&PostScope::children_of(id)).await?;

        let mut batch = Vec::with_capacity(comments.len() + 1);
        batch.push(post);
        batch.extend(comments);

        let mut views = self.enricher.views(ctx, batch).await?.into_iter();
        let post = views.next().ok_or_else(|| DomainError::not_found("post", id))?;
        Ok(PostDetail { post, comments: views.collect() })
    }

    /// The caller's own posts and comments.
    pub async fn dashboard(&self, ctx: &RequestContext) -> Result<Dashboard> {
        let viewer = ctx.require_viewer()?;
        let mine = PostScope::owned_by(viewer.id);

        let posts = self.posts.list(&mine.clone().and(PostFilter::TopLevel)).await?;
        let comments = self.posts.list(&mine.and(PostFilter::Replies)).await?;

        Ok(Dashboard {
            posts: self.enricher.views(ctx, posts).await?,
            comments: self.enricher.views(ctx, comments).await?,
        })
    }
}
