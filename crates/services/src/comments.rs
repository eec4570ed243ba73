//! # CommentService
//!
//! Comments are child posts. Anyone may comment (anonymous comments carry no
//! author); only the comment's author or the parent post's author may delete.

use std::sync::Arc;

use domains::{
    CommentDraft, DomainError, Post, PostId, PostRepository, PostScope, RequestContext, Result,
};
use tracing::info;

#[derive(Clone)]
pub struct CommentService {
    posts: Arc<dyn PostRepository>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Attaches a comment to `parent_id`. The author is the viewer, if any.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        parent_id: PostId,
        draft: CommentDraft,
    ) -> Result<Post> {
        if self.posts.find(parent_id, &PostScope::all()).await?.is_none() {
            return Err(DomainError::not_found("post", parent_id));
        }

        let comment = Post::comment(parent_id, ctx.viewer_id(), draft.validate()?);
        self.posts.insert(&comment).await?;

        info!(
            comment_id = %comment.id,
            parent_id = %parent_id,
            anonymous = comment.author_id.is_none(),
            "comment created"
        );
        Ok(comment)
    }

    /// Deletes a direct comment of `parent_id`.
    ///
    /// Callers who are neither the comment's author nor the parent's author
    /// get the same not-found as for a missing comment.
    pub async fn delete(&self, ctx: &RequestContext, parent_id: PostId, comment_id: PostId) -> Result<()> {
        let viewer = ctx.require_viewer()?;
        let siblings = PostScope::children_of(parent_id);
        let missing = || DomainError::not_found("comment", comment_id);

        let comment = self.posts.find(comment_id, &siblings).await?.ok_or_else(missing)?;
        let parent = self
            .posts
            .find(parent_id, &PostScope::all())
            .await?
            .ok_or_else(missing)?;

        if !comment.is_authored_by(viewer.id) && !parent.is_authored_by(viewer.id) {
            return Err(missing());
        }
        if !self.posts.delete(comment_id, &siblings).await? {
            return Err(missing());
        }

        info!(comment_id = %comment_id, parent_id = %parent_id, by = %viewer.id, "comment deleted");
        Ok(())
    }
}
