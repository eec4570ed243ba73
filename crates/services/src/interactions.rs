//! # InteractionService
//!
//! Like/dislike toggling. The step is decided from an explicit read of the
//! current row (see [`resolve_toggle`]); the write is conditional on that read.
//! When a concurrent request changed the row in between, the write reports it
//! (a `Conflict` on insert, `false` on overwrite/delete) and the toggle is
//! re-resolved against the fresh state. The store's uniqueness on
//! (post, user) guarantees at most one row per pair.

use std::sync::Arc;

use domains::{
    resolve_toggle, DomainError, Interaction, InteractionKind, InteractionRepository, PostId,
    PostRepository, PostScope, RequestContext, Result, ToggleOutcome, ToggleStep,
};
use tracing::{debug, info, warn};

/// Upper bound on read-resolve-write rounds for one toggle request.
pub const MAX_TOGGLE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct InteractionService {
    posts: Arc<dyn PostRepository>,
    interactions: Arc<dyn InteractionRepository>,
}

impl InteractionService {
    pub fn new(posts: Arc<dyn PostRepository>, interactions: Arc<dyn InteractionRepository>) -> Self {
        Self { posts, interactions }
    }

    /// Applies one `requested` symbol for the viewer on `post_id`.
    pub async fn toggle(
        &self,
        ctx: &RequestContext,
        post_id: PostId,
        requested: InteractionKind,
    ) -> Result<ToggleOutcome> {
        let viewer = ctx.require_viewer()?;
        if self.posts.find(post_id, &PostScope::all()).await?.is_none() {
            return Err(DomainError::not_found("post", post_id));
        }

        for attempt in 1..=MAX_TOGGLE_ATTEMPTS {
            let current = self.interactions.find(post_id, viewer.id).await?;
            let step = resolve_toggle(current, requested);

            if self.apply(post_id, viewer.id, step).await? {
                info!(
                    post_id = %post_id,
                    user_id = %viewer.id,
                    requested = %requested,
                    step = step.label(),
                    "interaction toggled"
                );
                let tally = self
                    .interactions
                    .tallies(&[post_id])
                    .await?
                    .get(&post_id)
                    .copied()
                    .unwrap_or_default();
                return Ok(ToggleOutcome { state: step.next_state(), step, tally });
            }

            debug!(post_id = %post_id, attempt, "interaction changed concurrently, re-resolving");
        }

        warn!(post_id = %post_id, user_id = %viewer.id, "interaction toggle gave up after contention");
        Err(DomainError::Conflict(format!(
            "interaction on post {post_id} kept changing concurrently"
        )))
    }

    /// Returns `false` when the observed state no longer holds.
    async fn apply(&self, post_id: PostId, user_id: domains::UserId, step: ToggleStep) -> Result<bool> {
        match step {
            ToggleStep::Insert(kind) => {
                let row = Interaction {
                    post_id,
                    user_id,
                    kind,
                    created_at: chrono::Utc::now(),
                };
                match self.interactions.insert(&row).await {
                    Ok(()) => Ok(true),
                    Err(DomainError::Conflict(_)) => Ok(false),
                    Err(e) => Err(e),
                }
            }
            ToggleStep::Delete(kind) => self.interactions.delete(post_id, user_id, kind).await,
            ToggleStep::Overwrite { from, to } => {
                self.interactions.overwrite(post_id, user_id, from, to).await
            }
        }
    }
}
