use std::collections::HashSet;
use std::sync::Arc;

use domains::{InteractionRepository, Post, PostId, PostView, RequestContext, Result, UserId, UserRepository};

/// Attaches author names, tallies and the viewer's own interaction to posts,
/// with one batched lookup per concern.
#[derive(Clone)]
pub(crate) struct Enricher {
    users: Arc<dyn UserRepository>,
    interactions: Arc<dyn InteractionRepository>,
}

impl Enricher {
    pub(crate) fn new(users: Arc<dyn UserRepository>, interactions: Arc<dyn InteractionRepository>) -> Self {
        Self { users, interactions }
    }

    pub(crate) async fn views(&self, ctx: &RequestContext, posts: Vec<Post>) -> Result<Vec<PostView>> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<PostId> = posts.iter().map(|p| p.id).collect();
        let authors: Vec<UserId> = posts
            .iter()
            .filter_map(|p| p.author_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let names = if authors.is_empty() {
            Default::default()
        } else {
            self.users.usernames(&authors).await?
        };
        let tallies = self.interactions.tallies(&ids).await?;
        let mine = match ctx.viewer_id() {
            Some(user) => self.interactions.kinds_for_user(&ids, user).await?,
            None => Default::default(),
        };

        Ok(posts
            .into_iter()
            .map(|post| PostView {
                author_name: post.author_id.and_then(|a| names.get(&a).cloned()),
                tally: tallies.get(&post.id).copied().unwrap_or_default(),
                viewer_interaction: mine.get(&post.id).copied(),
                post,
            })
            .collect())
    }
}
