//! # Post Scopes
//!
//! Composable filter predicates over posts. A [`PostScope`] is a conjunction of
//! [`PostFilter`]s; repositories apply every filter to every query, so ownership
//! checks and top-level/comment scoping compose instead of being inherited.

use crate::models::{Post, PostId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    /// Only posts written by this user
    AuthoredBy(UserId),
    /// Only posts without a parent
    TopLevel,
    /// Only comments (posts with any parent)
    Replies,
    /// Only direct children of this post
    ChildOf(PostId),
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Self::AuthoredBy(user) => post.author_id == Some(*user),
            Self::TopLevel => post.parent_id.is_none(),
            Self::Replies => post.parent_id.is_some(),
            Self::ChildOf(parent) => post.parent_id == Some(*parent),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostScope {
    filters: Vec<PostFilter>,
}

impl PostScope {
    /// The unrestricted scope.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn top_level() -> Self {
        Self::all().and(PostFilter::TopLevel)
    }

    pub fn children_of(parent: PostId) -> Self {
        Self::all().and(PostFilter::ChildOf(parent))
    }

    pub fn owned_by(user: UserId) -> Self {
        Self::all().and(PostFilter::AuthoredBy(user))
    }

    pub fn and(mut self, filter: PostFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(&self) -> &[PostFilter] {
        &self.filters
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.filters.iter().all(|f| f.matches(post))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommentDraft, PostDraft};

    fn post_by(author: UserId) -> Post {
        Post::top_level(
            author,
            PostDraft { title: "t".into(), abstract_text: None, text: "b".into() },
        )
    }

    #[test]
    fn empty_scope_matches_everything() {
        let p = post_by(UserId::new());
        assert!(PostScope::all().matches(&p));
    }

    #[test]
    fn filters_are_conjunctive() {
        let alice = UserId::new();
        let post = post_by(alice);
        let reply = Post::comment(post.id, Some(alice), CommentDraft { text: "c".into() });

        let scope = PostScope::owned_by(alice).and(PostFilter::TopLevel);
        assert!(scope.matches(&post));
        assert!(!scope.matches(&reply));

        let replies = PostScope::owned_by(alice).and(PostFilter::Replies);
        assert!(replies.matches(&reply));
        assert!(PostScope::children_of(post.id).matches(&reply));
        assert!(!PostScope::owned_by(UserId::new()).matches(&post));
    }

    #[test]
    fn ownership_never_matches_anonymous_posts() {
        let anon = Post::comment(PostId::new(), None, CommentDraft { text: "c".into() });
        assert!(!PostScope::owned_by(UserId::new()).matches(&anon));
    }
}
