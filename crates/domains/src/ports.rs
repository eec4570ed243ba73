//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the binary.
//! With the `testing` feature each trait also gets a mockall `MockXxx` double.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::context::Viewer;
use crate::errors::Result;
use crate::models::{Interaction, InteractionKind, Post, PostId, Tally, User, UserId};
use crate::scope::PostScope;

/// Persistence contract for posts and comments.
///
/// Every read and write takes a [`PostScope`]; a row outside the scope behaves
/// exactly like a missing row.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: &Post) -> Result<()>;

    async fn find(&self, id: PostId, scope: &PostScope) -> Result<Option<Post>>;

    /// Posts in the scope, in store natural order (creation time, then id).
    async fn list(&self, scope: &PostScope) -> Result<Vec<Post>>;

    /// Writes the editable fields. Returns `false` when the row is gone or out of scope.
    async fn update(&self, post: &Post, scope: &PostScope) -> Result<bool>;

    /// Deletes the post and, through the store, its descendants and their interactions.
    async fn delete(&self, id: PostId, scope: &PostScope) -> Result<bool>;
}

/// Persistence contract for like/dislike rows.
///
/// Writes are conditional on the value the caller observed so that a
/// concurrent change shows up as `Ok(false)` (or `Conflict` on insert).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    async fn find(&self, post: PostId, user: UserId) -> Result<Option<InteractionKind>>;

    /// Fails with `Conflict` when a row for the pair already exists and with
    /// `NotFound` when the post does not.
    async fn insert(&self, interaction: &Interaction) -> Result<()>;

    async fn overwrite(
        &self,
        post: PostId,
        user: UserId,
        from: InteractionKind,
        to: InteractionKind,
    ) -> Result<bool>;

    async fn delete(&self, post: PostId, user: UserId, kind: InteractionKind) -> Result<bool>;

    /// Like/dislike counts; posts without interactions may be absent from the map.
    async fn tallies(&self, posts: &[PostId]) -> Result<HashMap<PostId, Tally>>;

    /// The given user's interaction on each post they have one on.
    async fn kinds_for_user(
        &self,
        posts: &[PostId],
        user: UserId,
    ) -> Result<HashMap<PostId, InteractionKind>>;
}

/// Persistence contract for accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` on a duplicate username.
    async fn insert(&self, user: &User) -> Result<()>;

    async fn find(&self, id: UserId) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn usernames(&self, ids: &[UserId]) -> Result<HashMap<UserId, String>>;

    /// Removes the account. Authored posts stay with a null author; interactions go.
    async fn delete(&self, id: UserId) -> Result<bool>;
}

/// Password hashing contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;

    /// Constant-time check of `password` against a stored hash. Malformed hashes never verify.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Session token contract.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionTokens: Send + Sync {
    fn issue(&self, viewer: &Viewer) -> Result<String>;

    /// Fails with `Unauthenticated` for malformed, forged or expired tokens.
    fn verify(&self, token: &str) -> Result<Viewer>;
}
