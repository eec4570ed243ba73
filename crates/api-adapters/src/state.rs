//! Shared handler state.

use std::sync::Arc;

use domains::{CredentialHasher, InteractionRepository, PostRepository, SessionTokens, UserRepository};
use services::{AccountService, CommentService, InteractionService, PostService};

use crate::metrics::Metrics;

/// Attributes of the `blog_session` cookie.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookie {
    pub secure: bool,
    pub max_age_secs: i64,
}

/// State shared by every handler. Cloned per request; everything inside is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub comments: CommentService,
    pub interactions: InteractionService,
    pub accounts: AccountService,
    pub metrics: Arc<Metrics>,
    pub cookie: SessionCookie,
}

impl AppState {
    /// Wires every service from the storage and auth adapters.
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        interactions: Arc<dyn InteractionRepository>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn SessionTokens>,
        cookie: SessionCookie,
    ) -> Self {
        Self {
            posts: PostService::new(posts.clone(), interactions.clone(), users.clone()),
            comments: CommentService::new(posts.clone()),
            interactions: InteractionService::new(posts, interactions),
            accounts: AccountService::new(users, hasher, tokens),
            metrics: Arc::new(Metrics::new()),
            cookie,
        }
    }
}
