//! # In-memory store
//!
//! One lock-protected state shared by all three repository ports, so that
//! cascades behave like the relational schema: deleting a post removes its
//! subtree and their interactions, deleting a user nulls their authorship.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use domains::{
    DomainError, Interaction, InteractionKind, InteractionRepository, Post, PostId,
    PostRepository, PostScope, Result, Tally, User, UserId, UserRepository,
};

#[derive(Default)]
struct State {
    users: Vec<User>,
    /// Insertion order is the natural order
    posts: Vec<Post>,
    interactions: HashMap<(PostId, UserId), Interaction>,
}

impl State {
    fn post_exists(&self, id: PostId) -> bool {
        self.posts.iter().any(|p| p.id == id)
    }

    /// `root` plus every transitive child.
    fn subtree(&self, root: PostId) -> HashSet<PostId> {
        let mut doomed = HashSet::from([root]);
        loop {
            let before = doomed.len();
            for post in &self.posts {
                if post.parent_id.is_some_and(|p| doomed.contains(&p)) {
                    doomed.insert(post.id);
                }
            }
            if doomed.len() == before {
                return doomed;
            }
        }
    }
}

/// Cheap to clone; clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of interaction rows, for assertions in tests.
    pub async fn interaction_count(&self) -> usize {
        self.state.read().await.interactions.len()
    }
}

#[async_trait]
impl PostRepository for MemoryStore {
    async fn insert(&self, post: &Post) -> Result<()> {
        let mut state = self.state.write().await;
        if state.post_exists(post.id) {
            return Err(DomainError::Conflict(format!("post {} already exists", post.id)));
        }
        if let Some(parent) = post.parent_id {
            if !state.post_exists(parent) {
                return Err(DomainError::not_found("post", parent));
            }
        }
        state.posts.push(post.clone());
        Ok(())
    }

    async fn find(&self, id: PostId, scope: &PostScope) -> Result<Option<Post>> {
        let state = self.state.read().await;
        Ok(state
            .posts
            .iter()
            .find(|p| p.id == id && scope.matches(p))
            .cloned())
    }

    async fn list(&self, scope: &PostScope) -> Result<Vec<Post>> {
        let state = self.state.read().await;
        Ok(state.posts.iter().filter(|p| scope.matches(p)).cloned().collect())
    }

    async fn update(&self, post: &Post, scope: &PostScope) -> Result<bool> {
        let mut state = self.state.write().await;
        match state.posts.iter_mut().find(|p| p.id == post.id && scope.matches(p)) {
            Some(stored) => {
                stored.title = post.title.clone();
                stored.abstract_text = post.abstract_text.clone();
                stored.text = post.text.clone();
                stored.updated_at = post.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: PostId, scope: &PostScope) -> Result<bool> {
        let mut state = self.state.write().await;
        if !state.posts.iter().any(|p| p.id == id && scope.matches(p)) {
            return Ok(false);
        }
        let doomed = state.subtree(id);
        state.posts.retain(|p| !doomed.contains(&p.id));
        state.interactions.retain(|(post, _), _| !doomed.contains(post));
        Ok(true)
    }
}

#[async_trait]
impl InteractionRepository for MemoryStore {
    async fn find(&self, post: PostId, user: UserId) -> Result<Option<InteractionKind>> {
        let state = self.state.read().await;
        Ok(state.interactions.get(&(post, user)).map(|i| i.kind))
    }

    async fn insert(&self, interaction: &Interaction) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.post_exists(interaction.post_id) {
            return Err(DomainError::not_found("post", interaction.post_id));
        }
        let key = (interaction.post_id, interaction.user_id);
        if state.interactions.contains_key(&key) {
            return Err(DomainError::Conflict(format!(
                "interaction already recorded on post {}",
                interaction.post_id
            )));
        }
        state.interactions.insert(key, interaction.clone());
        Ok(())
    }

    async fn overwrite(
        &self,
        post: PostId,
        user: UserId,
        from: InteractionKind,
        to: InteractionKind,
    ) -> Result<bool> {
        let mut state = self.state.write().await;
        match state.interactions.get_mut(&(post, user)) {
            Some(row) if row.kind == from => {
                row.kind = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, post: PostId, user: UserId, kind: InteractionKind) -> Result<bool> {
        let mut state = self.state.write().await;
        let key = (post, user);
        if state.interactions.get(&key).is_some_and(|row| row.kind == kind) {
            state.interactions.remove(&key);
            return Ok(true);
        }
        Ok(false)
    }

    async fn tallies(&self, posts: &[PostId]) -> Result<HashMap<PostId, Tally>> {
        let state = self.state.read().await;
        let wanted: HashSet<&PostId> = posts.iter().collect();
        let mut out: HashMap<PostId, Tally> = HashMap::new();
        for ((post, _), row) in &state.interactions {
            if wanted.contains(post) {
                out.entry(*post).or_default().record(row.kind);
            }
        }
        Ok(out)
    }

    async fn kinds_for_user(
        &self,
        posts: &[PostId],
        user: UserId,
    ) -> Result<HashMap<PostId, InteractionKind>> {
        let state = self.state.read().await;
        Ok(posts
            .iter()
            .filter_map(|p| state.interactions.get(&(*p, user)).map(|row| (*p, row.kind)))
            .collect())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<()> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::Conflict(format!("username '{}' is taken", user.username)));
        }
        state.users.push(user.clone());
        Ok(())
    }

    async fn find(&self, id: UserId) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.username == username).cloned())
    }

    async fn usernames(&self, ids: &[UserId]) -> Result<HashMap<UserId, String>> {
        let state = self.state.read().await;
        Ok(state
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .map(|u| (u.id, u.username.clone()))
            .collect())
    }

    async fn delete(&self, id: UserId) -> Result<bool> {
        let mut state = self.state.write().await;
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        if state.users.len() == before {
            return Ok(false);
        }
        for post in state.posts.iter_mut().filter(|p| p.author_id == Some(id)) {
            post.author_id = None;
        }
        state.interactions.retain(|(_, user), _| *user != id);
        Ok(true)
    }
}
