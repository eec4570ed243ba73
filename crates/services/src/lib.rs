//! # services
//!
//! Use cases of Rusty-Blog. Each service takes an explicit [`RequestContext`],
//! authorizes, scopes its reads through [`PostScope`] and talks to storage only
//! through the port traits in `domains`.
//!
//! [`RequestContext`]: domains::RequestContext
//! [`PostScope`]: domains::PostScope

pub mod accounts;
pub mod comments;
mod enrich;
pub mod interactions;
pub mod posts;

pub use accounts::{AccountService, Session};
pub use comments::CommentService;
pub use interactions::{InteractionService, MAX_TOGGLE_ATTEMPTS};
pub use posts::PostService;
