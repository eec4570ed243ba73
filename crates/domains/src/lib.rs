//! # domains
//!
//! The central domain model and port definitions for Rusty-Blog.
//! Nothing in here performs I/O: adapters implement the traits in [`ports`],
//! services orchestrate them.

pub mod context;
pub mod errors;
pub mod interaction;
pub mod models;
pub mod ports;
pub mod scope;

// Re-exporting for easier access in other crates
pub use context::*;
pub use errors::*;
pub use interaction::*;
pub use models::*;
pub use ports::*;
pub use scope::*;
