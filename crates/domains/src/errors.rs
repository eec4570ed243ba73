//! # DomainError
//!
//! Centralized error handling for the Rusty-Blog ecosystem.
//! Adapters translate their own failures into these variants at the boundary.

use thiserror::Error;

/// The primary error type for all domain and service operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Resource not found, or not visible to the caller (e.g. someone else's post)
    #[error("{0} not found with ID {1}")]
    NotFound(&'static str, String),

    /// The operation needs a signed-in viewer
    #[error("authentication required")]
    Unauthenticated,

    /// Validation failure (e.g. blank text, title too long)
    #[error("validation error: {0}")]
    Validation(String),

    /// Uniqueness clash (duplicate username, concurrent interaction insert)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g. DB down, hashing failure)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound(entity, id.to_string())
    }
}

/// A specialized Result type for Rusty-Blog logic.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_id() {
        let err = DomainError::not_found("post", 42);
        assert_eq!(err.to_string(), "post not found with ID 42");
    }
}
