//! Translation of sqlx failures into domain errors.

use domains::DomainError;
use thiserror::Error;

/// Failures specific to the PostgreSQL adapters.
#[derive(Debug, Error)]
pub(crate) enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("unexpected interaction value '{0}' in store")]
    CorruptInteraction(String),
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "storage failure");
        DomainError::Internal(err.to_string())
    }
}

/// Plain translation: every database error is internal.
pub(crate) fn internal(err: sqlx::Error) -> DomainError {
    StorageError::from(err).into()
}

/// A foreign key an insert may violate: constraint name, referenced entity and its id.
pub(crate) type Reference<'a> = (&'a str, &'static str, String);

/// Translation for inserts: uniqueness clashes become `Conflict`, a dangling
/// reference becomes `NotFound` for whichever of `references` names the
/// violated constraint.
pub(crate) fn on_insert(err: sqlx::Error, what: &str, references: Vec<Reference<'_>>) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return DomainError::Conflict(format!("{what} already exists"));
        }
        if db.is_foreign_key_violation() {
            let violated = db.constraint();
            if let Some((_, entity, id)) = references.into_iter().find(|(name, ..)| Some(*name) == violated) {
                return DomainError::NotFound(entity, id);
            }
        }
    }
    internal(err)
}
