//! Domain-level error types.

use std::collections::BTreeMap;

use thiserror::Error;

/// Field name to the messages reported for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Domain errors - business logic failures.
///
/// "Not found" and "not allowed" are not errors here; they travel as
/// [`crate::Access`] outcomes.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Repository(#[from] RepoError),
}

impl DomainError {
    /// Validation failure on a single field.
    pub fn field(name: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(name.to_string(), vec![message.into()]);
        DomainError::Validation(errors)
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
