//! Core error taxonomy returned by every service and orchestrator call.
//!
//! # Invariants
//! - Errors propagate unchanged to the caller; core never swallows one.
//! - Any error raised inside a unit of work rolls the whole unit back.

use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug)]
pub enum CoreError {
    /// Caller supplied a structurally wrong identifier or broke a business rule.
    InvalidArgument(String),
    /// A referenced record does not exist.
    NotFound { kind: EntityKind, id: i64 },
    /// Record fields failed validation before persistence.
    Validation(ValidationError),
    /// The record store failed to read or persist a change.
    Storage(RepoError),
}

impl CoreError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn not_found(kind: EntityKind, id: i64) -> Self {
        Self::NotFound { kind, id }
    }

    /// Stable machine-readable code for logs and caller-side mapping.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation_failed",
            Self::Storage(_) => "storage_failure",
        }
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found with ID: {id}"),
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::InvalidArgument(_) | Self::NotFound { .. } => None,
        }
    }
}

impl From<RepoError> for CoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(kind, id) => Self::NotFound { kind, id },
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Storage(other),
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(RepoError::from(value))
    }
}

#[cfg(test)]
mod tests {
    use super::CoreError;
    use crate::model::EntityKind;
    use crate::repo::RepoError;

    #[test]
    fn repo_not_found_maps_to_typed_not_found() {
        let err = CoreError::from(RepoError::NotFound(EntityKind::Customer, 999));
        assert!(matches!(
            err,
            CoreError::NotFound {
                kind: EntityKind::Customer,
                id: 999
            }
        ));
        assert_eq!(err.to_string(), "Customer not found with ID: 999");
    }

    #[test]
    fn invalid_data_maps_to_storage_failure() {
        let err = CoreError::from(RepoError::InvalidData("bad row".to_string()));
        assert_eq!(err.error_code(), "storage_failure");
    }
}
