//! Domain error types.

use store::StoreError;
use thiserror::Error;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Missing or malformed input.
    #[error("{0}")]
    Validation(String),

    /// The referenced entity does not exist in the service that owns it.
    #[error("{resource} not found: {id}")]
    DependencyNotFound {
        dependency: String,
        resource: String,
        id: String,
    },

    /// The owning service could not be asked whether the reference exists.
    #[error("could not verify {resource} {id}: {reason}")]
    DependencyUnreachable {
        dependency: String,
        resource: String,
        id: String,
        reason: String,
    },

    /// The requested entity does not exist in this service.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A uniqueness rule was violated.
    #[error("{0}")]
    Conflict(String),

    /// The datastore failed.
    #[error("persistence error: {0}")]
    Persistence(StoreError),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field, value } => {
                DomainError::Conflict(format!("{field} already exists: {value}"))
            }
            other => DomainError::Persistence(other),
        }
    }
}

/// Convenience type alias for domain results.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_becomes_conflict() {
        let err: DomainError = StoreError::Duplicate {
            field: "name",
            value: "Books".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "name already exists: Books");
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn unavailable_becomes_persistence() {
        let err: DomainError = StoreError::Unavailable("down".to_string()).into();
        assert!(matches!(err, DomainError::Persistence(_)));
    }

    #[test]
    fn dependency_not_found_names_the_id() {
        let err = DomainError::DependencyNotFound {
            dependency: "category_service".to_string(),
            resource: "category".to_string(),
            id: "missing-id".to_string(),
        };
        assert_eq!(err.to_string(), "category not found: missing-id");
    }
}
