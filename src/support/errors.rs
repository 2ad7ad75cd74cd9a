use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn user_not_found(id: i64) -> Self {
        DomainError::NotFound {
            entity: "User",
            field: "id",
            value: id.to_string(),
        }
    }

    /// Whether the error originates from infrastructure rather than from the
    /// caller's input.
    pub fn is_server_error(&self) -> bool {
        matches!(self, DomainError::Storage(_) | DomainError::Internal(_))
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_the_entity() {
        let err = DomainError::user_not_found(42);
        assert_eq!(err.to_string(), "Not found: User with id=42");
        assert!(!err.is_server_error());
    }

    #[test]
    fn db_errors_become_storage_errors() {
        let err: DomainError = sea_orm::DbErr::Custom("disk full".into()).into();
        assert!(matches!(err, DomainError::Storage(_)));
        assert!(err.is_server_error());
    }
}
