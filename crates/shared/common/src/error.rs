//! Unified error handling for the storage and service layers.
//!
//! Provides a single error type with stable codes and user-facing messages
//! that hide storage internals.

use domain::DomainError;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    /// A uniqueness rule would be broken; carries the offending field
    #[error("Constraint violation: {0} already exists")]
    ConstraintViolation(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::ConstraintViolation(_) => "CONSTRAINT_VIOLATION",
            AppError::Validation(_) => "VALIDATION_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::ConstraintViolation(field) => format!("{} already exists", field),

            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// True when the error is a uniqueness violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, AppError::ConstraintViolation(_))
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::IdAlreadyAssigned(id) => {
                AppError::Validation(format!("User already has id {}", id))
            }
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn constraint_violation(field: impl Into<String>) -> Self {
        AppError::ConstraintViolation(field.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::UserId;

    #[test]
    fn test_codes() {
        assert_eq!(AppError::NotFound.code(), "NOT_FOUND");
        assert_eq!(
            AppError::constraint_violation("email").code(),
            "CONSTRAINT_VIOLATION"
        );
        assert_eq!(AppError::validation("bad").code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::internal("connection reset by peer");
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_constraint_violation_message() {
        let err = AppError::constraint_violation("email");
        assert!(err.is_constraint_violation());
        assert_eq!(err.user_message(), "email already exists");
    }

    #[test]
    fn test_from_domain_error() {
        let err: AppError = DomainError::validation("Unknown user role: OWNER").into();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Unknown user role: OWNER"));

        let err: AppError = DomainError::IdAlreadyAssigned(UserId::new(3)).into();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_ok_or_not_found() {
        let missing: Option<u8> = None;
        assert!(matches!(missing.ok_or_not_found(), Err(AppError::NotFound)));
        assert_eq!(Some(4).ok_or_not_found().unwrap(), 4);
    }
}
