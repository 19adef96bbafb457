//! # Error Types
//!
//! Domain-specific error types for bookvault-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bookvault-core errors (this file)                                     │
//! │  ├── CoreError        - Domain sentinels (not found, conflict, ...)    │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bookvault-db errors (separate crate)                                  │
//! │  └── DbError          - Store failures, surfaced unchanged             │
//! │                                                                         │
//! │  bookvault-api errors                                                  │
//! │  ├── AuthError        - Unauthenticated / Forbidden                    │
//! │  ├── ServiceError     - What every service method returns              │
//! │  └── ApiError         - code + message for the transport layer         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `CoreError` variant belongs to exactly one [`ErrorKind`]; the
//! transport layer maps kinds 1:1 to client-visible outcomes.

use thiserror::Error;

// =============================================================================
// Error Kind
// =============================================================================

/// Coarse classification of domain errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced entity does not exist.
    NotFound,
    /// A uniqueness rule was violated.
    Conflict,
    /// Input was empty or malformed.
    Validation,
    /// The entity exists but is in a state that forbids the operation.
    Forbidden,
    /// Credentials were rejected.
    Auth,
}

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations and lookups that came back empty.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("book not found: {0}")]
    BookNotFound(i64),

    #[error("no book titled '{0}'")]
    BookTitleNotFound(String),

    #[error("user not found: {0}")]
    UserNotFound(i64),

    /// The user has no cart, or the cart id does not resolve.
    #[error("cart not found")]
    CartNotFound,

    #[error("book {book_id} is not in the cart")]
    CartLineNotFound { book_id: i64 },

    #[error("order not found: {0}")]
    OrderNotFound(i64),

    #[error("review not found")]
    ReviewNotFound,

    #[error("user with username '{0}' already exists")]
    UsernameExists(String),

    #[error("user with email '{0}' already exists")]
    EmailExists(String),

    #[error("details already exist for user {0}")]
    DetailsExist(i64),

    #[error("fields cannot be empty")]
    EmptyFields,

    /// Checkout was attempted without any cart lines.
    ///
    /// ## When This Occurs
    /// - The user never added anything (no cart row)
    /// - The cart exists but was cleared or already checked out
    #[error("cart is empty")]
    EmptyCart,

    #[error("review cannot be empty")]
    EmptyReview,

    /// Cancel attempted from a status other than pending/approved.
    #[error("order {order_id} is {status} and cannot be cancelled")]
    OrderCancelForbidden { order_id: i64, status: String },

    /// Only raised when strict status transitions are enabled.
    #[error("order status cannot change from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Unknown username or wrong password; deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Classifies the error for transport mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::BookNotFound(_)
            | CoreError::BookTitleNotFound(_)
            | CoreError::UserNotFound(_)
            | CoreError::CartNotFound
            | CoreError::CartLineNotFound { .. }
            | CoreError::OrderNotFound(_)
            | CoreError::ReviewNotFound => ErrorKind::NotFound,

            CoreError::UsernameExists(_)
            | CoreError::EmailExists(_)
            | CoreError::DetailsExist(_) => ErrorKind::Conflict,

            CoreError::EmptyFields
            | CoreError::EmptyCart
            | CoreError::EmptyReview
            | CoreError::Validation(_) => ErrorKind::Validation,

            CoreError::OrderCancelForbidden { .. } | CoreError::InvalidStatusTransition { .. } => {
                ErrorKind::Forbidden
            }

            CoreError::InvalidCredentials => ErrorKind::Auth,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any store access so bad input never reaches SQL.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. email without '@').
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A computed amount does not fit in an i64.
    #[error("{field} is too large")]
    Overflow { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OrderCancelForbidden {
            order_id: 7,
            status: "shipped".to_string(),
        };
        assert_eq!(err.to_string(), "order 7 is shipped and cannot be cancelled");
        assert_eq!(CoreError::EmptyCart.to_string(), "cart is empty");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(CoreError::CartNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::CartLineNotFound { book_id: 1 }.kind(), ErrorKind::NotFound);
        assert_eq!(CoreError::EmailExists("a@x.com".into()).kind(), ErrorKind::Conflict);
        assert_eq!(CoreError::EmptyCart.kind(), ErrorKind::Validation);
        assert_eq!(
            CoreError::OrderCancelForbidden {
                order_id: 1,
                status: "cancelled".into()
            }
            .kind(),
            ErrorKind::Forbidden
        );
        assert_eq!(CoreError::InvalidCredentials.kind(), ErrorKind::Auth);
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.kind(), ErrorKind::Validation);
    }
}
