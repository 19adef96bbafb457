//! # Service and API Errors
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service method                                                         │
//! │  Result<T, ServiceError>                                                │
//! │       │                                                                 │
//! │       ├── CoreError  (not found, conflict, validation, forbidden, auth) │
//! │       ├── AuthError  (gate rejected the caller)                         │
//! │       ├── DbError    (store fault, surfaced unchanged)                  │
//! │       └── Password   (hashing failed)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError { code, message }  +  status() → 404/409/400/403/401/500      │
//! │                                                                         │
//! │  Store and hashing faults are logged here and reach the client only    │
//! │  as a generic message.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::auth::AuthError;
use bookvault_core::{CoreError, ErrorKind, ValidationError};
use bookvault_db::DbError;

// =============================================================================
// Service Error
// =============================================================================

/// What every service method returns on failure.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Store error: {0}")]
    Store(#[from] DbError),

    #[error("Password error: {0}")]
    Password(String),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

impl ServiceError {
    /// The domain error, if this is one.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            ServiceError::Core(err) => Some(err),
            _ => None,
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// API Error
// =============================================================================

/// Transport-facing error.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "order not found: 12"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Uniqueness rule violated (409)
    Conflict,

    /// Input validation failed (400)
    ValidationError,

    /// Operation not allowed for this role or entity state (403)
    Forbidden,

    /// Missing or invalid credentials (401)
    Unauthenticated,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::NotFound => 404,
            ErrorCode::Conflict => 409,
            ErrorCode::ValidationError => 400,
            ErrorCode::Forbidden => 403,
            ErrorCode::Unauthenticated => 401,
            ErrorCode::Internal => 500,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// HTTP status code for this error.
    pub fn status(&self) -> u16 {
        self.code.status()
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match err.kind() {
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::Conflict => ErrorCode::Conflict,
            ErrorKind::Validation => ErrorCode::ValidationError,
            ErrorKind::Forbidden => ErrorCode::Forbidden,
            ErrorKind::Auth => ErrorCode::Unauthenticated,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated(_) => {
                ApiError::new(ErrorCode::Unauthenticated, "Authentication required")
            }
            AuthError::Forbidden { .. } => ApiError::new(ErrorCode::Forbidden, err.to_string()),
            AuthError::TokenIssue(e) => {
                error!("Token issue failed: {}", e);
                ApiError::internal("Could not issue token")
            }
        }
    }
}

/// Store faults: log the actual error, return a generic message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                error!("Database unavailable: {}", err);
                ApiError::internal("Database unavailable")
            }
            other => {
                error!("Database operation failed: {}", other);
                ApiError::internal("Database operation failed")
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(e) => e.into(),
            ServiceError::Auth(e) => e.into(),
            ServiceError::Store(e) => e.into(),
            ServiceError::Password(e) => {
                error!("Password hashing failed: {}", e);
                ApiError::internal("Internal error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
