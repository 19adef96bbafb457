//! # Validation Module
//!
//! Input checks that run in the service layer before any store access.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Service call (Rust)                                           │
//! │  └── THIS MODULE: required fields, bounded quantities and prices        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  ├── UNIQUE (username, email, one cart per user, one line per book)     │
//! │  └── Foreign keys                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bookvault_core::validation::{validate_quantity, validate_required};
//!
//! validate_required("address", "12 Elm St").unwrap();
//! validate_quantity(2).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::{CoreError, ValidationError};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted username.
pub const MAX_USERNAME_LEN: usize = 64;

/// Largest quantity a single cart line may hold.
pub const MAX_QUANTITY: i64 = 10_000;

/// Largest accepted book price, in cents ($1,000,000.00).
///
/// `MAX_QUANTITY * MAX_PRICE_CENTS` stays far below `i64::MAX`, so a
/// validated line total cannot overflow.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Rejects empty or whitespace-only text.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Checks that every value is non-blank.
///
/// Operations that report a single "fields cannot be empty" sentinel use
/// this instead of naming the offending field.
///
/// ## Example
/// ```rust
/// use bookvault_core::validation::require_all;
/// use bookvault_core::CoreError;
///
/// assert!(require_all(&["Dune", "Herbert"]).is_ok());
/// assert!(matches!(require_all(&["Dune", " "]), Err(CoreError::EmptyFields)));
/// ```
pub fn require_all(values: &[&str]) -> Result<(), CoreError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(CoreError::EmptyFields);
    }
    Ok(())
}

/// Validates a username.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_USERNAME_LEN`] characters
/// - No whitespace
pub fn validate_username(username: &str) -> ValidationResult<()> {
    validate_required("username", username)?;

    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME_LEN,
        });
    }

    if username.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address loosely: one `@` with text on both sides.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_required("email", email)?;

    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain".to_string(),
        }),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - At most [`MAX_QUANTITY`]
///
/// ```text
/// add_to_cart(book, qty)
///       │
///       ├── qty <= 0?            → ValidationError::MustBePositive
///       ├── qty > MAX_QUANTITY?  → ValidationError::OutOfRange
///       │
///       └── OK → upsert cart line
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if qty > MAX_QUANTITY {
        return Err(quantity_out_of_range());
    }
    Ok(())
}

/// The error for a quantity above [`MAX_QUANTITY`], including a merged one.
pub fn quantity_out_of_range() -> ValidationError {
    ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max: MAX_QUANTITY,
    }
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free books)
/// - At most [`MAX_PRICE_CENTS`]
///
/// ## Example
/// ```rust
/// use bookvault_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(i64::MAX).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
