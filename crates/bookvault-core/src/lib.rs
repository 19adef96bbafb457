//! # bookvault-core: Pure Business Logic for BookVault
//!
//! This crate holds the rules of the bookstore with zero I/O dependencies:
//! how a cart turns into an order, which order statuses may follow which,
//! and which roles may invoke which operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       BookVault Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               Request handlers (external)                       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ function calls                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        bookvault-api: AuthGate + services + config              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ bookvault-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  types   │ │  money   │ │ checkout │ │  status  │          │   │
//! │  │   │  Book    │ │  Money   │ │  Draft   │ │ Pending  │          │   │
//! │  │   │  Views   │ │          │ │  Lines   │ │ Approved │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              bookvault-db (SQLite repositories)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records and views (Book, User, CartView, OrderView, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`status`] - Order status state machine
//! - [`access`] - Roles and the per-operation allowed-role table
//! - [`checkout`] - Cart consolidation into an order draft
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use bookvault_core::checkout::{consolidate, CheckoutLine};
//! use bookvault_core::money::Money;
//!
//! let lines = vec![
//!     CheckoutLine::new(1, "Dune", "Herbert", Money::from_cents(1000), 2),
//!     CheckoutLine::new(2, "Emma", "Austen", Money::from_cents(2000), 1),
//! ];
//!
//! let draft = consolidate(&lines).expect("priced cart");
//! assert_eq!(draft.total.cents(), 4000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod checkout;
pub mod error;
pub mod money;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use access::{Operation, Role};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use status::OrderStatus;
pub use types::*;
