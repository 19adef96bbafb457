//! # Access Control Table
//!
//! Roles and the set of roles allowed to invoke each protected operation.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation                                   │ admin │ user            │
//! │  ────────────────────────────────────────────┼───────┼──────           │
//! │  CreateBook, UpdateStock, UpdatePrice        │   ✓   │                 │
//! │  UpdateOrderStatus                           │   ✓   │                 │
//! │  everything else (cart, orders, reviews...)  │   ✓   │   ✓             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Register and Login are public and never pass through the gate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

// =============================================================================
// Role
// =============================================================================

/// Role assigned at registration and embedded in every issued token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Checks this role against an operation's allowed set.
    pub fn can(&self, operation: Operation) -> bool {
        operation.allowed_roles().contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role claim names no known role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

// =============================================================================
// Operation
// =============================================================================

const ADMIN_ONLY: &[Role] = &[Role::Admin];
const ANY_ROLE: &[Role] = &[Role::Admin, Role::User];

/// Every operation that sits behind the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Account
    CreateDetails,
    GetUser,

    // Catalog
    CreateBook,
    BrowseCatalog,
    UpdateStock,
    UpdatePrice,

    // Cart
    AddToCart,
    RemoveFromCart,
    UpdateQuantity,
    ClearCart,
    GetCart,

    // Orders
    CreateOrder,
    CancelOrder,
    GetOrder,
    GetUserOrders,
    GetOrdersByStatus,
    UpdateOrderStatus,

    // Reviews
    AddReview,
    ReadReviews,
    UpdateReview,
    DeleteReview,
}

impl Operation {
    /// The closed set of roles that may invoke this operation.
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Operation::CreateBook
            | Operation::UpdateStock
            | Operation::UpdatePrice
            | Operation::UpdateOrderStatus => ADMIN_ONLY,

            Operation::CreateDetails
            | Operation::GetUser
            | Operation::BrowseCatalog
            | Operation::AddToCart
            | Operation::RemoveFromCart
            | Operation::UpdateQuantity
            | Operation::ClearCart
            | Operation::GetCart
            | Operation::CreateOrder
            | Operation::CancelOrder
            | Operation::GetOrder
            | Operation::GetUserOrders
            | Operation::GetOrdersByStatus
            | Operation::AddReview
            | Operation::ReadReviews
            | Operation::UpdateReview
            | Operation::DeleteReview => ANY_ROLE,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
