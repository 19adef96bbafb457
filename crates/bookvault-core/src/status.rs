//! # Order Status
//!
//! The order lifecycle as a small state machine.
//!
//! ```text
//!            ┌──────────┐   approve   ┌──────────┐   ship    ┌──────────┐
//!  create ──►│ pending  │────────────►│ approved │──────────►│ shipped  │
//!            └────┬─────┘             └────┬─────┘           └──────────┘
//!                 │ cancel                 │ cancel
//!                 │       ┌───────────┐    │
//!                 └──────►│ cancelled │◄───┘
//!                         └───────────┘
//! ```
//!
//! Statuses are stored as text. Administrative updates may write any
//! non-empty string unless strict transitions are enabled, so a stored value
//! can fall outside the four known states; those parse to
//! [`OrderStatus::Custom`] and allow no further transitions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Approved,
    Shipped,
    Cancelled,
    /// Any other value an administrator wrote.
    Custom(String),
}

impl OrderStatus {
    /// Parses a stored status, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "pending" => OrderStatus::Pending,
            "approved" => OrderStatus::Approved,
            "shipped" => OrderStatus::Shipped,
            "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Custom(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Custom(s) => s,
        }
    }

    /// Whether the lifecycle permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: &OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Approved)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Approved, OrderStatus::Shipped)
                | (OrderStatus::Approved, OrderStatus::Cancelled)
        )
    }

    /// Cancel is only allowed from `pending` or `approved`.
    #[inline]
    pub fn is_cancellable(&self) -> bool {
        self.can_transition_to(&OrderStatus::Cancelled)
    }

    /// Stored values that [`is_cancellable`](Self::is_cancellable) accepts,
    /// for use in a conditional `UPDATE ... WHERE LOWER(status) IN (...)`.
    pub const CANCELLABLE: [&'static str; 2] = ["pending", "approved"];
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(OrderStatus::parse(&raw))
    }
}
