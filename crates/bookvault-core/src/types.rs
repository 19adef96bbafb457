//! # Domain Types
//!
//! Stored records and the read projections handed back to callers.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Records (rows)            Views (returned to handlers)                 │
//! │  ─────────────             ────────────────────────────                 │
//! │  Book          ──────────► BookView                                     │
//! │  User + UserDetails ─────► UserView                                     │
//! │  Cart + lines + books ───► CartView { lines: [CartLineView], subtotal } │
//! │  Order + OrderLine ──────► OrderView { lines: [OrderLineView] }         │
//! │  Review + User + Book ───► ReviewView / UserReviewView                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `OrderLine` freezes price, title and author at checkout. Editing a book
//! afterwards never changes an existing order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::access::Role;
use crate::money::Money;

// =============================================================================
// Book
// =============================================================================

/// A catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: String,

    /// Current price in cents. Only ever read live by carts.
    pub price_cents: i64,

    /// Toggled by the stock-update operation, never by orders.
    pub in_stock: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Book {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Input for adding a book to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: String,
    pub price_cents: i64,
}

/// Catalog projection without bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookView {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: Money,
    pub in_stock: bool,
}

impl From<Book> for BookView {
    fn from(book: Book) -> Self {
        BookView {
            id: book.id,
            price: book.price(),
            title: book.title,
            author: book.author,
            description: book.description,
            in_stock: book.in_stock,
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A registered account.
///
/// `password_hash` is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Optional profile sub-record, at most one per user.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct UserDetails {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub phone_number: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Account projection; details are absent until created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

impl UserView {
    pub fn new(user: User, details: Option<UserDetails>) -> Self {
        let (full_name, phone_number) = match details {
            Some(d) => (Some(d.full_name), Some(d.phone_number)),
            None => (None, None),
        };

        UserView {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            full_name,
            phone_number,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One cart per user; survives being emptied.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A cart line joined with the book's current catalog data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLineView {
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub description: String,
    /// Live price; changes whenever the catalog price does.
    pub price: Money,
    pub in_stock: bool,
    pub quantity: i64,
}

impl CartLineView {
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartView {
    pub id: i64,
    pub user_id: i64,
    pub lines: Vec<CartLineView>,
    pub subtotal: Money,
}

impl CartView {
    /// Builds the view and computes the live subtotal.
    pub fn new(id: i64, user_id: i64, lines: Vec<CartLineView>) -> Self {
        let subtotal = lines.iter().map(CartLineView::line_total).sum();
        CartView {
            id,
            user_id,
            lines,
            subtotal,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Order
// =============================================================================

/// An immutable checkout record; only `status` changes after insert.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    /// Stored as free text; see [`crate::status::OrderStatus::parse`].
    pub status: String,
    pub address: String,
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line of an order with frozen book data.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub book_id: i64,
    /// Title at time of order (frozen).
    pub title_snapshot: String,
    /// Author at time of order (frozen).
    pub author_snapshot: String,
    pub quantity: i64,
    /// Unit price in cents at time of order (frozen).
    pub price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLineView {
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub quantity: i64,
    pub price: Money,
}

impl From<OrderLine> for OrderLineView {
    fn from(line: OrderLine) -> Self {
        OrderLineView {
            book_id: line.book_id,
            title: line.title_snapshot,
            author: line.author_snapshot,
            quantity: line.quantity,
            price: Money::from_cents(line.price_cents),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderView {
    pub id: i64,
    pub user_id: i64,
    pub status: String,
    pub total: Money,
    pub address: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

impl OrderView {
    pub fn new(order: Order, lines: Vec<OrderLine>) -> Self {
        OrderView {
            id: order.id,
            user_id: order.user_id,
            total: order.total(),
            status: order.status,
            address: order.address,
            created_at: order.created_at,
            lines: lines.into_iter().map(OrderLineView::from).collect(),
        }
    }
}

// =============================================================================
// Review
// =============================================================================

/// Free-text annotation keyed by (user, book). Not unique per pair.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    pub book_id: i64,
    pub text: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A review as listed under a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ReviewView {
    pub username: String,
    pub text: String,
}

/// A review as listed under its author's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct UserReviewView {
    pub username: String,
    pub title: String,
    pub author: String,
    pub text: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
