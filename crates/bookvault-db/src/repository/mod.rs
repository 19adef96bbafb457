//! # Repository Module
//!
//! One repository per aggregate, each a thin owner of a cloned pool.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service (bookvault-api)                                                │
//! │       │                                                                 │
//! │       │  db.carts().add_line(cart_id, book_id, 2)                       │
//! │       ▼                                                                 │
//! │  CartRepository ── SQL ──► SQLite                                       │
//! │                                                                         │
//! │  Lookups return Option<T>; the service decides which domain error a     │
//! │  missing row means. Repositories only return DbError for store faults   │
//! │  and constraint violations.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BookRepository`](book::BookRepository) - Catalog
//! - [`UserRepository`](user::UserRepository) - Accounts and details
//! - [`CartRepository`](cart::CartRepository) - Carts and line upserts
//! - [`OrderRepository`](order::OrderRepository) - Checkout and status
//! - [`ReviewRepository`](review::ReviewRepository) - Reviews

pub mod book;
pub mod cart;
pub mod order;
pub mod review;
pub mod user;
