//! # Service Layer
//!
//! One service per aggregate. Each holds a cloned [`Database`] handle and
//! turns missing rows and constraint violations into [`CoreError`]s.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  handler ── AuthGate::authorize(header, Operation) ── Principal         │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  UserService   BookService   CartService   OrderService  ReviewService  │
//! │     │               │             │             │             │         │
//! │     └───────────────┴──── Database (SqlitePool) ┴─────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`Database`]: bookvault_db::Database
//! [`CoreError`]: bookvault_core::CoreError

pub mod book_service;
pub mod cart_service;
pub mod order_service;
pub mod review_service;
pub mod user_service;

pub use book_service::BookService;
pub use cart_service::CartService;
pub use order_service::OrderService;
pub use review_service::ReviewService;
pub use user_service::UserService;
