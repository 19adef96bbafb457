//! # bookvault-db: Database Layer for BookVault
//!
//! SQLite storage for the bookstore via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BookVault Data Flow                              │
//! │                                                                         │
//! │  OrderService::create_order                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  bookvault-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │   │   │
//! │  │   │               │    │ BookRepo      │    │              │   │   │
//! │  │   │ SqlitePool    │◄───│ UserRepo      │    │ 001_init.sql │   │   │
//! │  │   │               │    │ CartRepo      │    │              │   │   │
//! │  │   │               │    │ OrderRepo     │    │              │   │   │
//! │  │   │               │    │ ReviewRepo    │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL) or :memory: for tests                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bookvault_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./bookvault.db")).await?;
//! let books = db.books().list().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::book::BookRepository;
pub use repository::cart::CartRepository;
pub use repository::order::{CancelOutcome, CheckoutOutcome, OrderRepository};
pub use repository::review::ReviewRepository;
pub use repository::user::UserRepository;
