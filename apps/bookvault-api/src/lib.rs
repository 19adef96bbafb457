//! # BookVault API
//!
//! Service layer and authorization gate for the bookstore backend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         BookVault Services                              │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  UserService   │  │  BookService   │  │  CartService               ││
//! │  │                │  │                │  │                            ││
//! │  │ • Register     │  │ • CreateBook   │  │ • AddToCart                ││
//! │  │ • Login        │  │ • GetBook(s)   │  │ • RemoveFromCart           ││
//! │  │ • Details      │  │ • Stock/Price  │  │ • UpdateQuantity / Clear   ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐                                │
//! │  │  OrderService  │  │ ReviewService  │                                │
//! │  │                │  │                │                                │
//! │  │ • CreateOrder  │  │ • Add / Update │                                │
//! │  │ • Cancel       │  │ • By book/user │                                │
//! │  │ • UpdateStatus │  │ • Delete       │                                │
//! │  └────────────────┘  └────────────────┘                                │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      Infrastructure                               │  │
//! │  │                                                                   │  │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│  │
//! │  │  │   SQLite     │  │   argon2id   │  │    JWT (HS256)           ││  │
//! │  │  │              │  │              │  │                          ││  │
//! │  │  │ bookvault-db │  │ Password     │  │ AuthGate: role per       ││  │
//! │  │  │ repositories │  │ hashing      │  │ Operation                ││  │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `DATABASE_PATH` - SQLite file, or `:memory:` (default: ./bookvault.db)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_LIFETIME_SECS` - Token lifetime (default: 86400)
//! - `ARGON2_MEMORY_KIB` / `ARGON2_ITERATIONS` - Hashing cost
//! - `STRICT_STATUS_TRANSITIONS` - Enforce the order lifecycle on admin updates

pub mod auth;
pub mod config;
pub mod error;
pub mod password;
pub mod services;

use std::sync::Arc;

use tracing::info;

// Re-exports
pub use auth::{AuthError, AuthGate, Clock, JwtManager, Principal, SystemClock};
pub use config::AppConfig;
pub use error::{ApiError, ErrorCode, ServiceError, ServiceResult};
pub use services::{BookService, CartService, OrderService, ReviewService, UserService};

use bookvault_db::Database;
use password::PasswordHasher;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
    pub gate: AuthGate,
    pub users: UserService,
    pub books: BookService,
    pub carts: CartService,
    pub orders: OrderService,
    pub reviews: ReviewService,
}

impl AppState {
    /// Open the database and wire every service with the system clock.
    pub async fn new(config: AppConfig) -> Result<Self, ServiceError> {
        Self::with_clock(config, Arc::new(SystemClock)).await
    }

    /// Same as [`AppState::new`] with tokens issued at the given clock's time.
    pub async fn with_clock(config: AppConfig, clock: Arc<dyn Clock>) -> Result<Self, ServiceError> {
        let db = Database::new(config.db_config()).await?;
        let hasher = PasswordHasher::new(config.argon2_memory_kib, config.argon2_iterations)?;
        let jwt = Arc::new(JwtManager::new(
            &config.jwt_secret,
            config.jwt_lifetime_secs,
            clock,
        ));

        info!(
            database = %config.database_path,
            strict_status_transitions = config.strict_status_transitions,
            "BookVault services ready"
        );

        Ok(AppState {
            gate: AuthGate::new(jwt.clone()),
            users: UserService::new(db.clone(), hasher, jwt),
            books: BookService::new(db.clone()),
            carts: CartService::new(db.clone()),
            orders: OrderService::new(db.clone(), config.strict_status_transitions),
            reviews: ReviewService::new(db.clone()),
            db,
            config,
        })
    }
}
