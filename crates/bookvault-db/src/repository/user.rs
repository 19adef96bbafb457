//! # User Repository
//!
//! Accounts and their optional details record.
//!
//! ## Admin Bootstrap
//! ```text
//! INSERT INTO users (..., role) VALUES (..., CASE WHEN EXISTS(SELECT 1 FROM users)
//!                                             THEN 'user' ELSE 'admin' END)
//!
//! The role is decided by the same statement that inserts the row, so two
//! concurrent first registrations cannot both become admin.
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use bookvault_core::{User, UserDetails};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at";

/// Column names reported by SQLite on unique violations.
pub const USERNAME_COLUMN: &str = "users.username";
pub const EMAIL_COLUMN: &str = "users.email";
pub const DETAILS_USER_COLUMN: &str = "user_details.user_id";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user; the first user ever becomes admin.
    ///
    /// Fails with `DbError::UniqueViolation` on `users.username` or
    /// `users.email`.
    pub async fn insert(&self, username: &str, email: &str, password_hash: &str) -> DbResult<User> {
        debug!(username = %username, "Inserting user");

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, role, created_at)
            VALUES (
                ?1, ?2, ?3,
                CASE WHEN EXISTS (SELECT 1 FROM users) THEN 'user' ELSE 'admin' END,
                ?4
            )
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn username_taken(&self, username: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn email_taken(&self, email: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM users WHERE email = ?1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    // =========================================================================
    // Details
    // =========================================================================

    /// Fails with `DbError::UniqueViolation` on `user_details.user_id` if the
    /// user already has details.
    pub async fn insert_details(
        &self,
        user_id: i64,
        full_name: &str,
        phone_number: &str,
    ) -> DbResult<UserDetails> {
        debug!(user_id, "Inserting user details");

        let details = sqlx::query_as::<_, UserDetails>(
            r#"
            INSERT INTO user_details (user_id, full_name, phone_number, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, user_id, full_name, phone_number, created_at
            "#,
        )
        .bind(user_id)
        .bind(full_name)
        .bind(phone_number)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(details)
    }

    pub async fn get_details(&self, user_id: i64) -> DbResult<Option<UserDetails>> {
        let details = sqlx::query_as::<_, UserDetails>(
            "SELECT id, user_id, full_name, phone_number, created_at FROM user_details WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(details)
    }
}
