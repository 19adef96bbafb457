//! # Cart Repository
//!
//! One cart per user, provisioned on first add and kept when emptied.
//!
//! ## Line Upsert
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_line(cart, book, 2)   → INSERT (cart, book, 2)                     │
//! │  add_line(cart, book, 3)   → ON CONFLICT(cart_id, book_id)              │
//! │                              DO UPDATE SET quantity = quantity + 3      │
//! │                              WHERE quantity <= MAX_QUANTITY - 3         │
//! │                                                                         │
//! │  One statement: concurrent adds for the same book never lose a count,   │
//! │  and a merge past MAX_QUANTITY changes nothing.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use bookvault_core::validation::MAX_QUANTITY;
use bookvault_core::{CartLineView, CartView, Money};

#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

/// A cart line joined with the book's current catalog row.
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    book_id: i64,
    title: String,
    author: String,
    description: String,
    price_cents: i64,
    in_stock: bool,
    quantity: i64,
}

impl From<CartLineRow> for CartLineView {
    fn from(row: CartLineRow) -> Self {
        CartLineView {
            book_id: row.book_id,
            title: row.title,
            author: row.author,
            description: row.description,
            price: Money::from_cents(row.price_cents),
            in_stock: row.in_stock,
            quantity: row.quantity,
        }
    }
}

impl CartRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    pub async fn cart_id_for_user(&self, user_id: i64) -> DbResult<Option<i64>> {
        let id: Option<i64> = sqlx::query_scalar("SELECT id FROM carts WHERE user_id = ?1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    /// Returns the user's cart id, creating the cart if needed.
    pub async fn ensure_cart(&self, user_id: i64) -> DbResult<i64> {
        sqlx::query(
            "INSERT INTO carts (user_id, created_at) VALUES (?1, ?2) ON CONFLICT(user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let id: i64 = sqlx::query_scalar("SELECT id FROM carts WHERE user_id = ?1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        debug!(user_id, cart_id = id, "Cart resolved");
        Ok(id)
    }

    /// Inserts a line or adds `quantity` to the existing one.
    ///
    /// Returns `false`, leaving the line untouched, when the merged quantity
    /// would exceed [`MAX_QUANTITY`].
    pub async fn add_line(&self, cart_id: i64, book_id: i64, quantity: i64) -> DbResult<bool> {
        debug!(cart_id, book_id, quantity, "Upserting cart line");

        let result = sqlx::query(
            r#"
            INSERT INTO cart_lines (cart_id, book_id, quantity, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(cart_id, book_id)
            DO UPDATE SET quantity = quantity + excluded.quantity
            WHERE quantity <= ?5 - excluded.quantity
            "#,
        )
        .bind(cart_id)
        .bind(book_id)
        .bind(quantity)
        .bind(Utc::now())
        .bind(MAX_QUANTITY)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes one line. Returns `false` if there was none for that book.
    pub async fn remove_line(&self, cart_id: i64, book_id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE cart_id = ?1 AND book_id = ?2")
            .bind(cart_id)
            .bind(book_id)
            .execute(&self.pool)
            .await?;

        debug!(cart_id, book_id, removed = result.rows_affected(), "Removed cart line");
        Ok(result.rows_affected() > 0)
    }

    /// Overwrites a line's quantity. Returns `false` if there was no line.
    pub async fn set_quantity(&self, cart_id: i64, book_id: i64, quantity: i64) -> DbResult<bool> {
        let result = sqlx::query(
            "UPDATE cart_lines SET quantity = ?3 WHERE cart_id = ?1 AND book_id = ?2",
        )
        .bind(cart_id)
        .bind(book_id)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes every line; the cart row stays.
    pub async fn clear(&self, cart_id: i64) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE cart_id = ?1")
            .bind(cart_id)
            .execute(&self.pool)
            .await?;

        debug!(cart_id, removed = result.rows_affected(), "Cleared cart");
        Ok(result.rows_affected())
    }

    /// Cart projection with live book data, or `None` if the id is unknown.
    pub async fn snapshot(&self, cart_id: i64) -> DbResult<Option<CartView>> {
        let owner: Option<i64> = sqlx::query_scalar("SELECT user_id FROM carts WHERE id = ?1")
            .bind(cart_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(user_id) = owner else {
            return Ok(None);
        };

        let rows = sqlx::query_as::<_, CartLineRow>(
            r#"
            SELECT cl.book_id, b.title, b.author, b.description, b.price_cents, b.in_stock, cl.quantity
            FROM cart_lines cl
            INNER JOIN books b ON b.id = cl.book_id
            WHERE cl.cart_id = ?1
            ORDER BY cl.id
            "#,
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        let lines = rows.into_iter().map(CartLineView::from).collect();
        Ok(Some(CartView::new(cart_id, user_id, lines)))
    }

    pub async fn snapshot_for_user(&self, user_id: i64) -> DbResult<Option<CartView>> {
        match self.cart_id_for_user(user_id).await? {
            Some(cart_id) => self.snapshot(cart_id).await,
            None => Ok(None),
        }
    }
}
