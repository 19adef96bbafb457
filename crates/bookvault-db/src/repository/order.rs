//! # Order Repository
//!
//! Checkout, order reads and status writes.
//!
//! ## Checkout Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │   1. SELECT cart for user             (none → rollback, EmptyCart)      │
//! │   2. SELECT lines JOIN books (live prices)                              │
//! │   3. checkout::consolidate(lines)     (empty/overflow → rollback)       │
//! │   4. INSERT orders (status 'pending', total_cents)                      │
//! │   5. INSERT order_lines (price/title/author snapshots)                  │
//! │   6. DELETE cart_lines for the cart                                     │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any error before COMMIT drops the transaction, which rolls back.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::DbResult;
use bookvault_core::checkout::{consolidate, CheckoutLine};
use bookvault_core::{CoreError, Money, Order, OrderLine, OrderStatus, OrderView};

const ORDER_COLUMNS: &str = "id, user_id, status, address, total_cents, created_at, updated_at";
const LINE_COLUMNS: &str =
    "id, order_id, book_id, title_snapshot, author_snapshot, quantity, price_cents, created_at";

/// Result of the conditional cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    NotFound,
    /// The order exists but its stored status forbids cancelling.
    NotCancellable(String),
}

/// Result of [`OrderRepository::place_order`].
#[derive(Debug)]
pub enum CheckoutOutcome {
    Placed(OrderView),
    /// The cart could not become an order; nothing was written.
    Rejected(CoreError),
}

#[derive(Debug, sqlx::FromRow)]
struct CheckoutRow {
    book_id: i64,
    title: String,
    author: String,
    price_cents: i64,
    quantity: i64,
}

#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Turns the user's cart into a pending order and drains the cart.
    ///
    /// Rejects with [`CoreError::EmptyCart`] when the user has no cart or
    /// the cart has no lines, and with an overflow validation error when the
    /// total does not fit. A rejection writes nothing.
    pub async fn place_order(&self, user_id: i64, address: &str) -> DbResult<CheckoutOutcome> {
        let mut tx = self.pool.begin().await?;

        let cart_id: Option<i64> = sqlx::query_scalar("SELECT id FROM carts WHERE user_id = ?1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(cart_id) = cart_id else {
            debug!(user_id, "Checkout without a cart");
            return Ok(CheckoutOutcome::Rejected(CoreError::EmptyCart));
        };

        let rows = sqlx::query_as::<_, CheckoutRow>(
            r#"
            SELECT cl.book_id, b.title, b.author, b.price_cents, cl.quantity
            FROM cart_lines cl
            INNER JOIN books b ON b.id = cl.book_id
            WHERE cl.cart_id = ?1
            ORDER BY cl.id
            "#,
        )
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;

        let lines: Vec<CheckoutLine> = rows
            .into_iter()
            .map(|r| {
                CheckoutLine::new(
                    r.book_id,
                    r.title,
                    r.author,
                    Money::from_cents(r.price_cents),
                    r.quantity,
                )
            })
            .collect();

        let draft = match consolidate(&lines) {
            Ok(draft) => draft,
            Err(err) => {
                debug!(user_id, cart_id, error = %err, "Checkout rejected");
                return Ok(CheckoutOutcome::Rejected(err));
            }
        };

        let now = Utc::now();

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (user_id, status, address, total_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(OrderStatus::Pending.as_str())
        .bind(address)
        .bind(draft.total.cents())
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let mut order_lines = Vec::with_capacity(draft.lines.len());
        for line in &draft.lines {
            let stored = sqlx::query_as::<_, OrderLine>(&format!(
                r#"
                INSERT INTO order_lines
                    (order_id, book_id, title_snapshot, author_snapshot, quantity, price_cents, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                RETURNING {LINE_COLUMNS}
                "#
            ))
            .bind(order.id)
            .bind(line.book_id)
            .bind(&line.title)
            .bind(&line.author)
            .bind(line.quantity)
            .bind(line.price.cents())
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;
            order_lines.push(stored);
        }

        sqlx::query("DELETE FROM cart_lines WHERE cart_id = ?1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            order_id = order.id,
            user_id,
            lines = order_lines.len(),
            total = %order.total(),
            "Order placed"
        );

        Ok(CheckoutOutcome::Placed(OrderView::new(order, order_lines)))
    }

    pub async fn get(&self, order_id: i64) -> DbResult<Option<OrderView>> {
        let mut conn = self.pool.acquire().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"
        ))
        .bind(order_id)
        .fetch_optional(&mut *conn)
        .await?;

        match order {
            Some(order) => Ok(Some(hydrate(&mut conn, order).await?)),
            None => Ok(None),
        }
    }

    pub async fn list_for_user(&self, user_id: i64) -> DbResult<Vec<OrderView>> {
        let mut conn = self.pool.acquire().await?;

        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ?1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        hydrate_all(&mut conn, orders).await
    }

    /// Case-insensitive status filter.
    pub async fn list_by_status(&self, status: &str) -> DbResult<Vec<OrderView>> {
        let mut conn = self.pool.acquire().await?;

        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE LOWER(status) = LOWER(?1) ORDER BY id"
        ))
        .bind(status.trim())
        .fetch_all(&mut *conn)
        .await?;

        hydrate_all(&mut conn, orders).await
    }

    pub async fn get_status(&self, order_id: i64) -> DbResult<Option<String>> {
        let status: Option<String> = sqlx::query_scalar("SELECT status FROM orders WHERE id = ?1")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(status)
    }

    /// Sets status `cancelled` only if the stored status is cancellable.
    ///
    /// The guard and the write are a single UPDATE; the follow-up read only
    /// runs when nothing changed, to tell "missing" from "not cancellable".
    pub async fn cancel(&self, order_id: i64) -> DbResult<CancelOutcome> {
        let [first, second] = OrderStatus::CANCELLABLE;

        let result = sqlx::query(
            r#"
            UPDATE orders SET status = ?2, updated_at = ?3
            WHERE id = ?1 AND LOWER(status) IN (?4, ?5)
            "#,
        )
        .bind(order_id)
        .bind(OrderStatus::Cancelled.as_str())
        .bind(Utc::now())
        .bind(first)
        .bind(second)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            debug!(order_id, "Order cancelled");
            return Ok(CancelOutcome::Cancelled);
        }

        Ok(match self.get_status(order_id).await? {
            Some(status) => CancelOutcome::NotCancellable(status),
            None => CancelOutcome::NotFound,
        })
    }

    /// Overwrites the status unconditionally. Returns `false` if absent.
    pub async fn update_status(&self, order_id: i64, status: &str) -> DbResult<bool> {
        let result = sqlx::query("UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(order_id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        debug!(order_id, status = %status, updated = result.rows_affected(), "Order status written");
        Ok(result.rows_affected() > 0)
    }

    /// Overwrites the status only if it still equals `expected`
    /// (case-insensitive). Returns `false` if the order changed underneath.
    pub async fn update_status_from(
        &self,
        order_id: i64,
        expected: &str,
        status: &str,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET status = ?3, updated_at = ?4
            WHERE id = ?1 AND LOWER(status) = LOWER(?2)
            "#,
        )
        .bind(order_id)
        .bind(expected)
        .bind(status)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn hydrate(conn: &mut SqliteConnection, order: Order) -> DbResult<OrderView> {
    let lines = sqlx::query_as::<_, OrderLine>(&format!(
        "SELECT {LINE_COLUMNS} FROM order_lines WHERE order_id = ?1 ORDER BY id"
    ))
    .bind(order.id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(OrderView::new(order, lines))
}

async fn hydrate_all(conn: &mut SqliteConnection, orders: Vec<Order>) -> DbResult<Vec<OrderView>> {
    let mut views = Vec::with_capacity(orders.len());
    for order in orders {
        views.push(hydrate(conn, order).await?);
    }
    Ok(views)
}
