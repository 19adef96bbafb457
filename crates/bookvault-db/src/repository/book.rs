//! # Book Repository
//!
//! Catalog storage. Prices are written here and read live by carts; orders
//! copy them at checkout and never look back.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use bookvault_core::{Book, NewBook};

const BOOK_COLUMNS: &str =
    "id, title, author, description, price_cents, in_stock, created_at, updated_at";

/// Repository for book database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.books();
/// let dune = repo.get_by_title("dune").await?;
/// let herbert = repo.list_by_author("Frank Herbert").await?;
/// ```
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Inserts a new book, in stock.
    pub async fn insert(&self, book: &NewBook) -> DbResult<Book> {
        let now = Utc::now();

        debug!(title = %book.title, price_cents = book.price_cents, "Inserting book");

        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, description, price_cents, in_stock, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.description)
        .bind(book.price_cents)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Book>> {
        debug!(id, "Getting book by ID");

        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Case-insensitive exact title match; the oldest book wins on ties.
    pub async fn get_by_title(&self, title: &str) -> DbResult<Option<Book>> {
        debug!(title = %title, "Getting book by title");

        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE LOWER(title) = LOWER(?1) ORDER BY id LIMIT 1"
        ))
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    pub async fn list(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = books.len(), "Listed books");
        Ok(books)
    }

    /// Case-insensitive exact author match.
    pub async fn list_by_author(&self, author: &str) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE LOWER(author) = LOWER(?1) ORDER BY id"
        ))
        .bind(author)
        .fetch_all(&self.pool)
        .await?;

        debug!(author = %author, count = books.len(), "Listed books by author");
        Ok(books)
    }

    /// Flips `in_stock` and returns the updated row, or `None` if absent.
    pub async fn toggle_stock(&self, id: i64) -> DbResult<Option<Book>> {
        debug!(id, "Toggling stock flag");

        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books
            SET in_stock = CASE in_stock WHEN 0 THEN 1 ELSE 0 END,
                updated_at = ?2
            WHERE id = ?1
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Sets the catalog price. Existing orders keep their snapshot.
    pub async fn update_price(&self, id: i64, price_cents: i64) -> DbResult<Option<Book>> {
        debug!(id, price_cents, "Updating book price");

        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books SET price_cents = ?2, updated_at = ?3
            WHERE id = ?1
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(price_cents)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    pub async fn exists(&self, id: i64) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM books WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Total number of books (used by the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
