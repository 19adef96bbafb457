//! Catalog operations.

use tracing::info;

use crate::error::ServiceResult;
use bookvault_core::validation::{require_all, validate_price_cents};
use bookvault_core::{BookView, CoreError, NewBook};
use bookvault_db::Database;

#[derive(Debug, Clone)]
pub struct BookService {
    db: Database,
}

impl BookService {
    pub fn new(db: Database) -> Self {
        BookService { db }
    }

    /// Add a book. New books start in stock.
    pub async fn create_book(&self, book: NewBook) -> ServiceResult<BookView> {
        require_all(&[
            book.title.as_str(),
            book.author.as_str(),
            book.description.as_str(),
        ])?;
        validate_price_cents(book.price_cents)?;

        let book = self.db.books().insert(&book).await?;
        info!(book_id = book.id, title = %book.title, "Book created");
        Ok(book.into())
    }

    pub async fn get_book(&self, book_id: i64) -> ServiceResult<BookView> {
        let book = self
            .db
            .books()
            .get_by_id(book_id)
            .await?
            .ok_or(CoreError::BookNotFound(book_id))?;
        Ok(book.into())
    }

    /// Case-insensitive exact title match.
    pub async fn get_by_title(&self, title: &str) -> ServiceResult<BookView> {
        require_all(&[title])?;

        let book = self
            .db
            .books()
            .get_by_title(title)
            .await?
            .ok_or_else(|| CoreError::BookTitleNotFound(title.to_string()))?;
        Ok(book.into())
    }

    pub async fn get_books(&self) -> ServiceResult<Vec<BookView>> {
        let books = self.db.books().list().await?;
        Ok(books.into_iter().map(BookView::from).collect())
    }

    pub async fn get_books_by_author(&self, author: &str) -> ServiceResult<Vec<BookView>> {
        let books = self.db.books().list_by_author(author).await?;
        Ok(books.into_iter().map(BookView::from).collect())
    }

    /// Flip the availability flag.
    pub async fn update_stock(&self, book_id: i64) -> ServiceResult<BookView> {
        let book = self
            .db
            .books()
            .toggle_stock(book_id)
            .await?
            .ok_or(CoreError::BookNotFound(book_id))?;

        info!(book_id, in_stock = book.in_stock, "Stock flag toggled");
        Ok(book.into())
    }

    /// Change the live price. Existing orders keep their snapshot.
    pub async fn update_price(&self, book_id: i64, price_cents: i64) -> ServiceResult<BookView> {
        validate_price_cents(price_cents)?;

        let book = self
            .db
            .books()
            .update_price(book_id, price_cents)
            .await?
            .ok_or(CoreError::BookNotFound(book_id))?;

        info!(book_id, price_cents, "Price updated");
        Ok(book.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{core, memory_db};
    use bookvault_core::validation::MAX_PRICE_CENTS;

    fn new_book(title: &str, author: &str, price_cents: i64) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.to_string(),
            description: "A novel".to_string(),
            price_cents,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let svc = BookService::new(memory_db().await);
        let dune = svc.create_book(new_book("Dune", "Frank Herbert", 1099)).await.unwrap();

        assert!(dune.in_stock);
        assert_eq!(dune.price.cents(), 1099);
        assert_eq!(svc.get_book(dune.id).await.unwrap(), dune);
        assert_eq!(svc.get_by_title("DUNE").await.unwrap().id, dune.id);

        let err = core(svc.get_book(404).await.unwrap_err());
        assert!(matches!(err, CoreError::BookNotFound(404)));

        let err = core(svc.get_by_title("Emma").await.unwrap_err());
        assert!(matches!(err, CoreError::BookTitleNotFound(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let svc = BookService::new(memory_db().await);

        let err = core(svc.create_book(new_book("", "Someone", 100)).await.unwrap_err());
        assert!(matches!(err, CoreError::EmptyFields));

        let err = core(svc.create_book(new_book("Dune", "Frank Herbert", -1)).await.unwrap_err());
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_lists() {
        let svc = BookService::new(memory_db().await);
        assert!(svc.get_books().await.unwrap().is_empty());

        svc.create_book(new_book("Emma", "Jane Austen", 800)).await.unwrap();
        svc.create_book(new_book("Persuasion", "Jane Austen", 900)).await.unwrap();
        svc.create_book(new_book("Dune", "Frank Herbert", 1099)).await.unwrap();

        assert_eq!(svc.get_books().await.unwrap().len(), 3);
        assert_eq!(svc.get_books_by_author("jane austen").await.unwrap().len(), 2);
        assert!(svc.get_books_by_author("Tolkien").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stock_and_price() {
        let svc = BookService::new(memory_db().await);
        let dune = svc.create_book(new_book("Dune", "Frank Herbert", 1099)).await.unwrap();

        assert!(!svc.update_stock(dune.id).await.unwrap().in_stock);
        assert!(svc.update_stock(dune.id).await.unwrap().in_stock);

        let repriced = svc.update_price(dune.id, 1299).await.unwrap();
        assert_eq!(repriced.price.cents(), 1299);

        let err = core(svc.update_stock(404).await.unwrap_err());
        assert!(matches!(err, CoreError::BookNotFound(404)));

        let err = core(svc.update_price(dune.id, -5).await.unwrap_err());
        assert!(matches!(err, CoreError::Validation(_)));

        let err = core(svc.update_price(dune.id, MAX_PRICE_CENTS + 1).await.unwrap_err());
        assert!(matches!(err, CoreError::Validation(_)));
        let err = core(svc.create_book(new_book("Gold", "Midas", i64::MAX)).await.unwrap_err());
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(svc.get_book(dune.id).await.unwrap().price.cents(), 1299);
    }
}
