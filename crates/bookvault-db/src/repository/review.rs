//! # Review Repository
//!
//! Reviews are keyed by (user, book) but not unique; updates act on the
//! earliest review for the pair.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use bookvault_core::{Review, ReviewView, UserReviewView};

#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReviewRepository { pool }
    }

    pub async fn insert(&self, user_id: i64, book_id: i64, text: &str) -> DbResult<Review> {
        debug!(user_id, book_id, "Inserting review");

        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (user_id, book_id, text, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING id, user_id, book_id, text, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(text)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn list_for_book(&self, book_id: i64) -> DbResult<Vec<ReviewView>> {
        let reviews = sqlx::query_as::<_, ReviewView>(
            r#"
            SELECT u.username, r.text
            FROM reviews r
            INNER JOIN users u ON u.id = r.user_id
            WHERE r.book_id = ?1
            ORDER BY r.id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    pub async fn list_for_user(&self, user_id: i64) -> DbResult<Vec<UserReviewView>> {
        let reviews = sqlx::query_as::<_, UserReviewView>(
            r#"
            SELECT u.username, b.title, b.author, r.text
            FROM reviews r
            INNER JOIN users u ON u.id = r.user_id
            INNER JOIN books b ON b.id = r.book_id
            WHERE r.user_id = ?1
            ORDER BY r.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Rewrites the earliest review for (user, book). Returns `false` if
    /// the pair has none.
    pub async fn update_text(&self, user_id: i64, book_id: i64, text: &str) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE reviews SET text = ?3, updated_at = ?4
            WHERE id = (
                SELECT id FROM reviews WHERE user_id = ?1 AND book_id = ?2 ORDER BY id LIMIT 1
            )
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(text)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        debug!(user_id, book_id, updated = result.rows_affected(), "Review updated");
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, review_id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::{memory_db, new_book};

    #[tokio::test]
    async fn test_reviews_by_book_and_user() {
        let db = memory_db().await;
        let alice = db.users().insert("alice", "a@x.com", "h").await.unwrap();
        let bob = db.users().insert("bob", "b@x.com", "h").await.unwrap();
        let dune = db.books().insert(&new_book("Dune", "Herbert", 1000)).await.unwrap();
        let emma = db.books().insert(&new_book("Emma", "Austen", 800)).await.unwrap();
        let reviews = db.reviews();

        reviews.insert(alice.id, dune.id, "Spice!").await.unwrap();
        reviews.insert(bob.id, dune.id, "Too long").await.unwrap();
        reviews.insert(alice.id, emma.id, "Charming").await.unwrap();

        let for_dune = reviews.list_for_book(dune.id).await.unwrap();
        assert_eq!(for_dune.len(), 2);
        assert_eq!(for_dune[0].username, "alice");
        assert_eq!(for_dune[1].text, "Too long");

        let by_alice = reviews.list_for_user(alice.id).await.unwrap();
        assert_eq!(by_alice.len(), 2);
        assert_eq!(by_alice[1].title, "Emma");
        assert_eq!(by_alice[1].author, "Austen");
    }

    #[tokio::test]
    async fn test_update_touches_earliest_only() {
        let db = memory_db().await;
        let alice = db.users().insert("alice", "a@x.com", "h").await.unwrap();
        let dune = db.books().insert(&new_book("Dune", "Herbert", 1000)).await.unwrap();
        let reviews = db.reviews();

        let first = reviews.insert(alice.id, dune.id, "first").await.unwrap();
        reviews.insert(alice.id, dune.id, "second").await.unwrap();

        assert!(reviews.update_text(alice.id, dune.id, "edited").await.unwrap());
        let texts: Vec<String> = reviews
            .list_for_book(dune.id)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.text)
            .collect();
        assert_eq!(texts, vec!["edited".to_string(), "second".to_string()]);

        assert!(!reviews.update_text(alice.id, 999, "nope").await.unwrap());

        assert!(reviews.delete(first.id).await.unwrap());
        assert!(!reviews.delete(first.id).await.unwrap());
        assert_eq!(reviews.list_for_book(dune.id).await.unwrap().len(), 1);
    }
}
