//! Book reviews. A user may review the same book more than once.

use tracing::info;

use crate::error::ServiceResult;
use bookvault_core::{CoreError, Review, ReviewView, UserReviewView};
use bookvault_db::Database;

#[derive(Debug, Clone)]
pub struct ReviewService {
    db: Database,
}

impl ReviewService {
    pub fn new(db: Database) -> Self {
        ReviewService { db }
    }

    pub async fn add_review(&self, user_id: i64, book_id: i64, text: &str) -> ServiceResult<Review> {
        if text.trim().is_empty() {
            return Err(CoreError::EmptyReview.into());
        }
        if !self.db.users().exists(user_id).await? {
            return Err(CoreError::UserNotFound(user_id).into());
        }
        if !self.db.books().exists(book_id).await? {
            return Err(CoreError::BookNotFound(book_id).into());
        }

        let review = self.db.reviews().insert(user_id, book_id, text).await?;
        info!(review_id = review.id, user_id, book_id, "Review added");
        Ok(review)
    }

    pub async fn get_reviews_by_book(&self, book_id: i64) -> ServiceResult<Vec<ReviewView>> {
        Ok(self.db.reviews().list_for_book(book_id).await?)
    }

    pub async fn get_reviews_by_user(&self, user_id: i64) -> ServiceResult<Vec<UserReviewView>> {
        Ok(self.db.reviews().list_for_user(user_id).await?)
    }

    /// Rewrite the user's earliest review of the book.
    pub async fn update_review(&self, user_id: i64, book_id: i64, text: &str) -> ServiceResult<()> {
        if text.trim().is_empty() {
            return Err(CoreError::EmptyReview.into());
        }
        if !self.db.reviews().update_text(user_id, book_id, text).await? {
            return Err(CoreError::ReviewNotFound.into());
        }

        info!(user_id, book_id, "Review updated");
        Ok(())
    }

    pub async fn delete_review(&self, review_id: i64) -> ServiceResult<()> {
        if !self.db.reviews().delete(review_id).await? {
            return Err(CoreError::ReviewNotFound.into());
        }

        info!(review_id, "Review deleted");
        Ok(())
    }
}
