//! # Cart Service
//!
//! Per-user basket of (book, quantity) lines.
//!
//! ```text
//! add_to_cart(user, book, qty)
//!       │
//!       ├── book missing?  → BookNotFound
//!       ├── user missing?  → UserNotFound
//!       ├── qty outside 1..=MAX_QUANTITY? → Validation
//!       │
//!       ├── ensure_cart(user)        INSERT .. ON CONFLICT(user_id) DO NOTHING
//!       └── add_line(cart, book, qty) INSERT .. ON CONFLICT DO UPDATE
//!                                     SET quantity = quantity + excluded.quantity
//!                                     (merge past MAX_QUANTITY → Validation)
//! ```
//!
//! The cart row outlives its lines: removing the last line, clearing and
//! checking out all leave an empty cart behind.

use tracing::{info, warn};

use crate::error::ServiceResult;
use bookvault_core::validation::{quantity_out_of_range, validate_quantity};
use bookvault_core::{CartView, CoreError};
use bookvault_db::Database;

#[derive(Debug, Clone)]
pub struct CartService {
    db: Database,
}

impl CartService {
    pub fn new(db: Database) -> Self {
        CartService { db }
    }

    /// Add `quantity` copies of a book, merging with an existing line.
    pub async fn add_to_cart(&self, user_id: i64, book_id: i64, quantity: i64) -> ServiceResult<()> {
        if !self.db.books().exists(book_id).await? {
            return Err(CoreError::BookNotFound(book_id).into());
        }
        if !self.db.users().exists(user_id).await? {
            return Err(CoreError::UserNotFound(user_id).into());
        }
        validate_quantity(quantity)?;

        let carts = self.db.carts();
        let cart_id = carts.ensure_cart(user_id).await?;
        if !carts.add_line(cart_id, book_id, quantity).await? {
            warn!(user_id, cart_id, book_id, quantity, "Cart line would exceed the quantity limit");
            return Err(CoreError::from(quantity_out_of_range()).into());
        }

        info!(user_id, cart_id, book_id, quantity, "Added to cart");
        Ok(())
    }

    pub async fn remove_from_cart(&self, user_id: i64, book_id: i64) -> ServiceResult<()> {
        let carts = self.db.carts();
        let cart_id = self.cart_id(user_id).await?;

        if !carts.remove_line(cart_id, book_id).await? {
            return Err(CoreError::CartLineNotFound { book_id }.into());
        }

        info!(user_id, cart_id, book_id, "Removed from cart");
        Ok(())
    }

    /// Overwrite a line's quantity.
    pub async fn update_quantity(&self, user_id: i64, book_id: i64, quantity: i64) -> ServiceResult<()> {
        let carts = self.db.carts();
        let cart_id = self.cart_id(user_id).await?;
        validate_quantity(quantity)?;

        if !carts.set_quantity(cart_id, book_id, quantity).await? {
            return Err(CoreError::CartLineNotFound { book_id }.into());
        }

        info!(user_id, cart_id, book_id, quantity, "Cart quantity set");
        Ok(())
    }

    pub async fn clear_cart(&self, user_id: i64) -> ServiceResult<()> {
        let cart_id = self.cart_id(user_id).await?;
        let removed = self.db.carts().clear(cart_id).await?;

        info!(user_id, cart_id, removed, "Cart cleared");
        Ok(())
    }

    /// Cart contents priced at the books' current prices.
    pub async fn get_cart(&self, cart_id: i64) -> ServiceResult<CartView> {
        let cart = self
            .db
            .carts()
            .snapshot(cart_id)
            .await?
            .ok_or(CoreError::CartNotFound)?;
        Ok(cart)
    }

    pub async fn cart_for_user(&self, user_id: i64) -> ServiceResult<CartView> {
        let cart = self
            .db
            .carts()
            .snapshot_for_user(user_id)
            .await?
            .ok_or(CoreError::CartNotFound)?;
        Ok(cart)
    }

    async fn cart_id(&self, user_id: i64) -> ServiceResult<i64> {
        let id = self
            .db
            .carts()
            .cart_id_for_user(user_id)
            .await?
            .ok_or(CoreError::CartNotFound)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{core, memory_db, seed_book, seed_user};
    use bookvault_core::validation::MAX_QUANTITY;
    use bookvault_core::ValidationError;

    #[tokio::test]
    async fn test_add_merges_lines() {
        let db = memory_db().await;
        let svc = CartService::new(db.clone());
        let user = seed_user(&db, "bob").await;
        let book = seed_book(&db, "Dune", 1000).await;

        svc.add_to_cart(user, book, 2).await.unwrap();
        svc.add_to_cart(user, book, 3).await.unwrap();

        let cart = svc.cart_for_user(user).await.unwrap();
        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 5);
        assert_eq!(cart.subtotal.cents(), 5000);

        assert_eq!(svc.get_cart(cart.id).await.unwrap().user_id, user);
    }

    #[tokio::test]
    async fn test_add_failures() {
        let db = memory_db().await;
        let svc = CartService::new(db.clone());
        let user = seed_user(&db, "bob").await;
        let book = seed_book(&db, "Dune", 1000).await;

        let err = core(svc.add_to_cart(user, 404, 1).await.unwrap_err());
        assert!(matches!(err, CoreError::BookNotFound(404)));

        let err = core(svc.add_to_cart(404, book, 1).await.unwrap_err());
        assert!(matches!(err, CoreError::UserNotFound(404)));

        let err = core(svc.add_to_cart(user, book, 0).await.unwrap_err());
        assert!(matches!(err, CoreError::Validation(_)));

        let err = core(svc.cart_for_user(user).await.unwrap_err());
        assert!(matches!(err, CoreError::CartNotFound));
    }

    #[tokio::test]
    async fn test_quantity_limits() {
        let db = memory_db().await;
        let svc = CartService::new(db.clone());
        let user = seed_user(&db, "bob").await;
        let book = seed_book(&db, "Dune", 1000).await;

        let err = core(svc.add_to_cart(user, book, i64::MAX / 100).await.unwrap_err());
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));

        let err = core(svc.add_to_cart(user, book, i64::MAX).await.unwrap_err());
        assert!(matches!(err, CoreError::Validation(_)));

        svc.add_to_cart(user, book, MAX_QUANTITY).await.unwrap();
        let err = core(svc.add_to_cart(user, book, 1).await.unwrap_err());
        assert!(matches!(err, CoreError::Validation(ValidationError::OutOfRange { .. })));

        let cart = svc.cart_for_user(user).await.unwrap();
        assert_eq!(cart.lines[0].quantity, MAX_QUANTITY);
        assert_eq!(cart.subtotal.cents(), 1000 * MAX_QUANTITY);

        let err = core(svc.update_quantity(user, book, MAX_QUANTITY + 1).await.unwrap_err());
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_remove_update_clear() {
        let db = memory_db().await;
        let svc = CartService::new(db.clone());
        let user = seed_user(&db, "bob").await;
        let dune = seed_book(&db, "Dune", 1000).await;
        let emma = seed_book(&db, "Emma", 2000).await;

        let err = core(svc.remove_from_cart(user, dune).await.unwrap_err());
        assert!(matches!(err, CoreError::CartNotFound));

        svc.add_to_cart(user, dune, 2).await.unwrap();
        svc.add_to_cart(user, emma, 1).await.unwrap();

        svc.update_quantity(user, dune, 7).await.unwrap();
        let cart = svc.cart_for_user(user).await.unwrap();
        assert_eq!(cart.lines[0].quantity, 7);

        let err = core(svc.update_quantity(user, dune, -1).await.unwrap_err());
        assert!(matches!(err, CoreError::Validation(_)));

        svc.remove_from_cart(user, emma).await.unwrap();
        let err = core(svc.remove_from_cart(user, emma).await.unwrap_err());
        assert!(matches!(err, CoreError::CartLineNotFound { book_id } if book_id == emma));

        let err = core(svc.update_quantity(user, emma, 1).await.unwrap_err());
        assert!(matches!(err, CoreError::CartLineNotFound { .. }));

        svc.clear_cart(user).await.unwrap();
        let cart = svc.cart_for_user(user).await.unwrap();
        assert!(cart.is_empty());
        assert!(cart.subtotal.is_zero());
    }

    #[tokio::test]
    async fn test_unknown_cart_id() {
        let svc = CartService::new(memory_db().await);
        let err = core(svc.get_cart(404).await.unwrap_err());
        assert!(matches!(err, CoreError::CartNotFound));

        let err = core(svc.clear_cart(1).await.unwrap_err());
        assert!(matches!(err, CoreError::CartNotFound));
    }
}
