//! # Order Service
//!
//! Checkout and the order lifecycle.
//!
//! ## State Machine
//! ```text
//!   ┌─────────┐  approve   ┌──────────┐   ship    ┌─────────┐
//!   │ pending │───────────►│ approved │──────────►│ shipped │
//!   └────┬────┘            └────┬─────┘           └─────────┘
//!        │ cancel               │ cancel
//!        ▼                      ▼
//!   ┌──────────────────────────────┐
//!   │          cancelled           │
//!   └──────────────────────────────┘
//! ```
//!
//! Cancelling is always guarded. Administrative status updates follow the
//! table only when `strict_transitions` is set; otherwise any non-empty
//! status overwrites the stored one.

use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult};
use bookvault_core::validation::require_all;
use bookvault_core::{CoreError, OrderStatus, OrderView};
use bookvault_db::{CancelOutcome, CheckoutOutcome, Database};

#[derive(Debug, Clone)]
pub struct OrderService {
    db: Database,
    strict_transitions: bool,
}

impl OrderService {
    pub fn new(db: Database, strict_transitions: bool) -> Self {
        OrderService {
            db,
            strict_transitions,
        }
    }

    /// Turn the user's cart into a pending order priced at today's prices.
    ///
    /// Reading the cart, writing the order and its lines, and draining the
    /// cart happen in one transaction.
    pub async fn create_order(&self, user_id: i64, address: &str) -> ServiceResult<OrderView> {
        require_all(&[address])?;

        match self.db.orders().place_order(user_id, address).await? {
            CheckoutOutcome::Placed(order) => Ok(order),
            CheckoutOutcome::Rejected(err) => {
                warn!(user_id, error = %err, "Checkout refused");
                Err(err.into())
            }
        }
    }

    /// Cancel a pending or approved order.
    pub async fn cancel_order(&self, order_id: i64) -> ServiceResult<()> {
        match self.db.orders().cancel(order_id).await? {
            CancelOutcome::Cancelled => {
                info!(order_id, "Order cancelled");
                Ok(())
            }
            CancelOutcome::NotFound => Err(CoreError::OrderNotFound(order_id).into()),
            CancelOutcome::NotCancellable(status) => {
                warn!(order_id, status = %status, "Cancel refused");
                Err(CoreError::OrderCancelForbidden { order_id, status }.into())
            }
        }
    }

    pub async fn get_order(&self, order_id: i64) -> ServiceResult<OrderView> {
        let order = self
            .db
            .orders()
            .get(order_id)
            .await?
            .ok_or(CoreError::OrderNotFound(order_id))?;
        Ok(order)
    }

    pub async fn get_user_orders(&self, user_id: i64) -> ServiceResult<Vec<OrderView>> {
        Ok(self.db.orders().list_for_user(user_id).await?)
    }

    /// Orders whose status matches, ignoring case.
    pub async fn get_orders_by_status(&self, status: &str) -> ServiceResult<Vec<OrderView>> {
        Ok(self.db.orders().list_by_status(status.trim()).await?)
    }

    /// Administrative status change.
    pub async fn update_status(&self, order_id: i64, status: &str) -> ServiceResult<()> {
        require_all(&[status])?;
        let next = OrderStatus::parse(status);
        let orders = self.db.orders();

        let current = orders
            .get_status(order_id)
            .await?
            .ok_or(CoreError::OrderNotFound(order_id))?;

        if self.strict_transitions {
            let from = OrderStatus::parse(&current);
            if !from.can_transition_to(&next) {
                return Err(invalid_transition(&from, &next));
            }
            // Someone else moved the order between the read and this write.
            if !orders.update_status_from(order_id, &current, next.as_str()).await? {
                let from = match orders.get_status(order_id).await? {
                    Some(now) => OrderStatus::parse(&now),
                    None => return Err(CoreError::OrderNotFound(order_id).into()),
                };
                return Err(invalid_transition(&from, &next));
            }
        } else if !orders.update_status(order_id, next.as_str()).await? {
            return Err(CoreError::OrderNotFound(order_id).into());
        }

        info!(order_id, from = %current, to = %next, "Order status updated");
        Ok(())
    }
}

fn invalid_transition(from: &OrderStatus, to: &OrderStatus) -> ServiceError {
    warn!(from = %from, to = %to, "Status transition refused");
    CoreError::InvalidStatusTransition {
        from: from.to_string(),
        to: to.to_string(),
    }
    .into()
}
