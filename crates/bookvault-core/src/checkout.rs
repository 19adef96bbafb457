//! # Checkout
//!
//! Consolidates cart lines into an order draft: one order line per cart
//! line, each carrying the book's price at this instant, and a total that is
//! computed once and then stored.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartLine + Book (live)          OrderDraft (frozen)                    │
//! │  ──────────────────────          ───────────────────                    │
//! │  book 1, qty 2, $10.00   ──►     line: book 1, qty 2, @ $10.00          │
//! │  book 2, qty 1, $20.00   ──►     line: book 2, qty 1, @ $20.00          │
//! │                                  total: $40.00                          │
//! │                                                                         │
//! │  No lines         → EmptyCart                                           │
//! │  Total past i64   → Validation(Overflow), nothing is stored             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

/// A cart line resolved against the catalog at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub book_id: i64,
    pub title: String,
    pub author: String,
    pub price: Money,
    pub quantity: i64,
}

impl CheckoutLine {
    pub fn new(
        book_id: i64,
        title: impl Into<String>,
        author: impl Into<String>,
        price: Money,
        quantity: i64,
    ) -> Self {
        CheckoutLine {
            book_id,
            title: title.into(),
            author: author.into(),
            price,
            quantity,
        }
    }

    /// Price times quantity, or `None` if it does not fit.
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.price.checked_multiply_quantity(self.quantity)
    }
}

/// What gets persisted as an order plus its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub lines: Vec<CheckoutLine>,
    pub total: Money,
}

/// Turns cart lines into an order draft.
///
/// Line order is preserved. Fails with [`CoreError::EmptyCart`] when there
/// are no lines and with an overflow validation error when a line total or
/// the order total does not fit in an i64.
pub fn consolidate(lines: &[CheckoutLine]) -> CoreResult<OrderDraft> {
    if lines.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let total = lines
        .iter()
        .try_fold(Money::zero(), |acc, line| {
            line.line_total().and_then(|amount| acc.checked_add(amount))
        })
        .ok_or_else(|| ValidationError::Overflow {
            field: "total".to_string(),
        })?;

    Ok(OrderDraft {
        lines: lines.to_vec(),
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cart_has_no_draft() {
        assert!(matches!(consolidate(&[]), Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_total_and_line_order() {
        let lines = vec![
            CheckoutLine::new(1, "Dune", "Herbert", Money::from_cents(1000), 2),
            CheckoutLine::new(2, "Emma", "Austen", Money::from_cents(2000), 1),
        ];

        let draft = consolidate(&lines).unwrap();
        assert_eq!(draft.total, Money::from_cents(4000));
        assert_eq!(draft.lines.len(), 2);
        assert_eq!(draft.lines[0].book_id, 1);
        assert_eq!(draft.lines[1].price, Money::from_cents(2000));
    }

    #[test]
    fn test_free_book_contributes_nothing() {
        let lines = vec![
            CheckoutLine::new(5, "Free Sample", "Anon", Money::zero(), 3),
            CheckoutLine::new(6, "Paid", "Anon", Money::from_cents(1299), 1),
        ];
        assert_eq!(consolidate(&lines).unwrap().total.cents(), 1299);
    }

    #[test]
    fn test_overflowing_line_is_rejected() {
        let lines = vec![CheckoutLine::new(
            1,
            "Dune",
            "Herbert",
            Money::from_cents(1000),
            i64::MAX / 100,
        )];
        let err = consolidate(&lines).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Overflow { ref field }) if field == "total"
        ));
    }

    #[test]
    fn test_overflowing_sum_is_rejected() {
        let lines = vec![
            CheckoutLine::new(1, "Dune", "Herbert", Money::from_cents(i64::MAX), 1),
            CheckoutLine::new(2, "Emma", "Austen", Money::from_cents(1), 1),
        ];
        assert!(matches!(
            consolidate(&lines),
            Err(CoreError::Validation(ValidationError::Overflow { .. }))
        ));
    }
}
