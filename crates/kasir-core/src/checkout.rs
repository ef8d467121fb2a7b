//! # Checkout Pricing
//!
//! Pure pricing and stock checks for a checkout, independent of storage.
//!
//! ## Flow
//! ```text
//! CheckoutItem (product_id, qty)
//!      │  storage looks up the product
//!      ▼
//! ProductSnapshot (id, name, price, stock)
//!      │  CheckoutPlan::add_line
//!      ├── stock < qty      → CoreError::InsufficientStock
//!      ├── price × qty overflows → CoreError::AmountOverflow
//!      ▼
//! PlannedLine (name + unit price frozen, subtotal)
//!      │
//!      ▼
//! CheckoutPlan::total() = Σ subtotal
//! ```
//!
//! The plan is built before any write happens. The storage layer applies
//! the planned lines afterwards, still inside one transaction.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::CheckoutItem;
use crate::validation::validate_quantity;

/// The product fields a checkout line needs, as read inside the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductSnapshot {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub stock: i64,
}

/// A priced line, ready to be written as a sale detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedLine {
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub subtotal: Money,
}

/// Accumulates priced lines and the running total for one checkout.
#[derive(Debug, Clone, Default)]
pub struct CheckoutPlan {
    lines: Vec<PlannedLine>,
    total: Money,
}

impl CheckoutPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prices one requested line against the product it refers to.
    ///
    /// The stock check compares against the snapshot only. Two lines for the
    /// same product are checked independently, so their combined quantity is
    /// only enforced when stock is actually decremented.
    ///
    /// ## Example
    /// ```rust
    /// use kasir_core::checkout::{CheckoutPlan, ProductSnapshot};
    /// use kasir_core::{CheckoutItem, CoreError};
    ///
    /// let tea = ProductSnapshot { id: 2, name: "Teh".to_string(), price: 3000, stock: 1 };
    /// let mut plan = CheckoutPlan::new();
    ///
    /// let err = plan.add_line(&tea, &CheckoutItem { product_id: 2, quantity: 2 }).unwrap_err();
    /// assert!(matches!(err, CoreError::InsufficientStock { available: 1, requested: 2, .. }));
    /// assert!(plan.is_empty());
    /// ```
    pub fn add_line(
        &mut self,
        product: &ProductSnapshot,
        item: &CheckoutItem,
    ) -> CoreResult<&PlannedLine> {
        validate_quantity(item.quantity)?;

        if product.stock < item.quantity {
            return Err(CoreError::InsufficientStock {
                product_id: product.id,
                product_name: product.name.clone(),
                available: product.stock,
                requested: item.quantity,
            });
        }

        let unit_price = Money::from_minor(product.price);
        let subtotal = unit_price
            .checked_mul_quantity(item.quantity)
            .ok_or(CoreError::AmountOverflow {
                product_id: product.id,
            })?;
        let total = self
            .total
            .checked_add(subtotal)
            .ok_or(CoreError::AmountOverflow {
                product_id: product.id,
            })?;

        self.total = total;
        self.lines.push(PlannedLine {
            product_id: product.id,
            product_name: product.name.clone(),
            unit_price,
            quantity: item.quantity,
            subtotal,
        });

        // Just pushed, so the slice is non-empty.
        Ok(&self.lines[self.lines.len() - 1])
    }

    /// Priced lines in request order.
    pub fn lines(&self) -> &[PlannedLine] {
        &self.lines
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
