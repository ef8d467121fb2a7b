//! # Sale Repository
//!
//! Read side of committed sales. Sale rows are written only by the checkout
//! engine, once, and never updated or deleted.
//!
//! ## Sale Shape
//! ```text
//! transactions (header)            transaction_details (lines)
//! ┌──────────────────────┐  1   n  ┌──────────────────────────────┐
//! │ id                   │────────►│ transaction_id               │
//! │ total_amount         │         │ product_id, product_name     │
//! │ created_at (UTC)     │         │ unit_price, quantity         │
//! └──────────────────────┘         │ subtotal                     │
//!                                  └──────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kasir_core::{Receipt, SaleRecord, TransactionDetail};

/// Repository for sale record lookups.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale with its details, in insertion order.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Receipt>> {
        debug!(id, "Fetching sale");

        let header = sqlx::query_as::<_, SaleRecord>(
            "SELECT id, total_amount, created_at FROM transactions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(header) = header else {
            return Ok(None);
        };

        let details = self.get_details(header.id).await?;
        Ok(Some(Receipt::from_parts(header, details)))
    }

    /// Gets the detail rows of a sale.
    pub async fn get_details(&self, sale_id: i64) -> DbResult<Vec<TransactionDetail>> {
        let details = sqlx::query_as::<_, TransactionDetail>(
            r#"
            SELECT id, transaction_id, product_id, product_name, unit_price, quantity, subtotal
            FROM transaction_details
            WHERE transaction_id = ?
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// Counts committed sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
