//! # Unit of Work
//!
//! One explicit database transaction with the handful of statements the
//! checkout needs.
//!
//! ## Lifecycle
//! ```text
//! UnitOfWork::begin(pool)          BEGIN
//!      │
//!      ├── get_product(id)          SELECT (sees earlier writes of this unit)
//!      ├── insert_sale_header(..)   INSERT transactions ... RETURNING
//!      ├── decrement_stock(id, q)   UPDATE ... WHERE stock >= q
//!      ├── insert_sale_detail(..)   INSERT transaction_details ... RETURNING
//!      │
//!      ├── commit()                 COMMIT   → effects visible
//!      └── rollback() / drop        ROLLBACK → no effects
//! ```
//!
//! Dropping a `UnitOfWork` without calling [`UnitOfWork::commit`] rolls the
//! transaction back, so an early `?` return never leaves partial writes.

use kasir_core::checkout::{PlannedLine, ProductSnapshot};
use kasir_core::{Money, SaleRecord, TransactionDetail};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};

/// A scoped database transaction.
#[derive(Debug)]
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    /// Opens a transaction on a pooled connection.
    pub async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let tx = pool.begin().await.map_err(DbError::from)?;
        debug!("Unit of work started");
        Ok(UnitOfWork { tx })
    }

    /// Reads the fields a checkout line needs.
    pub async fn get_product(&mut self, id: i64) -> DbResult<Option<ProductSnapshot>> {
        let product = sqlx::query_as::<_, ProductSnapshot>(
            "SELECT id, name, price, stock FROM product WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(product)
    }

    /// Conditionally removes `quantity` units from a product's stock.
    ///
    /// The stock check and the write are one statement. Returns the number of
    /// rows affected: `0` means the product is gone or has fewer than
    /// `quantity` units left.
    pub async fn decrement_stock(&mut self, product_id: i64, quantity: i64) -> DbResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE product
            SET stock = stock - ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND stock >= ?
            "#,
        )
        .bind(quantity)
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *self.tx)
        .await?;

        debug!(
            product_id,
            quantity,
            rows_affected = result.rows_affected(),
            "Stock decrement"
        );
        Ok(result.rows_affected())
    }

    /// Inserts the sale header and returns it with its generated id and
    /// server timestamp.
    pub async fn insert_sale_header(&mut self, total: Money) -> DbResult<SaleRecord> {
        let record = sqlx::query_as::<_, SaleRecord>(
            r#"
            INSERT INTO transactions (total_amount)
            VALUES (?)
            RETURNING id, total_amount, created_at
            "#,
        )
        .bind(total.minor_units())
        .fetch_one(&mut *self.tx)
        .await?;

        debug!(sale_id = record.id, total = %total, "Sale header inserted");
        Ok(record)
    }

    /// Inserts one detail row for a sale.
    pub async fn insert_sale_detail(
        &mut self,
        sale_id: i64,
        line: &PlannedLine,
    ) -> DbResult<TransactionDetail> {
        let detail = sqlx::query_as::<_, TransactionDetail>(
            r#"
            INSERT INTO transaction_details
                (transaction_id, product_id, product_name, unit_price, quantity, subtotal)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, transaction_id, product_id, product_name, unit_price, quantity, subtotal
            "#,
        )
        .bind(sale_id)
        .bind(line.product_id)
        .bind(&line.product_name)
        .bind(line.unit_price.minor_units())
        .bind(line.quantity)
        .bind(line.subtotal.minor_units())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(detail)
    }

    /// Raw access to the transaction's connection, for statements the
    /// methods above don't cover.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut *self.tx
    }

    /// Makes every write of this unit visible.
    pub async fn commit(self) -> DbResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::Busy(msg) => DbError::Busy(msg),
                other => DbError::TransactionFailed(other.to_string()),
            })?;
        debug!("Unit of work committed");
        Ok(())
    }

    /// Discards every write of this unit.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        debug!("Unit of work rolled back");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn setup() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("INSERT INTO product (id, name, price, stock) VALUES (1, 'Kopi', 5000, 10)")
            .execute(db.pool())
            .await
            .unwrap();
        db
    }

    async fn stock_of(db: &Database, id: i64) -> i64 {
        sqlx::query_scalar("SELECT stock FROM product WHERE id = ?")
            .bind(id)
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    async fn sale_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    fn line(quantity: i64) -> PlannedLine {
        PlannedLine {
            product_id: 1,
            product_name: "Kopi".to_string(),
            unit_price: Money::from_minor(5000),
            quantity,
            subtotal: Money::from_minor(5000 * quantity),
        }
    }

    #[tokio::test]
    async fn test_conditional_decrement() {
        let db = setup().await;
        let mut uow = db.begin_unit().await.unwrap();

        assert_eq!(uow.decrement_stock(1, 4).await.unwrap(), 1);
        assert_eq!(uow.decrement_stock(1, 7).await.unwrap(), 0);
        assert_eq!(uow.decrement_stock(99, 1).await.unwrap(), 0);

        let product = uow.get_product(1).await.unwrap().unwrap();
        assert_eq!(product.stock, 6);

        uow.commit().await.unwrap();
        assert_eq!(stock_of(&db, 1).await, 6);
    }

    #[tokio::test]
    async fn test_commit_writes_header_and_detail() {
        let db = setup().await;
        let mut uow = db.begin_unit().await.unwrap();

        let header = uow
            .insert_sale_header(Money::from_minor(10_000))
            .await
            .unwrap();
        let detail = uow.insert_sale_detail(header.id, &line(2)).await.unwrap();
        uow.commit().await.unwrap();

        assert_eq!(detail.transaction_id, header.id);
        assert_eq!(detail.subtotal, 10_000);
        assert_eq!(sale_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_drop_rolls_back() {
        let db = setup().await;

        {
            let mut uow = db.begin_unit().await.unwrap();
            uow.decrement_stock(1, 3).await.unwrap();
            uow.insert_sale_header(Money::from_minor(15_000))
                .await
                .unwrap();
        }

        assert_eq!(stock_of(&db, 1).await, 10);
        assert_eq!(sale_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_explicit_rollback() {
        let db = setup().await;
        let mut uow = db.begin_unit().await.unwrap();
        uow.decrement_stock(1, 10).await.unwrap();
        uow.rollback().await.unwrap();

        assert_eq!(stock_of(&db, 1).await, 10);
    }

    #[tokio::test]
    async fn test_detail_requires_existing_sale() {
        let db = setup().await;
        let mut uow = db.begin_unit().await.unwrap();

        let err = uow.insert_sale_detail(404, &line(1)).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
