//! # Checkout Engine
//!
//! Executes one all-or-nothing sale against inventory.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CheckoutEngine::execute(items)                       │
//! │                                                                         │
//! │  validate_checkout_items        (no database work yet)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN ─────────────────────────────────────────────────────────┐      │
//! │  │ PLAN: for each item, in request order                        │      │
//! │  │   get_product(id)          → ProductNotFound                 │      │
//! │  │   stock >= qty             → InsufficientStock               │      │
//! │  │   subtotal = price × qty   → InvalidInput on overflow        │      │
//! │  │                                                              │      │
//! │  │ APPLY:                                                       │      │
//! │  │   insert sale header (total)                                 │      │
//! │  │   for each line:                                             │      │
//! │  │     UPDATE stock = stock - q WHERE stock >= q                │      │
//! │  │        0 rows             → StockRaceLost                    │      │
//! │  │     insert detail (name + price snapshot)                    │      │
//! │  └─ COMMIT ────────────── any error above: ROLLBACK (on drop) ──┘      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Receipt { id, total_amount, created_at, details }                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine holds only a pool handle. Oversell protection comes from the
//! conditional decrement, not from any lock held in this process.

use kasir_core::checkout::CheckoutPlan;
use kasir_core::validation::validate_checkout_items;
use kasir_core::{CheckoutItem, CoreError, Receipt, ValidationError};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::error::DbError;
use crate::unit_of_work::UnitOfWork;

// =============================================================================
// Errors
// =============================================================================

/// Why a checkout did not commit.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A line references a product id that does not exist.
    #[error("product id {0} not found")]
    ProductNotFound(i64),

    /// A line asks for more units than the product has.
    #[error(
        "insufficient stock for product {product_name}. Available: {available}, Requested: {requested}"
    )]
    InsufficientStock {
        product_id: i64,
        product_name: String,
        available: i64,
        requested: i64,
    },

    /// The conditional decrement matched no row: stock changed after it was
    /// read, or duplicate lines together exceed it.
    #[error("failed to update stock for product id {0}")]
    StockRaceLost(i64),

    /// The request itself is malformed.
    #[error("{0}")]
    InvalidInput(String),

    /// Storage failed underneath the checkout.
    #[error(transparent)]
    Storage(#[from] DbError),
}

/// Coarse classification of a [`CheckoutError`], used for status mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    InvalidInput,
    BusinessRuleViolation,
    ConcurrencyConflict,
    StorageFailure,
}

impl CheckoutError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CheckoutError::ProductNotFound(_) => FailureKind::NotFound,
            CheckoutError::InsufficientStock { .. } => FailureKind::BusinessRuleViolation,
            CheckoutError::StockRaceLost(_) => FailureKind::ConcurrencyConflict,
            CheckoutError::InvalidInput(_) => FailureKind::InvalidInput,
            CheckoutError::Storage(e) if e.is_busy() => FailureKind::ConcurrencyConflict,
            CheckoutError::Storage(_) => FailureKind::StorageFailure,
        }
    }
}

impl From<ValidationError> for CheckoutError {
    fn from(err: ValidationError) -> Self {
        CheckoutError::InvalidInput(err.to_string())
    }
}

impl From<CoreError> for CheckoutError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => CheckoutError::ProductNotFound(id),
            CoreError::InsufficientStock {
                product_id,
                product_name,
                available,
                requested,
            } => CheckoutError::InsufficientStock {
                product_id,
                product_name,
                available,
                requested,
            },
            CoreError::AmountOverflow { .. } | CoreError::Validation(_) => {
                CheckoutError::InvalidInput(err.to_string())
            }
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Runs checkouts. Stateless apart from the pool handle.
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    pool: SqlitePool,
}

impl CheckoutEngine {
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutEngine { pool }
    }

    /// Executes one checkout. Either every line is sold and the receipt is
    /// returned, or nothing in the store changes.
    pub async fn execute(&self, items: &[CheckoutItem]) -> Result<Receipt, CheckoutError> {
        debug!(lines = items.len(), "Checkout requested");

        match self.run(items).await {
            Ok(receipt) => {
                info!(
                    sale_id = receipt.id,
                    total = receipt.total_amount,
                    lines = receipt.details.len(),
                    "Checkout committed"
                );
                Ok(receipt)
            }
            Err(err) => {
                match err.kind() {
                    FailureKind::StorageFailure => error!(error = %err, "Checkout failed"),
                    kind => warn!(?kind, reason = %err, "Checkout rejected"),
                }
                Err(err)
            }
        }
    }

    async fn run(&self, items: &[CheckoutItem]) -> Result<Receipt, CheckoutError> {
        validate_checkout_items(items)?;

        let mut uow = UnitOfWork::begin(&self.pool).await?;
        let plan = plan_checkout(&mut uow, items).await?;
        let receipt = apply_plan(&mut uow, &plan).await?;
        uow.commit().await?;

        Ok(receipt)
    }
}

/// Reads every referenced product and prices every line. No writes.
async fn plan_checkout(
    uow: &mut UnitOfWork,
    items: &[CheckoutItem],
) -> Result<CheckoutPlan, CheckoutError> {
    let mut plan = CheckoutPlan::new();

    for item in items {
        let product = uow
            .get_product(item.product_id)
            .await?
            .ok_or(CheckoutError::ProductNotFound(item.product_id))?;

        plan.add_line(&product, item)?;
    }

    Ok(plan)
}

/// Writes the header, decrements stock and writes the details.
async fn apply_plan(uow: &mut UnitOfWork, plan: &CheckoutPlan) -> Result<Receipt, CheckoutError> {
    let header = uow.insert_sale_header(plan.total()).await?;
    let mut details = Vec::with_capacity(plan.lines().len());

    for line in plan.lines() {
        if uow.decrement_stock(line.product_id, line.quantity).await? == 0 {
            return Err(CheckoutError::StockRaceLost(line.product_id));
        }

        details.push(uow.insert_sale_detail(header.id, line).await?);
    }

    Ok(Receipt::from_parts(header, details))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn item(product_id: i64, quantity: i64) -> CheckoutItem {
        CheckoutItem {
            product_id,
            quantity,
        }
    }

    async fn insert_product(db: &Database, id: i64, name: &str, price: i64, stock: i64) {
        sqlx::query("INSERT INTO product (id, name, price, stock) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(name)
            .bind(price)
            .bind(stock)
            .execute(db.pool())
            .await
            .unwrap();
    }

    async fn stock_of(db: &Database, id: i64) -> i64 {
        sqlx::query_scalar("SELECT stock FROM product WHERE id = ?")
            .bind(id)
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    async fn row_count(db: &Database, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    async fn setup() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        insert_product(&db, 1, "Kopi Susu", 5000, 10).await;
        insert_product(&db, 2, "Teh Manis", 3000, 2).await;
        db
    }

    #[tokio::test]
    async fn test_single_line_checkout() {
        let db = setup().await;

        let receipt = db.checkout().execute(&[item(1, 3)]).await.unwrap();

        assert_eq!(receipt.total_amount, 15_000);
        assert_eq!(receipt.details.len(), 1);
        assert_eq!(receipt.details[0].product_name, "Kopi Susu");
        assert_eq!(receipt.details[0].unit_price, 5000);
        assert_eq!(receipt.details[0].subtotal, 15_000);
        assert_eq!(receipt.details[0].transaction_id, receipt.id);

        assert_eq!(stock_of(&db, 1).await, 7);
        assert_eq!(row_count(&db, "transactions").await, 1);
        assert_eq!(row_count(&db, "transaction_details").await, 1);
    }

    #[tokio::test]
    async fn test_total_is_sum_of_lines() {
        let db = setup().await;

        let receipt = db
            .checkout()
            .execute(&[item(1, 2), item(2, 1)])
            .await
            .unwrap();

        assert_eq!(receipt.total_amount, 2 * 5000 + 3000);
        let sum: i64 = receipt.details.iter().map(|d| d.subtotal).sum();
        assert_eq!(sum, receipt.total_amount);
        assert_eq!(stock_of(&db, 1).await, 8);
        assert_eq!(stock_of(&db, 2).await, 1);
    }

    #[tokio::test]
    async fn test_insufficient_stock_changes_nothing() {
        let db = setup().await;

        let err = db.checkout().execute(&[item(2, 5)]).await.unwrap_err();

        assert_eq!(err.kind(), FailureKind::BusinessRuleViolation);
        assert!(matches!(
            err,
            CheckoutError::InsufficientStock {
                available: 2,
                requested: 5,
                ..
            }
        ));
        assert_eq!(stock_of(&db, 2).await, 2);
        assert_eq!(row_count(&db, "transactions").await, 0);
    }

    #[tokio::test]
    async fn test_missing_product_aborts_whole_checkout() {
        let db = setup().await;

        let err = db
            .checkout()
            .execute(&[item(1, 2), item(99, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::ProductNotFound(99)));
        assert_eq!(err.kind(), FailureKind::NotFound);
        assert_eq!(err.to_string(), "product id 99 not found");
        assert_eq!(stock_of(&db, 1).await, 10);
        assert_eq!(row_count(&db, "transactions").await, 0);
    }

    #[tokio::test]
    async fn test_invalid_input_is_rejected_before_storage() {
        let db = setup().await;
        let engine = db.checkout();

        let err = engine.execute(&[]).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);
        assert_eq!(err.to_string(), "items is required");

        let err = engine.execute(&[item(1, 0)]).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);

        let err = engine.execute(&[item(1, 1), item(2, -3)]).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);

        assert_eq!(stock_of(&db, 1).await, 10);
        assert_eq!(row_count(&db, "transactions").await, 0);
    }

    #[tokio::test]
    async fn test_price_overflow_is_invalid_input() {
        let db = setup().await;
        insert_product(&db, 3, "Emas", i64::MAX, 5).await;

        let err = db.checkout().execute(&[item(3, 2)]).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);
        assert_eq!(stock_of(&db, 3).await, 5);
    }

    #[tokio::test]
    async fn test_duplicate_lines_exceeding_stock_roll_back() {
        let db = setup().await;

        // Each line alone fits the stock of 2; together they do not.
        let err = db
            .checkout()
            .execute(&[item(2, 2), item(2, 1)])
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::StockRaceLost(2)));
        assert_eq!(err.kind(), FailureKind::ConcurrencyConflict);
        assert_eq!(stock_of(&db, 2).await, 2);
        assert_eq!(row_count(&db, "transactions").await, 0);
        assert_eq!(row_count(&db, "transaction_details").await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_lines_within_stock_are_separate_details() {
        let db = setup().await;

        let receipt = db
            .checkout()
            .execute(&[item(1, 2), item(1, 3)])
            .await
            .unwrap();

        assert_eq!(receipt.details.len(), 2);
        assert_eq!(receipt.total_amount, 25_000);
        assert_eq!(stock_of(&db, 1).await, 5);
    }

    #[tokio::test]
    async fn test_stock_lost_between_plan_and_apply() {
        let db = setup().await;
        let mut uow = db.begin_unit().await.unwrap();

        let plan = plan_checkout(&mut uow, &[item(1, 3), item(2, 1)])
            .await
            .unwrap();

        // Another sale drains product 1 after it was read.
        sqlx::query("UPDATE product SET stock = 1 WHERE id = 1")
            .execute(uow.connection())
            .await
            .unwrap();

        let err = apply_plan(&mut uow, &plan).await.unwrap_err();
        assert!(matches!(err, CheckoutError::StockRaceLost(1)));
        drop(uow);

        assert_eq!(stock_of(&db, 1).await, 10);
        assert_eq!(stock_of(&db, 2).await, 2);
        assert_eq!(row_count(&db, "transactions").await, 0);
        assert_eq!(row_count(&db, "transaction_details").await, 0);
    }

    #[tokio::test]
    async fn test_snapshot_survives_product_changes() {
        let db = setup().await;
        let receipt = db.checkout().execute(&[item(1, 1)]).await.unwrap();

        sqlx::query("UPDATE product SET name = 'Kopi Hitam', price = 9000 WHERE id = 1")
            .execute(db.pool())
            .await
            .unwrap();

        let stored = db.sales().get_by_id(receipt.id).await.unwrap().unwrap();
        assert_eq!(stored.details[0].product_name, "Kopi Susu");
        assert_eq!(stored.details[0].unit_price, 5000);
    }

    /// The in-memory pool has one connection, so the second checkout waits
    /// for the first to commit and then fails its stock check.
    #[tokio::test]
    async fn test_pool_serialized_checkouts_never_oversell() {
        let db = setup().await;
        let engine = db.checkout();

        let (first, second) = ([item(1, 6)], [item(1, 6)]);
        let (a, b) = tokio::join!(engine.execute(&first), engine.execute(&second));

        let results = [a, b];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(matches!(
                err.kind(),
                FailureKind::BusinessRuleViolation | FailureKind::ConcurrencyConflict
            ));
        }

        assert_eq!(stock_of(&db, 1).await, 4);
        assert_eq!(row_count(&db, "transactions").await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checkouts_on_file_database() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "kasir-checkout-{}-{}.db",
            std::process::id(),
            nanos
        ));

        let db = Database::new(DbConfig::new(&path).max_connections(4))
            .await
            .unwrap();
        insert_product(&db, 1, "Kopi Susu", 5000, 10).await;

        let mut handles = Vec::new();
        for _ in 0..4 {
            let engine = db.checkout();
            handles.push(tokio::spawn(async move {
                let items = [item(1, 6)];
                engine.execute(&items).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(err) => assert!(matches!(
                    err.kind(),
                    FailureKind::BusinessRuleViolation | FailureKind::ConcurrencyConflict
                )),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(stock_of(&db, 1).await, 4);
        assert_eq!(row_count(&db, "transactions").await, 1);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[test]
    fn test_failure_kinds() {
        assert_eq!(
            CheckoutError::Storage(DbError::Busy("database is locked".to_string())).kind(),
            FailureKind::ConcurrencyConflict
        );
        assert_eq!(
            CheckoutError::Storage(DbError::PoolExhausted).kind(),
            FailureKind::StorageFailure
        );
        assert_eq!(
            CheckoutError::from(ValidationError::required("items")).kind(),
            FailureKind::InvalidInput
        );
    }
}
