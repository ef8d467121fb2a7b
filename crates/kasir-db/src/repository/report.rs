//! # Report Repository
//!
//! Sales aggregates over a window of UTC calendar days.
//!
//! ## Queries
//! ```text
//! window = start <= DATE(created_at) <= end
//!
//! totals:       SUM(total_amount), COUNT(*)       FROM transactions
//! best seller:  SUM(quantity) per product_id      FROM transaction_details
//!               ORDER BY qty DESC, product_id ASC LIMIT 1
//!               name = latest snapshot in the window
//! ```
//!
//! A daily report is the one-day window `[today, today]`.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kasir_core::{BestSellingProduct, DailySalesReport, SalesReport};

/// Repository for sales reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct Totals {
    total_revenue: i64,
    total_transactions: i64,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Report for a single day, usually today's UTC date.
    pub async fn daily(&self, today: NaiveDate) -> DbResult<DailySalesReport> {
        debug!(%today, "Building daily report");

        let totals = self.totals(today, today).await?;
        let best_selling_product = self.best_seller(today, today).await?;

        Ok(DailySalesReport {
            total_revenue: totals.total_revenue,
            total_transactions: totals.total_transactions,
            best_selling_product,
        })
    }

    /// Report for the inclusive range `[start, end]`.
    pub async fn range(&self, start: NaiveDate, end: NaiveDate) -> DbResult<SalesReport> {
        debug!(%start, %end, "Building range report");

        let totals = self.totals(start, end).await?;
        let best_selling_product = self.best_seller(start, end).await?;

        Ok(SalesReport {
            start_date: start,
            end_date: end,
            total_revenue: totals.total_revenue,
            total_transactions: totals.total_transactions,
            best_selling_product,
        })
    }

    async fn totals(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Totals> {
        let totals = sqlx::query_as::<_, Totals>(
            r#"
            SELECT
                COALESCE(SUM(total_amount), 0) AS total_revenue,
                COUNT(*) AS total_transactions
            FROM transactions
            WHERE DATE(created_at) >= ? AND DATE(created_at) <= ?
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }

    async fn best_seller(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Option<BestSellingProduct>> {
        // SQLite takes the bare product_name from the row holding MAX(td.id).
        let best = sqlx::query_as::<_, BestSellingProduct>(
            r#"
            SELECT
                td.product_name AS name,
                SUM(td.quantity) AS quantity_sold,
                MAX(td.id) AS latest_detail
            FROM transaction_details td
            JOIN transactions t ON t.id = td.transaction_id
            WHERE DATE(t.created_at) >= ? AND DATE(t.created_at) <= ?
            GROUP BY td.product_id
            ORDER BY quantity_sold DESC, td.product_id ASC
            LIMIT 1
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_optional(&self.pool)
        .await?;

        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;
    use kasir_core::CheckoutItem;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Inserts a sale with a fixed timestamp, bypassing checkout.
    async fn insert_sale(db: &Database, created_at: &str, lines: &[(i64, &str, i64, i64)]) {
        let total: i64 = lines.iter().map(|(_, _, price, qty)| price * qty).sum();
        let sale_id: i64 = sqlx::query_scalar(
            "INSERT INTO transactions (total_amount, created_at) VALUES (?, ?) RETURNING id",
        )
        .bind(total)
        .bind(created_at)
        .fetch_one(db.pool())
        .await
        .unwrap();

        for (product_id, name, price, qty) in lines {
            sqlx::query(
                r#"
                INSERT INTO transaction_details
                    (transaction_id, product_id, product_name, unit_price, quantity, subtotal)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(sale_id)
            .bind(product_id)
            .bind(name)
            .bind(price)
            .bind(qty)
            .bind(price * qty)
            .execute(db.pool())
            .await
            .unwrap();
        }
    }

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        insert_sale(&db, "2026-03-01 08:00:00", &[(1, "Kopi", 5000, 2), (2, "Teh", 3000, 1)]).await;
        insert_sale(&db, "2026-03-01 23:59:59", &[(2, "Teh", 3000, 4)]).await;
        insert_sale(&db, "2026-03-03 12:00:00", &[(1, "Kopi", 5000, 1)]).await;
        insert_sale(&db, "2026-04-01 00:00:00", &[(3, "Roti", 8000, 9)]).await;
        db
    }

    #[tokio::test]
    async fn test_range_report() {
        let db = seeded().await;

        let report = db
            .reports()
            .range(date(2026, 3, 1), date(2026, 3, 31))
            .await
            .unwrap();

        assert_eq!(report.total_transactions, 3);
        assert_eq!(report.total_revenue, 13_000 + 12_000 + 5000);
        let best = report.best_selling_product.unwrap();
        assert_eq!(best.name, "Teh");
        assert_eq!(best.quantity_sold, 5);
    }

    #[tokio::test]
    async fn test_single_day_window_is_inclusive() {
        let db = seeded().await;

        let report = db
            .reports()
            .range(date(2026, 3, 1), date(2026, 3, 1))
            .await
            .unwrap();
        assert_eq!(report.total_transactions, 2);

        let report = db
            .reports()
            .range(date(2026, 4, 1), date(2026, 4, 1))
            .await
            .unwrap();
        assert_eq!(report.total_transactions, 1);
        assert_eq!(report.best_selling_product.unwrap().quantity_sold, 9);
    }

    #[tokio::test]
    async fn test_ties_break_on_lowest_product_id() {
        let db = seeded().await;

        // Day 3 alone: Kopi 1. Add Teh 1 on the same day for a tie.
        insert_sale(&db, "2026-03-03 13:00:00", &[(2, "Teh", 3000, 1)]).await;

        let report = db
            .reports()
            .range(date(2026, 3, 3), date(2026, 3, 3))
            .await
            .unwrap();
        assert_eq!(report.best_selling_product.unwrap().name, "Kopi");
    }

    #[tokio::test]
    async fn test_empty_window() {
        let db = seeded().await;

        let report = db
            .reports()
            .range(date(2025, 1, 1), date(2025, 12, 31))
            .await
            .unwrap();

        assert_eq!(report.total_revenue, 0);
        assert_eq!(report.total_transactions, 0);
        assert!(report.best_selling_product.is_none());
    }

    #[tokio::test]
    async fn test_daily_report_counts_todays_checkouts() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query("INSERT INTO product (id, name, price, stock) VALUES (1, 'Kopi', 5000, 10)")
            .execute(db.pool())
            .await
            .unwrap();

        db.checkout()
            .execute(&[CheckoutItem {
                product_id: 1,
                quantity: 3,
            }])
            .await
            .unwrap();

        let report = db.reports().daily(Utc::now().date_naive()).await.unwrap();
        assert_eq!(report.total_revenue, 15_000);
        assert_eq!(report.total_transactions, 1);
        assert_eq!(report.best_selling_product.unwrap().name, "Kopi");
    }
}
