//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Category     │◄──│     Product     │   │   CheckoutItem      │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │   │  id             │   │  product_id         │   │
//! │  │  name           │   │  name, price    │   │  quantity           │   │
//! │  │  description    │   │  stock          │   └─────────────────────┘   │
//! │  └─────────────────┘   └─────────────────┘              │ checkout     │
//! │                                                          ▼              │
//! │                        ┌─────────────────┐   ┌─────────────────────┐   │
//! │                        │   SaleRecord    │──►│ TransactionDetail   │   │
//! │                        │  ─────────────  │1 n│  ─────────────────  │   │
//! │                        │  id             │   │  product snapshot   │   │
//! │                        │  total_amount   │   │  quantity, subtotal │   │
//! │                        │  created_at     │   └─────────────────────┘   │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Report types keep the field names the HTTP clients already consume
//! (`total_transaksi`, `produk_terlaris`, ...) through serde renames.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or replacing a category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name, copied onto sale details at checkout time.
    pub name: String,

    /// Unit price in minor currency units.
    pub price: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    pub category_id: Option<i64>,

    /// Name of the linked category (read-side join, not stored on the row).
    pub category_name: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or replacing a product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductInput {
    pub name: String,
    pub price: i64,
    pub stock: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
}

// =============================================================================
// Checkout
// =============================================================================

/// One requested line of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i64,
}

/// Body of `POST /api/checkout`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
}

// =============================================================================
// Sale Record
// =============================================================================

/// Header row of a committed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleRecord {
    pub id: i64,
    pub total_amount: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A line of a committed sale.
/// Uses the snapshot pattern: name and price are frozen at time of sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionDetail {
    pub id: i64,
    pub transaction_id: i64,
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Unit price at time of sale (frozen).
    pub unit_price: i64,
    pub quantity: i64,
    /// unit_price × quantity.
    pub subtotal: i64,
}

/// The success output of a checkout: sale header plus itemized details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Receipt {
    pub id: i64,
    pub total_amount: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub details: Vec<TransactionDetail>,
}

impl Receipt {
    /// Assembles a receipt from a header row and its detail rows.
    pub fn from_parts(header: SaleRecord, details: Vec<TransactionDetail>) -> Self {
        Receipt {
            id: header.id,
            total_amount: header.total_amount,
            created_at: header.created_at,
            details,
        }
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Product with the highest quantity sold in a report window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BestSellingProduct {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "qty_terjual")]
    pub quantity_sold: i64,
}

/// Sales summary for the current day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailySalesReport {
    pub total_revenue: i64,
    #[serde(rename = "total_transaksi")]
    pub total_transactions: i64,
    #[serde(rename = "produk_terlaris")]
    pub best_selling_product: Option<BestSellingProduct>,
}

/// Sales summary for an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub total_revenue: i64,
    #[serde(rename = "total_transaksi")]
    pub total_transactions: i64,
    #[serde(rename = "produk_terlaris")]
    pub best_selling_product: Option<BestSellingProduct>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product(stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: 1,
            name: "Kopi Susu".to_string(),
            price: 5000,
            stock,
            category_id: None,
            category_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_product_json_shape() {
        let json = serde_json::to_value(sample_product(3)).unwrap();
        assert_eq!(json["name"], "Kopi Susu");
        assert_eq!(json["price"], 5000);
        assert_eq!(json["stock"], 3);
        assert!(json["category_id"].is_null());
        assert!(json["category_name"].is_null());
    }

    #[test]
    fn test_checkout_request_defaults_to_no_items() {
        let request: CheckoutRequest = serde_json::from_str("{}").unwrap();
        assert!(request.items.is_empty());

        let request: CheckoutRequest =
            serde_json::from_str(r#"{"items":[{"product_id":1,"quantity":2}]}"#).unwrap();
        assert_eq!(
            request.items,
            vec![CheckoutItem {
                product_id: 1,
                quantity: 2
            }]
        );
    }

    #[test]
    fn test_report_wire_names() {
        let report = DailySalesReport {
            total_revenue: 45_000,
            total_transactions: 3,
            best_selling_product: Some(BestSellingProduct {
                name: "Indomie Goreng".to_string(),
                quantity_sold: 12,
            }),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_revenue"], 45_000);
        assert_eq!(json["total_transaksi"], 3);
        assert_eq!(json["produk_terlaris"]["nama"], "Indomie Goreng");
        assert_eq!(json["produk_terlaris"]["qty_terjual"], 12);
    }

    #[test]
    fn test_empty_report_serializes_null_best_seller() {
        let report = SalesReport {
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            total_revenue: 0,
            total_transactions: 0,
            best_selling_product: None,
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["start_date"], "2026-01-01");
        assert!(json["produk_terlaris"].is_null());
    }
}
