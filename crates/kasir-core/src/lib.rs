//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate holds the business rules of the Kasir point-of-sale backend as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/api, axum)                    │   │
//! │  │    /api/produk  /api/categories  /api/checkout  /api/report     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kasir-db (Database Layer)                    │   │
//! │  │        repositories, unit of work, checkout engine              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ uses                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ checkout  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ pricing   │  │   rules   │  │   │
//! │  │   │  Receipt  │  │           │  │  plan     │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, Receipt, reports)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`checkout`] - Line pricing and stock checks for a checkout
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::checkout::{CheckoutPlan, ProductSnapshot};
//! use kasir_core::CheckoutItem;
//!
//! let coffee = ProductSnapshot { id: 1, name: "Kopi".to_string(), price: 5000, stock: 10 };
//!
//! let mut plan = CheckoutPlan::new();
//! plan.add_line(&coffee, &CheckoutItem { product_id: 1, quantity: 3 }).unwrap();
//!
//! assert_eq!(plan.total().minor_units(), 15_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of line items accepted in a single checkout.
///
/// ## Business Reason
/// Prevents runaway requests and keeps a checkout's transaction short.
pub const MAX_CHECKOUT_LINES: usize = 100;

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Maximum length of a category name.
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Date format used by report query parameters (`YYYY-MM-DD`).
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d";
