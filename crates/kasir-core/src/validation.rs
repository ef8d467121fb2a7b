//! # Validation Module
//!
//! Input validation utilities for Kasir POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (axum)                                          │
//! │  └── Type validation (JSON deserialization, path/query parsing)        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Field rules (names, prices, quantities, dates)                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock >= 0), NOT NULL, UNIQUE                              │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::validation::{validate_checkout_items, validate_quantity};
//! use kasir_core::CheckoutItem;
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_checkout_items(&[]).is_err());
//! assert!(validate_checkout_items(&[CheckoutItem { product_id: 1, quantity: 2 }]).is_ok());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{CategoryInput, CheckoutItem, ProductInput};
use crate::{MAX_CATEGORY_NAME_LEN, MAX_CHECKOUT_LINES, MAX_PRODUCT_NAME_LEN, REPORT_DATE_FORMAT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_name(field: &str, name: &str, max: usize) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name: non-empty, at most 200 characters.
///
/// ## Example
/// ```rust
/// use kasir_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Teh Botol").is_ok());
/// assert!(validate_product_name("  ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates a category name: non-empty, at most 100 characters.
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name, MAX_CATEGORY_NAME_LEN)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a checkout quantity. Must be strictly positive.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in minor units. Zero is allowed (free items).
///
/// ## Example
/// ```rust
/// use kasir_core::validation::validate_price;
///
/// assert!(validate_price(3500).is_ok());
/// assert!(validate_price(0).is_ok());
/// assert!(validate_price(-100).is_err());
/// ```
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level. Zero is allowed (sold out).
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Payload Validators
// =============================================================================

/// Validates a product create/update payload.
pub fn validate_product_input(input: &ProductInput) -> ValidationResult<()> {
    validate_product_name(&input.name)?;
    validate_price(input.price)?;
    validate_stock(input.stock)?;
    Ok(())
}

/// Validates a category create/update payload.
pub fn validate_category_input(input: &CategoryInput) -> ValidationResult<()> {
    validate_category_name(&input.name)
}

/// Validates the line items of a checkout before any database work.
///
/// ## Rules
/// - At least one item (an empty checkout is rejected)
/// - At most [`MAX_CHECKOUT_LINES`] items
/// - Every quantity strictly positive
///
/// Duplicate product ids are allowed; each line is processed on its own.
pub fn validate_checkout_items(items: &[CheckoutItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::required("items"));
    }

    if items.len() > MAX_CHECKOUT_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_CHECKOUT_LINES as i64,
        });
    }

    for item in items {
        validate_quantity(item.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a report date in `YYYY-MM-DD` format.
pub fn parse_report_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), REPORT_DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "Use YYYY-MM-DD".to_string(),
        }
    })
}

/// Parses and checks a report date range. Both ends are inclusive and the
/// range may be a single day.
///
/// ## Example
/// ```rust
/// use kasir_core::validation::validate_date_range;
///
/// assert!(validate_date_range("2026-01-01", "2026-01-31").is_ok());
/// assert!(validate_date_range("2026-01-31", "2026-01-01").is_err());
/// assert!(validate_date_range("01/01/2026", "2026-01-31").is_err());
/// ```
pub fn validate_date_range(start: &str, end: &str) -> ValidationResult<(NaiveDate, NaiveDate)> {
    let start = parse_report_date("start_date", start)?;
    let end = parse_report_date("end_date", end)?;

    if end < start {
        return Err(ValidationError::Inconsistent(
            "end_date must be after start_date".to_string(),
        ));
    }

    Ok((start, end))
}

// =============================================================================
// Unit Tests
// =============================================================================
