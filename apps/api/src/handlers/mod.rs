//! HTTP handlers, one module per resource.
//!
//! Handlers stay thin: parse, validate, delegate to `kasir-db`, serialize.

pub mod category;
pub mod checkout;
pub mod health;
pub mod product;
pub mod report;
