//! # Repository Module
//!
//! Database repository implementations for Kasir POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  state.db.products().list(Some("kopi"))                        │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self, name_filter)                                          │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── create(&self, input)                                              │
//! │  ├── update(&self, id, input)                                          │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  Parameterized SQL                                              │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and name filter
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD
//! - [`SaleRepository`](sale::SaleRepository) - Committed sale lookups
//! - [`ReportRepository`](report::ReportRepository) - Daily and date-range aggregates
//!
//! Sale rows are written only by the [`CheckoutEngine`](crate::CheckoutEngine).

pub mod category;
pub mod product;
pub mod report;
pub mod sale;
