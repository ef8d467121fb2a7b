//! # Kasir API
//!
//! HTTP server for the Kasir point-of-sale backend.
//!
//! ## Routes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Kasir API Routes                                │
//! │                                                                         │
//! │  GET    /health                                                        │
//! │                                                                         │
//! │  GET    /api/produk[?name=]        POST /api/produk                    │
//! │  GET    /api/produk/{id}           PUT  /api/produk/{id}   DELETE      │
//! │                                                                         │
//! │  GET    /api/categories            POST /api/categories                │
//! │  GET    /api/categories/{id}       PUT  /api/categories/{id} DELETE    │
//! │                                                                         │
//! │  POST   /api/checkout              → 201 Receipt                       │
//! │  GET    /api/transactions/{id}     → Receipt                           │
//! │                                                                         │
//! │  GET    /api/report/hari-ini       → today's report                    │
//! │  GET    /api/report[?start_date=&end_date=]                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (an optional `.env` file is read first):
//! - `PORT` - HTTP port (default: 8080)
//! - `BIND_ADDR` - Listen address (default: 0.0.0.0)
//! - `DB_CONN` - SQLite database path (default: kasir.db)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `RUST_LOG` - Log filter (default: info,kasir=debug,sqlx=warn)

pub mod config;
pub mod error;
pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use kasir_db::Database;
use tower_http::trace::TraceLayer;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/produk",
            get(handlers::product::list_products).post(handlers::product::create_product),
        )
        .route(
            "/api/produk/{id}",
            get(handlers::product::get_product)
                .put(handlers::product::update_product)
                .delete(handlers::product::delete_product),
        )
        .route(
            "/api/categories",
            get(handlers::category::list_categories).post(handlers::category::create_category),
        )
        .route(
            "/api/categories/{id}",
            get(handlers::category::get_category)
                .put(handlers::category::update_category)
                .delete(handlers::category::delete_category),
        )
        .route("/api/checkout", post(handlers::checkout::checkout))
        .route(
            "/api/transactions/{id}",
            get(handlers::checkout::get_transaction),
        )
        .route("/api/report/hari-ini", get(handlers::report::daily_report))
        .route("/api/report", get(handlers::report::sales_report))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
