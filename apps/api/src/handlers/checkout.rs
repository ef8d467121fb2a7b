//! Checkout and sale lookup handlers.
//!
//! ## Checkout Status Mapping
//! ```text
//! POST /api/checkout {items:[{product_id, quantity}]}
//!      │
//!      ├── committed              → 201 Receipt
//!      ├── unknown product        → 400 PRODUCT_NOT_FOUND
//!      ├── insufficient stock     → 400 INSUFFICIENT_STOCK
//!      ├── empty / bad quantity   → 400 VALIDATION_ERROR
//!      ├── lost stock race / busy → 409 CONFLICT
//!      └── storage failure        → 500 DATABASE_ERROR
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kasir_core::{CheckoutRequest, Receipt};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `POST /api/checkout`
pub async fn checkout(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Receipt>)> {
    let Json(request) = payload?;
    debug!(lines = request.items.len(), "checkout");

    let receipt = state.db.checkout().execute(&request.items).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// `GET /api/transactions/{id}`
pub async fn get_transaction(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Receipt>> {
    let Path(id) = id?;
    state
        .db
        .sales()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Transaction", id))
}
