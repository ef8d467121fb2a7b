//! Sales report handlers (`/api/report`).

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use kasir_core::validation::validate_date_range;
use kasir_core::DailySalesReport;
use serde::Deserialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// `GET /api/report/hari-ini`
pub async fn daily_report(State(state): State<AppState>) -> ApiResult<Json<DailySalesReport>> {
    let today = Utc::now().date_naive();
    Ok(Json(state.db.reports().daily(today).await?))
}

/// `GET /api/report[?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD]`
///
/// No dates gives today's report. Both dates give the range report.
/// Exactly one date is rejected.
pub async fn sales_report(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(query) = query?;

    let start = query.start_date.filter(|s| !s.is_empty());
    let end = query.end_date.filter(|s| !s.is_empty());

    match (start, end) {
        (None, None) => Ok(daily_report(State(state)).await?.into_response()),
        (Some(start), Some(end)) => {
            let (start, end) = validate_date_range(&start, &end)?;
            debug!(%start, %end, "sales_report");
            let report = state.db.reports().range(start, end).await?;
            Ok(Json(report).into_response())
        }
        _ => Err(ApiError::validation(
            "both start_date and end_date are required",
        )),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_app};
    use axum::http::StatusCode;
    use chrono::Utc;
    use serde_json::json;

    #[tokio::test]
    async fn test_daily_report_after_checkout() {
        let (app, _db) = test_app().await;

        let (_, product) = send(
            &app,
            "POST",
            "/api/produk",
            Some(json!({"name": "Kopi", "price": 5000, "stock": 10})),
        )
        .await;
        let id = product["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            "POST",
            "/api/checkout",
            Some(json!({"items": [{"product_id": id, "quantity": 2}]})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        for uri in ["/api/report/hari-ini", "/api/report"] {
            let (status, report) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(report["total_revenue"], 10_000);
            assert_eq!(report["total_transaksi"], 1);
            assert_eq!(report["produk_terlaris"]["nama"], "Kopi");
            assert_eq!(report["produk_terlaris"]["qty_terjual"], 2);
        }

        let today = Utc::now().date_naive();
        let (status, report) = send(
            &app,
            "GET",
            &format!("/api/report?start_date={}&end_date={}", today, today),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["start_date"], today.to_string());
        assert_eq!(report["total_transaksi"], 1);
    }

    #[tokio::test]
    async fn test_empty_report() {
        let (app, _db) = test_app().await;
        let (status, report) = send(
            &app,
            "GET",
            "/api/report?start_date=2020-01-01&end_date=2020-12-31",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["total_revenue"], 0);
        assert_eq!(report["total_transaksi"], 0);
        assert!(report["produk_terlaris"].is_null());
    }

    #[tokio::test]
    async fn test_report_parameter_errors() {
        let (app, _db) = test_app().await;

        let (status, body) = send(&app, "GET", "/api/report?start_date=2026-01-01", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "both start_date and end_date are required");

        let (status, body) = send(
            &app,
            "GET",
            "/api/report?start_date=01-01-2026&end_date=2026-01-31",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid start_date format. Use YYYY-MM-DD");

        let (status, body) = send(
            &app,
            "GET",
            "/api/report?start_date=2026-01-01&end_date=2026-13-01",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "invalid end_date format. Use YYYY-MM-DD");

        let (status, body) = send(
            &app,
            "GET",
            "/api/report?start_date=2026-02-01&end_date=2026-01-01",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "end_date must be after start_date");
    }
}
