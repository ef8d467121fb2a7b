//! Category handlers (`/api/categories`).

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use kasir_core::validation::validate_category_input;
use kasir_core::{Category, CategoryInput};

use super::product::DeleteResponse;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// `GET /api/categories`
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.db.categories().list().await?))
}

/// `POST /api/categories`
pub async fn create_category(
    State(state): State<AppState>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let Json(input) = payload?;
    validate_category_input(&input)?;

    let category = state.db.categories().create(&input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// `GET /api/categories/{id}`
pub async fn get_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Category>> {
    let Path(id) = id?;
    state
        .db
        .categories()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Category", id))
}

/// `PUT /api/categories/{id}`
pub async fn update_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<Json<Category>> {
    let Path(id) = id?;
    let Json(input) = payload?;
    validate_category_input(&input)?;

    Ok(Json(state.db.categories().update(id, &input).await?))
}

/// `DELETE /api/categories/{id}`
pub async fn delete_category(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DeleteResponse>> {
    let Path(id) = id?;
    state.db.categories().delete(id).await?;
    Ok(Json(DeleteResponse {
        message: "Category deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{send, test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_category_flow() {
        let (app, _db) = test_app().await;

        let (status, created) = send(
            &app,
            "POST",
            "/api/categories",
            Some(json!({"name": "Minuman", "description": "Minuman dingin"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            "POST",
            "/api/categories",
            Some(json!({"name": "Minuman"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, product) = send(
            &app,
            "POST",
            "/api/produk",
            Some(json!({"name": "Aqua", "price": 3500, "stock": 10, "category_id": id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(product["category_name"], "Minuman");

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/categories/{}", id),
            Some(json!({"name": "Minuman Dingin"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Minuman Dingin");
        assert!(updated["description"].is_null());

        let (status, list) = send(&app, "GET", "/api/categories", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, "DELETE", &format!("/api/categories/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "GET", &format!("/api/categories/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_blank_category_name_rejected() {
        let (app, _db) = test_app().await;
        let (status, body) = send(
            &app,
            "POST",
            "/api/categories",
            Some(json!({"name": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "name is required");
    }
}
