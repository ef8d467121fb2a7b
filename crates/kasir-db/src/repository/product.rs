//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Listing with an optional name filter
//! - CRUD operations
//!
//! Stock is only ever set here through a full update. Sales go through the
//! checkout engine's conditional decrement instead.
//!
//! ## Read Shape
//! ```text
//! product p LEFT JOIN category c ON c.id = p.category_id
//!      │
//!      ▼
//! Product { id, name, price, stock, category_id, category_name, ... }
//!                                                └── NULL when detached
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::{Product, ProductInput};

const SELECT_PRODUCT: &str = r#"
    SELECT
        p.id,
        p.name,
        p.price,
        p.stock,
        p.category_id,
        c.name AS category_name,
        p.created_at,
        p.updated_at
    FROM product p
    LEFT JOIN category c ON c.id = p.category_id
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let all = repo.list(None).await?;
/// let coffee = repo.list(Some("kopi")).await?;
/// let product = repo.get_by_id(1).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products ordered by id.
    ///
    /// ## Arguments
    /// * `name_filter` - Case-insensitive substring match on the name.
    ///   `None` or a blank string returns everything.
    pub async fn list(&self, name_filter: Option<&str>) -> DbResult<Vec<Product>> {
        let filter = name_filter
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(escape_like);

        debug!(filter = ?filter, "Listing products");

        let sql = format!(
            "{} WHERE (?1 IS NULL OR LOWER(p.name) LIKE '%' || LOWER(?1) || '%' ESCAPE '\\') ORDER BY p.id",
            SELECT_PRODUCT
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(filter)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("{} WHERE p.id = ?", SELECT_PRODUCT);

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with generated id and timestamps
    /// * `Err(DbError::ForeignKeyViolation)` - `category_id` doesn't exist
    pub async fn create(&self, input: &ProductInput) -> DbResult<Product> {
        debug!(name = %input.name, "Inserting product");

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO product (name, price, stock, category_id)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(input.name.trim())
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Replaces a product's name, price, stock and category.
    ///
    /// ## Returns
    /// * `Ok(Product)` - The product as stored after the update
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: i64, input: &ProductInput) -> DbResult<Product> {
        debug!(id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE product SET
                name = ?,
                price = ?,
                stock = ?,
                category_id = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
        )
        .bind(input.name.trim())
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product.
    ///
    /// Past sale details keep their name and price snapshot; they hold no
    /// foreign key to the product row.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM product WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Escapes `LIKE` metacharacters so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================
