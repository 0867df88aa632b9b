//! Product repository.

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::SqlitePool;

use mercado_core::types::ProductId;

use crate::models::{Product, ProductPatch};

use super::{RepositoryError, corrupt, to_json};

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    title: String,
    price: String,
    stock: i64,
    description: String,
    images: String,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, RepositoryError> {
        Ok(Product {
            id: self.id,
            title: self.title,
            price: Decimal::from_str(&self.price).map_err(|e| corrupt("price", e))?,
            stock: self.stock,
            description: self.description,
            images: serde_json::from_str(&self.images).map_err(|e| corrupt("images", e))?,
        })
    }
}

const SELECT_PRODUCT: &str = "SELECT id, title, price, stock, description, images FROM products";

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// All products in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a stored value does not parse.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!("{SELECT_PRODUCT} ORDER BY rowid"))
            .fetch_all(self.pool)
            .await?;
        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if a stored value does not parse.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!("{SELECT_PRODUCT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        row.map(ProductRow::into_product).transpose()
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn create(&self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO products (id, title, price, stock, description, images) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(product.id)
        .bind(&product.title)
        .bind(product.price.to_string())
        .bind(product.stock)
        .bind(&product.description)
        .bind(to_json(&product.images)?)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Merge a patch into a product row in one statement; absent fields
    /// keep their stored value. Returns the updated product, or `None`
    /// when the row does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails, or
    /// `DataCorruption` if a stored value does not parse.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET \
               title = COALESCE(?, title), \
               price = COALESCE(?, price), \
               stock = COALESCE(?, stock), \
               description = COALESCE(?, description), \
               images = COALESCE(?, images) \
             WHERE id = ?",
        )
        .bind(patch.title.as_deref().map(str::trim))
        .bind(patch.price.map(|p| p.to_string()))
        .bind(patch.stock)
        .bind(patch.description.as_deref())
        .bind(patch.images.as_ref().map(to_json).transpose()?)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    /// Delete a product row. Returns false when it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
