//! Product image repository for database operations.
//!
//! Same nesting discipline as reviews: every query is scoped by the product
//! id from the URL.

use sqlx::PgPool;

use cartwheel_core::{ProductId, ProductImageId};

use super::RepositoryError;
use crate::models::{ProductImage, ProductImageInput};

/// Internal row type for image queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductImageRow {
    id: i32,
    product_id: i32,
    image: String,
}

impl From<ProductImageRow> for ProductImage {
    fn from(row: ProductImageRow) -> Self {
        Self {
            id: ProductImageId::new(row.id),
            product_id: ProductId::new(row.product_id),
            image: row.image,
        }
    }
}

/// Repository for product image database operations.
pub struct ProductImageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductImageRepository<'a> {
    /// Create a new product image repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List image metadata for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductImage>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductImageRow>(
            r"
            SELECT id, product_id, image
            FROM product_images
            WHERE product_id = $1
            ORDER BY id
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get one image scoped to its product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        product_id: ProductId,
        id: ProductImageId,
    ) -> Result<Option<ProductImage>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductImageRow>(
            r"
            SELECT id, product_id, image
            FROM product_images
            WHERE product_id = $1 AND id = $2
            ",
        )
        .bind(product_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Attach image metadata to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        product_id: ProductId,
        input: &ProductImageInput,
    ) -> Result<ProductImage, RepositoryError> {
        let row = sqlx::query_as::<_, ProductImageRow>(
            r"
            INSERT INTO product_images (product_id, image)
            VALUES ($1, $2)
            RETURNING id, product_id, image
            ",
        )
        .bind(product_id)
        .bind(&input.image)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace image metadata.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the image doesn't exist under
    /// this product.
    pub async fn update(
        &self,
        product_id: ProductId,
        id: ProductImageId,
        input: &ProductImageInput,
    ) -> Result<ProductImage, RepositoryError> {
        let row = sqlx::query_as::<_, ProductImageRow>(
            r"
            UPDATE product_images
            SET image = $3
            WHERE product_id = $1 AND id = $2
            RETURNING id, product_id, image
            ",
        )
        .bind(product_id)
        .bind(id)
        .bind(&input.image)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete image metadata.
    ///
    /// # Returns
    ///
    /// Returns `true` if the image was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        product_id: ProductId,
        id: ProductImageId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product_images WHERE product_id = $1 AND id = $2")
            .bind(product_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
