//! Review repository for database operations.
//!
//! Reviews are nested under a product; every query is scoped by the product
//! id from the URL so a review can never be addressed through the wrong
//! product.

use chrono::NaiveDate;
use sqlx::PgPool;

use cartwheel_core::{ProductId, ReviewId};

use super::RepositoryError;
use crate::models::{Review, ReviewInput};

/// Internal row type for review queries.
#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: i32,
    product_id: i32,
    name: String,
    description: String,
    date: NaiveDate,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: ReviewId::new(row.id),
            product_id: ProductId::new(row.product_id),
            name: row.name,
            description: row.description,
            date: row.date,
        }
    }
}

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List reviews for a product, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            r"
            SELECT id, product_id, name, description, date
            FROM reviews
            WHERE product_id = $1
            ORDER BY id
            ",
        )
        .bind(product_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get one review scoped to its product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        product_id: ProductId,
        id: ReviewId,
    ) -> Result<Option<Review>, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r"
            SELECT id, product_id, name, description, date
            FROM reviews
            WHERE product_id = $1 AND id = $2
            ",
        )
        .bind(product_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a review for a product, dated today.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        product_id: ProductId,
        input: &ReviewInput,
    ) -> Result<Review, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r"
            INSERT INTO reviews (product_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, product_id, name, description, date
            ",
        )
        .bind(product_id)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Replace a review's text fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review doesn't exist under
    /// this product.
    pub async fn update(
        &self,
        product_id: ProductId,
        id: ReviewId,
        input: &ReviewInput,
    ) -> Result<Review, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r"
            UPDATE reviews
            SET name = $3, description = $4
            WHERE product_id = $1 AND id = $2
            RETURNING id, product_id, name, description, date
            ",
        )
        .bind(product_id)
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a review.
    ///
    /// # Returns
    ///
    /// Returns `true` if the review was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(
        &self,
        product_id: ProductId,
        id: ReviewId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE product_id = $1 AND id = $2")
            .bind(product_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
