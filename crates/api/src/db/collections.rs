//! Collection repository for database operations.

use sqlx::PgPool;

use cartwheel_core::{CollectionId, ProductId};

use super::{RepositoryError, invalid_ref_on_fk, protected_on_fk};
use crate::models::{Collection, CollectionInput, CollectionWithCount};

/// Internal row type for collection queries.
#[derive(Debug, sqlx::FromRow)]
struct CollectionRow {
    id: i32,
    title: String,
    featured_product_id: Option<i32>,
}

impl From<CollectionRow> for Collection {
    fn from(row: CollectionRow) -> Self {
        Self {
            id: CollectionId::new(row.id),
            title: row.title,
            featured_product_id: row.featured_product_id.map(ProductId::new),
        }
    }
}

/// Internal row type for collections annotated with their product count.
#[derive(Debug, sqlx::FromRow)]
struct CollectionWithCountRow {
    id: i32,
    title: String,
    featured_product_id: Option<i32>,
    products_count: i64,
}

impl From<CollectionWithCountRow> for CollectionWithCount {
    fn from(row: CollectionWithCountRow) -> Self {
        Self {
            id: CollectionId::new(row.id),
            title: row.title,
            featured_product_id: row.featured_product_id.map(ProductId::new),
            products_count: row.products_count,
        }
    }
}

/// Repository for collection database operations.
pub struct CollectionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CollectionRepository<'a> {
    /// Create a new collection repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all collections with their product counts, ordered by title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<CollectionWithCount>, RepositoryError> {
        let rows = sqlx::query_as::<_, CollectionWithCountRow>(
            r"
            SELECT c.id, c.title, c.featured_product_id,
                   COUNT(p.id) AS products_count
            FROM collections c
            LEFT JOIN products p ON p.collection_id = c.id
            GROUP BY c.id
            ORDER BY c.title
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a collection with its product count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        id: CollectionId,
    ) -> Result<Option<CollectionWithCount>, RepositoryError> {
        let row = sqlx::query_as::<_, CollectionWithCountRow>(
            r"
            SELECT c.id, c.title, c.featured_product_id,
                   COUNT(p.id) AS products_count
            FROM collections c
            LEFT JOIN products p ON p.collection_id = c.id
            WHERE c.id = $1
            GROUP BY c.id
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a new collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the featured product
    /// does not exist. Returns `RepositoryError::Database` for other database
    /// errors.
    pub async fn create(&self, input: &CollectionInput) -> Result<Collection, RepositoryError> {
        let row = sqlx::query_as::<_, CollectionRow>(
            r"
            INSERT INTO collections (title, featured_product_id)
            VALUES ($1, $2)
            RETURNING id, title, featured_product_id
            ",
        )
        .bind(&input.title)
        .bind(input.featured_product_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| invalid_ref_on_fk(e, "No product with the given ID was found."))?;

        Ok(row.into())
    }

    /// Replace a collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the collection doesn't exist,
    /// `RepositoryError::InvalidReference` if the featured product does not
    /// exist.
    pub async fn update(
        &self,
        id: CollectionId,
        input: &CollectionInput,
    ) -> Result<Collection, RepositoryError> {
        let row = sqlx::query_as::<_, CollectionRow>(
            r"
            UPDATE collections
            SET title = $2, featured_product_id = $3
            WHERE id = $1
            RETURNING id, title, featured_product_id
            ",
        )
        .bind(id)
        .bind(&input.title)
        .bind(input.featured_product_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| invalid_ref_on_fk(e, "No product with the given ID was found."))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Number of products still referencing this collection, used for the
    /// referential-protection pre-check before delete.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_count(&self, id: CollectionId) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE collection_id = $1",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;
        Ok(count)
    }

    /// Delete a collection.
    ///
    /// # Returns
    ///
    /// Returns `true` if the collection was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Protected` if products still reference the
    /// collection (the RESTRICT backstop behind the pre-check).
    pub async fn delete(&self, id: CollectionId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM collections WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                protected_on_fk(
                    e,
                    "Collection cannot be deleted because it includes one or more products.",
                )
            })?;

        Ok(result.rows_affected() > 0)
    }
}
