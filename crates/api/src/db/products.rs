//! Product repository for database operations.
//!
//! Listing supports server-side filtering by collection and price range,
//! substring search over title/description, whitelisted ordering, and
//! paging. The filter is assembled with `sqlx::QueryBuilder` so every value
//! is bound, never interpolated.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use cartwheel_core::{CollectionId, ProductId, ProductImageId};

use super::{RepositoryError, invalid_ref_on_fk, protected_on_fk};
use crate::models::{Product, ProductImage, ProductInput};

/// Whitelisted orderings for product listings. Serialized form follows the
/// `field` / `-field` convention (`-` for descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductOrdering {
    #[default]
    Title,
    UnitPrice,
    UnitPriceDesc,
    LastUpdate,
    LastUpdateDesc,
}

impl ProductOrdering {
    /// ORDER BY clause body for this ordering.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::UnitPrice => "unit_price",
            Self::UnitPriceDesc => "unit_price DESC",
            Self::LastUpdate => "last_update",
            Self::LastUpdateDesc => "last_update DESC",
        }
    }
}

impl std::str::FromStr for ProductOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unit_price" => Ok(Self::UnitPrice),
            "-unit_price" => Ok(Self::UnitPriceDesc),
            "last_update" => Ok(Self::LastUpdate),
            "-last_update" => Ok(Self::LastUpdateDesc),
            _ => Err(format!("invalid ordering: {s}")),
        }
    }
}

/// Filter parameters for product listings.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub collection_id: Option<CollectionId>,
    pub unit_price_gt: Option<Decimal>,
    pub unit_price_lt: Option<Decimal>,
    pub search: Option<String>,
    pub ordering: ProductOrdering,
}

impl ProductFilter {
    /// Append the WHERE conditions for this filter to `builder`.
    fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        if let Some(collection_id) = self.collection_id {
            builder.push(" AND collection_id = ");
            builder.push_bind(collection_id);
        }
        if let Some(gt) = self.unit_price_gt {
            builder.push(" AND unit_price > ");
            builder.push_bind(gt);
        }
        if let Some(lt) = self.unit_price_lt {
            builder.push(" AND unit_price < ");
            builder.push_bind(lt);
        }
        if let Some(ref search) = self.search {
            let pattern = format!("%{}%", escape_like(search));
            builder.push(" AND (title ILIKE ");
            builder.push_bind(pattern.clone());
            builder.push(" OR description ILIKE ");
            builder.push_bind(pattern);
            builder.push(")");
        }
    }
}

/// Escape LIKE metacharacters in a user-supplied search term. Backslash
/// first so escaped wildcards are not re-escaped.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    title: String,
    slug: String,
    description: Option<String>,
    unit_price: Decimal,
    inventory: i32,
    last_update: DateTime<Utc>,
    collection_id: i32,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            title: row.title,
            slug: row.slug,
            description: row.description,
            unit_price: row.unit_price,
            inventory: row.inventory,
            last_update: row.last_update,
            collection_id: CollectionId::new(row.collection_id),
        }
    }
}

/// Internal row type for product image queries.
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

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products matching `filter`, paged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        filter: &ProductFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT id, title, slug, description, unit_price, inventory, last_update, \
             collection_id FROM products WHERE TRUE",
        );
        filter.push_conditions(&mut builder);
        builder.push(" ORDER BY ");
        builder.push(filter.ordering.as_sql());
        builder.push(" LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows = builder
            .build_query_as::<ProductRow>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Total number of products matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, filter: &ProductFilter) -> Result<i64, RepositoryError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products WHERE TRUE");
        filter.push_conditions(&mut builder);

        let count: i64 = builder.build_query_scalar().fetch_one(self.pool).await?;
        Ok(count)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, title, slug, description, unit_price, inventory, last_update,
                   collection_id
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the collection does not
    /// exist. Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (title, slug, description, unit_price, inventory, collection_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, slug, description, unit_price, inventory, last_update,
                      collection_id
            ",
        )
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.unit_price)
        .bind(input.inventory)
        .bind(input.collection_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| invalid_ref_on_fk(e, "No collection with the given ID was found."))?;

        Ok(row.into())
    }

    /// Replace a product, refreshing its `last_update` timestamp.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist,
    /// `RepositoryError::InvalidReference` if the collection does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products
            SET title = $2, slug = $3, description = $4, unit_price = $5, inventory = $6,
                collection_id = $7, last_update = now()
            WHERE id = $1
            RETURNING id, title, slug, description, unit_price, inventory, last_update,
                      collection_id
            ",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.description)
        .bind(input.unit_price)
        .bind(input.inventory)
        .bind(input.collection_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| invalid_ref_on_fk(e, "No collection with the given ID was found."))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Number of order items referencing this product, used for the
    /// referential-protection pre-check before delete.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn order_item_count(&self, id: ProductId) -> Result<i64, RepositoryError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM order_items WHERE product_id = $1")
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Protected` if order items still reference the
    /// product (the RESTRICT backstop behind the pre-check).
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                protected_on_fk(
                    e,
                    "Product cannot be deleted because it is associated with an order item.",
                )
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetch image metadata for a set of products in one round trip.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn images_for(
        &self,
        product_ids: &[ProductId],
    ) -> Result<Vec<ProductImage>, RepositoryError> {
        let raw_ids: Vec<i32> = product_ids.iter().map(|id| id.as_i32()).collect();
        let rows = sqlx::query_as::<_, ProductImageRow>(
            r"
            SELECT id, product_id, image
            FROM product_images
            WHERE product_id = ANY($1)
            ORDER BY id
            ",
        )
        .bind(&raw_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
