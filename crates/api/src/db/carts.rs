//! Cart repository for database operations.
//!
//! Carts are anonymous: the UUID key is minted here and possession of it is
//! the capability to read and mutate the cart. Items cascade-delete with the
//! cart.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use cartwheel_core::{CartId, CartItemId, ProductId};

use super::{RepositoryError, invalid_ref_on_fk};
use crate::models::{AddCartItem, Cart, CartItem, CartWithItems, ProductSummary};

/// Internal row type for cart header queries.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: CartId,
    created_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
        }
    }
}

/// Internal row type for cart lines joined with their product.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: i32,
    product_id: i32,
    title: String,
    unit_price: Decimal,
    quantity: i32,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        let total_price = Self::line_total(row.quantity, row.unit_price);
        Self {
            id: CartItemId::new(row.id),
            product: ProductSummary {
                id: ProductId::new(row.product_id),
                title: row.title,
                unit_price: row.unit_price,
            },
            quantity: row.quantity,
            total_price,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Mint a new empty cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            INSERT INTO carts (id)
            VALUES ($1)
            RETURNING id, created_at
            ",
        )
        .bind(CartId::generate())
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a cart header by its token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CartId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, created_at
            FROM carts
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// List a cart's lines with product summaries, insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, cart_id: CartId) -> Result<Vec<CartItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT ci.id, ci.product_id, p.title, p.unit_price, ci.quantity
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.id
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a cart with its items and computed total price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_items(
        &self,
        id: CartId,
    ) -> Result<Option<CartWithItems>, RepositoryError> {
        let Some(cart) = self.get(id).await? else {
            return Ok(None);
        };
        let items = self.items(id).await?;
        Ok(Some(CartWithItems::new(cart, items)))
    }

    /// Add a product to a cart. If the product is already in the cart, the
    /// quantities accumulate on the existing line instead of duplicating it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the product does not
    /// exist. Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        input: &AddCartItem,
    ) -> Result<CartItem, RepositoryError> {
        let item_id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            RETURNING id
            ",
        )
        .bind(cart_id)
        .bind(input.product_id)
        .bind(input.quantity)
        .fetch_one(self.pool)
        .await
        .map_err(|e| invalid_ref_on_fk(e, "No product with the given ID was found."))?;

        self.get_item(cart_id, CartItemId::new(item_id))
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Get one cart line scoped to its cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_item(
        &self,
        cart_id: CartId,
        item_id: CartItemId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            r"
            SELECT ci.id, ci.product_id, p.title, p.unit_price, ci.quantity
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.cart_id = $1 AND ci.id = $2
            ",
        )
        .bind(cart_id)
        .bind(item_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Set a cart line's quantity. Quantity validation happens upstream; zero
    /// never reaches this method.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist under
    /// this cart.
    pub async fn update_item(
        &self,
        cart_id: CartId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cart_items
            SET quantity = $3
            WHERE cart_id = $1 AND id = $2
            ",
        )
        .bind(cart_id)
        .bind(item_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get_item(cart_id, item_id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Remove a line from a cart.
    ///
    /// # Returns
    ///
    /// Returns `true` if the line was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        item_id: CartItemId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND id = $2")
            .bind(cart_id)
            .bind(item_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a cart; its items cascade.
    ///
    /// # Returns
    ///
    /// Returns `true` if the cart was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CartId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
