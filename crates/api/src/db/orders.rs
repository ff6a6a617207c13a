//! Order ledger repository for database operations.
//!
//! Reads, payment-status updates, and deletes. Order *placement* is the
//! transactional workflow in `services::orders`; it does not go through this
//! repository because it must hold a single transaction across several
//! tables.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use cartwheel_core::{CustomerId, OrderId, OrderItemId, PaymentStatus, ProductId};

use super::{RepositoryError, protected_on_fk};
use crate::models::{Order, OrderItem, OrderWithItems, ProductSummary};

/// Internal row type for order header queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_id: i32,
    placed_at: DateTime<Utc>,
    payment_status: PaymentStatus,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            customer_id: CustomerId::new(row.customer_id),
            placed_at: row.placed_at,
            payment_status: row.payment_status,
        }
    }
}

/// Internal row type for order lines joined with their product.
///
/// `unit_price` is the snapshot taken at placement; `product_unit_price` is
/// the product's current catalog price, embedded in the product summary.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: i32,
    title: String,
    product_unit_price: Decimal,
    quantity: i32,
    unit_price: Decimal,
}

impl OrderItemRow {
    fn into_item(self) -> (OrderId, OrderItem) {
        (
            OrderId::new(self.order_id),
            OrderItem {
                id: OrderItemId::new(self.id),
                product: ProductSummary {
                    id: ProductId::new(self.product_id),
                    title: self.title,
                    unit_price: self.product_unit_price,
                },
                quantity: self.quantity,
                unit_price: self.unit_price,
            },
        )
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all orders, newest first. Staff view.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, customer_id, placed_at, payment_status
            FROM orders
            ORDER BY placed_at DESC, id DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Total number of orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_all(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// List one customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_customer(
        &self,
        customer_id: CustomerId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, customer_id, placed_at, payment_status
            FROM orders
            WHERE customer_id = $1
            ORDER BY placed_at DESC, id DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(customer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        self.attach_items(rows).await
    }

    /// Total number of a customer's orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<i64, RepositoryError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE customer_id = $1")
                .bind(customer_id)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }

    /// Get one order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<OrderWithItems>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, customer_id, placed_at, payment_status
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(self.attach_items(vec![row]).await?.into_iter().next())
    }

    /// Update an order's payment status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        payment_status: PaymentStatus,
    ) -> Result<OrderWithItems, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE orders
            SET payment_status = $2
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(payment_status)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Number of items on this order, used for the referential-protection
    /// pre-check before delete.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn item_count(&self, id: OrderId) -> Result<i64, RepositoryError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM order_items WHERE order_id = $1")
                .bind(id)
                .fetch_one(self.pool)
                .await?;
        Ok(count)
    }

    /// Delete an order.
    ///
    /// # Returns
    ///
    /// Returns `true` if the order was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Protected` if order items still reference the
    /// order; the ledger protects its history.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                protected_on_fk(
                    e,
                    "Order cannot be deleted because it has order items.",
                )
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetch items for a page of orders in one round trip and zip them onto
    /// their headers, preserving header order.
    async fn attach_items(
        &self,
        rows: Vec<OrderRow>,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT oi.id, oi.order_id, oi.product_id, p.title,
                   p.unit_price AS product_unit_price,
                   oi.quantity, oi.unit_price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.id
            ",
        )
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: BTreeMap<i32, Vec<OrderItem>> = BTreeMap::new();
        for item_row in item_rows {
            let (order_id, item) = item_row.into_item();
            by_order.entry(order_id.as_i32()).or_default().push(item);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = by_order.remove(&row.id).unwrap_or_default();
                let order = Order::from(row);
                OrderWithItems {
                    id: order.id,
                    customer_id: order.customer_id,
                    placed_at: order.placed_at,
                    payment_status: order.payment_status,
                    items,
                }
            })
            .collect())
    }
}
