//! The order placement workflow.
//!
//! This is the one multi-entity unit of work in the system: drain a cart
//! into a new order, snapshotting each product's current unit price into the
//! order items, then delete the cart. Everything happens inside a single
//! transaction; a failure at any step leaves the cart untouched and no order
//! rows behind.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use cartwheel_core::{
    CartId, CustomerId, OrderId, OrderItemId, PaymentStatus, ProductId, UserId,
};

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::models::{OrderItem, OrderWithItems, ProductSummary};

use super::signals::Signals;

/// Cart line joined with its product, read under the cart lock.
#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    product_id: i32,
    title: String,
    unit_price: Decimal,
    quantity: i32,
}

/// Freshly inserted order header.
#[derive(Debug, sqlx::FromRow)]
struct PlacedOrderRow {
    id: i32,
    customer_id: i32,
    placed_at: DateTime<Utc>,
    payment_status: PaymentStatus,
}

/// Freshly inserted order item.
#[derive(Debug, sqlx::FromRow)]
struct PlacedItemRow {
    id: i32,
    product_id: i32,
    quantity: i32,
    unit_price: Decimal,
}

/// Place an order from a cart on behalf of `user_id`.
///
/// The cart row is locked with `FOR UPDATE`, so concurrent placements of the
/// same cart serialize: exactly one wins, and the loser observes the cart as
/// already gone once the winner commits.
///
/// # Errors
///
/// - `NotFound` if the cart does not exist (or lost the race).
/// - `Validation` if the cart is empty.
/// - `Internal` if the caller has no customer profile; provisioning is
///   automatic, so this is an invariant violation rather than a user error.
pub async fn place_order(
    pool: &PgPool,
    signals: &Signals,
    user_id: UserId,
    cart_id: CartId,
) -> Result<OrderWithItems> {
    let mut tx = pool.begin().await.map_err(RepositoryError::from)?;

    // Serialize concurrent placements of the same cart.
    let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM carts WHERE id = $1 FOR UPDATE")
        .bind(cart_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

    if locked.is_none() {
        return Err(AppError::NotFound(format!("cart {cart_id}")));
    }

    let lines = sqlx::query_as::<_, LineRow>(
        r"
        SELECT ci.product_id, p.title, p.unit_price, ci.quantity
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.cart_id = $1
        ORDER BY ci.id
        ",
    )
    .bind(cart_id)
    .fetch_all(&mut *tx)
    .await
    .map_err(RepositoryError::from)?;

    if lines.is_empty() {
        return Err(AppError::Validation("The cart is empty.".to_owned()));
    }

    let customer_id: Option<i32> =
        sqlx::query_scalar("SELECT id FROM customers WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(RepositoryError::from)?;

    let Some(customer_id) = customer_id else {
        // Provisioning is automatic at identity creation; a missing profile
        // is a broken invariant, not a user error.
        return Err(AppError::Internal(format!(
            "no customer profile for user {user_id}"
        )));
    };

    let order = sqlx::query_as::<_, PlacedOrderRow>(
        r"
        INSERT INTO orders (customer_id)
        VALUES ($1)
        RETURNING id, customer_id, placed_at, payment_status
        ",
    )
    .bind(customer_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(RepositoryError::from)?;

    // Copy every cart line into the ledger, snapshotting the product's
    // current unit price.
    let item_rows = sqlx::query_as::<_, PlacedItemRow>(
        r"
        INSERT INTO order_items (order_id, product_id, quantity, unit_price)
        SELECT $1, ci.product_id, ci.quantity, p.unit_price
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.cart_id = $2
        RETURNING id, product_id, quantity, unit_price
        ",
    )
    .bind(order.id)
    .bind(cart_id)
    .fetch_all(&mut *tx)
    .await
    .map_err(RepositoryError::from)?;

    // The cart is spent; its items cascade with it.
    sqlx::query("DELETE FROM carts WHERE id = $1")
        .bind(cart_id)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from)?;

    tx.commit().await.map_err(RepositoryError::from)?;

    let products: HashMap<i32, &LineRow> =
        lines.iter().map(|line| (line.product_id, line)).collect();

    let items = item_rows
        .into_iter()
        .map(|row| {
            let line = products.get(&row.product_id).ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "order item references product {} not present in cart",
                    row.product_id
                ))
            })?;
            Ok(OrderItem {
                id: OrderItemId::new(row.id),
                product: ProductSummary {
                    id: ProductId::new(row.product_id),
                    title: line.title.clone(),
                    unit_price: line.unit_price,
                },
                quantity: row.quantity,
                unit_price: row.unit_price,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let placed = OrderWithItems {
        id: OrderId::new(order.id),
        customer_id: CustomerId::new(order.customer_id),
        placed_at: order.placed_at,
        payment_status: order.payment_status,
        items,
    };

    signals.emit_order_created(&placed).await;

    Ok(placed)
}
