//! Order ledger models.
//!
//! Orders are durable history: order items snapshot the product's unit price
//! at placement time, so later catalog price changes never alter what a
//! customer was billed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartwheel_core::{CartId, CustomerId, OrderId, OrderItemId, PaymentStatus};

use super::ProductSummary;

/// An order header.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub placed_at: DateTime<Utc>,
    pub payment_status: PaymentStatus,
}

/// A purchased line with its price snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product: ProductSummary,
    pub quantity: i32,
    /// Unit price at the moment the order was placed.
    pub unit_price: Decimal,
}

/// A fully materialized order, suitable for serialization to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub placed_at: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    pub items: Vec<OrderItem>,
}

/// Payload for placing an order: the cart to drain.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    pub cart_id: CartId,
}

/// Payload for updating an order's payment status (staff only).
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrder {
    pub payment_status: PaymentStatus,
}
