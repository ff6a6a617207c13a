//! Cart models.
//!
//! A cart is ephemeral: it exists from creation until checkout or explicit
//! deletion, and owns its items (cascade-deleted with the cart).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartwheel_core::{CartId, CartItemId, ProductId};

use super::ProductSummary;

/// A cart header.
#[derive(Debug, Clone, Serialize)]
pub struct Cart {
    pub id: CartId,
    pub created_at: DateTime<Utc>,
}

/// A cart line with its product summary and derived line total.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product: ProductSummary,
    pub quantity: i32,
    pub total_price: Decimal,
}

impl CartItem {
    /// Line total for a quantity at the product's current price.
    #[must_use]
    pub fn line_total(quantity: i32, unit_price: Decimal) -> Decimal {
        unit_price * Decimal::from(quantity)
    }
}

/// A cart with its items and computed total price.
#[derive(Debug, Clone, Serialize)]
pub struct CartWithItems {
    pub id: CartId,
    pub created_at: DateTime<Utc>,
    pub items: Vec<CartItem>,
    pub total_price: Decimal,
}

impl CartWithItems {
    /// Assemble the response, summing line totals.
    #[must_use]
    pub fn new(cart: Cart, items: Vec<CartItem>) -> Self {
        let total_price = items.iter().map(|item| item.total_price).sum();
        Self {
            id: cart.id,
            created_at: cart.created_at,
            items,
            total_price,
        }
    }
}

/// Payload for adding a product to a cart. Re-adding a product already in
/// the cart accumulates quantity on the existing line.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCartItem {
    pub product_id: ProductId,
    pub quantity: i32,
}

impl AddCartItem {
    /// Validate field ranges.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        validate_quantity(self.quantity)
    }
}

/// Payload for updating a cart line's quantity. Zero is a validation error,
/// not an implicit delete.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCartItem {
    pub quantity: i32,
}

impl UpdateCartItem {
    /// Validate field ranges.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        validate_quantity(self.quantity)
    }
}

fn validate_quantity(quantity: i32) -> Result<(), String> {
    if quantity < 1 {
        return Err("quantity must be at least 1".to_owned());
    }
    Ok(())
}
