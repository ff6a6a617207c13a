//! Product catalog models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartwheel_core::{CollectionId, ProductId};

/// Tax multiplier applied for the display-only `price_with_tax` field.
const TAX_RATE: Decimal = Decimal::from_parts(11, 0, 0, false, 1); // 1.1

/// A catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub inventory: i32,
    pub last_update: DateTime<Utc>,
    pub collection_id: CollectionId,
}

impl Product {
    /// Unit price with tax applied, for display.
    #[must_use]
    pub fn price_with_tax(&self) -> Decimal {
        (self.unit_price * TAX_RATE).round_dp(2)
    }
}

/// Product response payload, with the derived tax-inclusive price and any
/// attached image metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub price_with_tax: Decimal,
    pub inventory: i32,
    pub last_update: DateTime<Utc>,
    pub collection_id: CollectionId,
    pub images: Vec<super::ProductImage>,
}

impl ProductResponse {
    /// Build a response from a product and its images.
    #[must_use]
    pub fn new(product: Product, images: Vec<super::ProductImage>) -> Self {
        let price_with_tax = product.price_with_tax();
        Self {
            id: product.id,
            title: product.title,
            slug: product.slug,
            description: product.description,
            unit_price: product.unit_price,
            price_with_tax,
            inventory: product.inventory,
            last_update: product.last_update,
            collection_id: product.collection_id,
            images,
        }
    }
}

/// Abbreviated product representation embedded in cart and order lines.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub title: String,
    pub unit_price: Decimal,
}

/// Payload for creating or replacing a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductInput {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub unit_price: Decimal,
    pub inventory: i32,
    pub collection_id: CollectionId,
}

impl ProductInput {
    /// Validate field ranges.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_owned());
        }
        if self.unit_price < Decimal::ONE {
            return Err("unit_price must be at least 1".to_owned());
        }
        if self.inventory < 0 {
            return Err("inventory must not be negative".to_owned());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ProductInput {
        ProductInput {
            title: "Desk Lamp".to_owned(),
            slug: "desk-lamp".to_owned(),
            description: None,
            unit_price: Decimal::new(1099, 2),
            inventory: 5,
            collection_id: CollectionId::new(1),
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn price_below_one_is_rejected() {
        let mut bad = input();
        bad.unit_price = Decimal::new(99, 2); // 0.99
        assert!(bad.validate().is_err());
    }

    #[test]
    fn negative_inventory_is_rejected() {
        let mut bad = input();
        bad.inventory = -1;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn price_with_tax_adds_ten_percent() {
        let product = Product {
            id: ProductId::new(1),
            title: "X".to_owned(),
            slug: "x".to_owned(),
            description: None,
            unit_price: Decimal::new(1099, 2), // 10.99
            inventory: 1,
            last_update: Utc::now(),
            collection_id: CollectionId::new(1),
        };
        assert_eq!(product.price_with_tax(), Decimal::new(1209, 2)); // 12.09
    }
}
