//! Product review models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use cartwheel_core::{ProductId, ReviewId};

/// A customer review attached to a product.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
}

/// Payload for creating or replacing a review. The product comes from the
/// URL, the date from the server clock.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    pub name: String,
    pub description: String,
}

impl ReviewInput {
    /// Validate field ranges.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_owned());
        }
        if self.description.trim().is_empty() {
            return Err("description must not be empty".to_owned());
        }
        Ok(())
    }
}
