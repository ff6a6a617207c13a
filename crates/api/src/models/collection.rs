//! Collection models.

use serde::{Deserialize, Serialize};

use cartwheel_core::{CollectionId, ProductId};

/// A product collection.
#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    pub id: CollectionId,
    pub title: String,
    pub featured_product_id: Option<ProductId>,
}

/// Collection response with the number of products it contains.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionWithCount {
    pub id: CollectionId,
    pub title: String,
    pub featured_product_id: Option<ProductId>,
    pub products_count: i64,
}

/// Payload for creating or replacing a collection.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionInput {
    pub title: String,
    #[serde(default)]
    pub featured_product_id: Option<ProductId>,
}

impl CollectionInput {
    /// Validate field ranges.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_owned());
        }
        Ok(())
    }
}
