//! Product image metadata models.
//!
//! Only the image path is tracked; file storage is out of scope.

use serde::{Deserialize, Serialize};

use cartwheel_core::{ProductId, ProductImageId};

/// Image metadata attached to a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub image: String,
}

/// Payload for creating or replacing image metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductImageInput {
    pub image: String,
}

impl ProductImageInput {
    /// Validate field ranges.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message for the first violated constraint.
    pub fn validate(&self) -> Result<(), String> {
        if self.image.trim().is_empty() {
            return Err("image must not be empty".to_owned());
        }
        Ok(())
    }
}
