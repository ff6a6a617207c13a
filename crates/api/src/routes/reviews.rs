//! Review route handlers, nested under a product.
//!
//! Every operation first resolves the parent product, so a review can never
//! be read or written through the wrong product URL.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use cartwheel_core::{ProductId, ReviewId, policy::{Operation, Resource}};

use crate::db::{ProductRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, authorize};
use crate::models::{Review, ReviewInput};
use crate::routes::role_of;
use crate::state::AppState;

/// Ensure the parent product exists.
async fn require_product(state: &AppState, product_id: ProductId) -> Result<()> {
    ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;
    Ok(())
}

/// `GET /products/{product_id}/reviews`
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Vec<Review>>> {
    authorize(role_of(user.as_ref()), Resource::Review, Operation::List)?;
    require_product(&state, product_id).await?;

    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(product_id)
        .await?;
    Ok(Json(reviews))
}

/// `GET /products/{product_id}/reviews/{id}`
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path((product_id, id)): Path<(ProductId, ReviewId)>,
) -> Result<Json<Review>> {
    authorize(role_of(user.as_ref()), Resource::Review, Operation::Retrieve)?;

    let review = ReviewRepository::new(state.pool())
        .get(product_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("review {id}")))?;
    Ok(Json(review))
}

/// `POST /products/{product_id}/reviews`
pub async fn create(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(product_id): Path<ProductId>,
    Json(input): Json<ReviewInput>,
) -> Result<(StatusCode, Json<Review>)> {
    authorize(role_of(user.as_ref()), Resource::Review, Operation::Create)?;
    input.validate().map_err(AppError::Validation)?;
    require_product(&state, product_id).await?;

    let review = ReviewRepository::new(state.pool())
        .create(product_id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// `PUT /products/{product_id}/reviews/{id}`
pub async fn update(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path((product_id, id)): Path<(ProductId, ReviewId)>,
    Json(input): Json<ReviewInput>,
) -> Result<Json<Review>> {
    authorize(role_of(user.as_ref()), Resource::Review, Operation::Update)?;
    input.validate().map_err(AppError::Validation)?;

    let review = ReviewRepository::new(state.pool())
        .update(product_id, id, &input)
        .await?;
    Ok(Json(review))
}

/// `DELETE /products/{product_id}/reviews/{id}`
pub async fn destroy(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path((product_id, id)): Path<(ProductId, ReviewId)>,
) -> Result<StatusCode> {
    authorize(role_of(user.as_ref()), Resource::Review, Operation::Delete)?;

    if ReviewRepository::new(state.pool())
        .delete(product_id, id)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("review {id}")))
    }
}
