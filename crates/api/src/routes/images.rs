//! Product image metadata route handlers, nested under a product.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use cartwheel_core::{ProductId, ProductImageId, policy::{Operation, Resource}};

use crate::db::{ProductImageRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, authorize};
use crate::models::{ProductImage, ProductImageInput};
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

/// `GET /products/{product_id}/images`
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(product_id): Path<ProductId>,
) -> Result<Json<Vec<ProductImage>>> {
    authorize(role_of(user.as_ref()), Resource::ProductImage, Operation::List)?;
    require_product(&state, product_id).await?;

    let images = ProductImageRepository::new(state.pool())
        .list_for_product(product_id)
        .await?;
    Ok(Json(images))
}

/// `GET /products/{product_id}/images/{id}`
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path((product_id, id)): Path<(ProductId, ProductImageId)>,
) -> Result<Json<ProductImage>> {
    authorize(
        role_of(user.as_ref()),
        Resource::ProductImage,
        Operation::Retrieve,
    )?;

    let image = ProductImageRepository::new(state.pool())
        .get(product_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("image {id}")))?;
    Ok(Json(image))
}

/// `POST /products/{product_id}/images`
pub async fn create(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(product_id): Path<ProductId>,
    Json(input): Json<ProductImageInput>,
) -> Result<(StatusCode, Json<ProductImage>)> {
    authorize(
        role_of(user.as_ref()),
        Resource::ProductImage,
        Operation::Create,
    )?;
    input.validate().map_err(AppError::Validation)?;
    require_product(&state, product_id).await?;

    let image = ProductImageRepository::new(state.pool())
        .create(product_id, &input)
        .await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// `PUT /products/{product_id}/images/{id}`
pub async fn update(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path((product_id, id)): Path<(ProductId, ProductImageId)>,
    Json(input): Json<ProductImageInput>,
) -> Result<Json<ProductImage>> {
    authorize(
        role_of(user.as_ref()),
        Resource::ProductImage,
        Operation::Update,
    )?;
    input.validate().map_err(AppError::Validation)?;

    let image = ProductImageRepository::new(state.pool())
        .update(product_id, id, &input)
        .await?;
    Ok(Json(image))
}

/// `DELETE /products/{product_id}/images/{id}`
pub async fn destroy(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path((product_id, id)): Path<(ProductId, ProductImageId)>,
) -> Result<StatusCode> {
    authorize(
        role_of(user.as_ref()),
        Resource::ProductImage,
        Operation::Delete,
    )?;

    if ProductImageRepository::new(state.pool())
        .delete(product_id, id)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("image {id}")))
    }
}
