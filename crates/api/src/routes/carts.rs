//! Cart route handlers.
//!
//! Carts need no authentication: the opaque UUID minted at creation is the
//! capability to read and mutate the cart. Retrieval always includes the
//! items and the computed total price.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use cartwheel_core::{CartId, CartItemId};

use crate::db::CartRepository;
use crate::error::{AppError, Result};
use crate::models::{AddCartItem, CartItem, CartWithItems, UpdateCartItem};
use crate::state::AppState;

async fn get_cart(state: &AppState, id: CartId) -> Result<CartWithItems> {
    CartRepository::new(state.pool())
        .get_with_items(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cart {id}")))
}

/// `POST /carts`
pub async fn create(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CartWithItems>)> {
    let cart = CartRepository::new(state.pool()).create().await?;
    Ok((
        StatusCode::CREATED,
        Json(CartWithItems::new(cart, Vec::new())),
    ))
}

/// `GET /carts/{id}`
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<CartId>,
) -> Result<Json<CartWithItems>> {
    Ok(Json(get_cart(&state, id).await?))
}

/// `DELETE /carts/{id}`
pub async fn destroy(State(state): State<AppState>, Path(id): Path<CartId>) -> Result<StatusCode> {
    if CartRepository::new(state.pool()).delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("cart {id}")))
    }
}

/// `GET /carts/{id}/items`
pub async fn items(
    State(state): State<AppState>,
    Path(id): Path<CartId>,
) -> Result<Json<Vec<CartItem>>> {
    let cart = get_cart(&state, id).await?;
    Ok(Json(cart.items))
}

/// `POST /carts/{id}/items`
///
/// Adding a product already in the cart accumulates onto the existing line
/// instead of creating a duplicate.
pub async fn add_item(
    State(state): State<AppState>,
    Path(id): Path<CartId>,
    Json(input): Json<AddCartItem>,
) -> Result<(StatusCode, Json<CartItem>)> {
    input.validate().map_err(AppError::Validation)?;

    let repo = CartRepository::new(state.pool());
    repo.get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("cart {id}")))?;

    let item = repo.add_item(id, &input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// `PATCH /carts/{id}/items/{item_id}`
///
/// Setting the quantity to zero is rejected; removal is the DELETE below.
pub async fn update_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(CartId, CartItemId)>,
    Json(input): Json<UpdateCartItem>,
) -> Result<Json<CartItem>> {
    input.validate().map_err(AppError::Validation)?;

    let item = CartRepository::new(state.pool())
        .update_item(id, item_id, input.quantity)
        .await?;
    Ok(Json(item))
}

/// `DELETE /carts/{id}/items/{item_id}`
pub async fn remove_item(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(CartId, CartItemId)>,
) -> Result<StatusCode> {
    if CartRepository::new(state.pool())
        .remove_item(id, item_id)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("cart item {item_id}")))
    }
}
