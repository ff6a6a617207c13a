//! Order route handlers.
//!
//! Placement drains a cart through the transactional workflow in
//! `services::orders`. Listing and retrieval are ownership-scoped: staff see
//! every order, other callers only their own.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use cartwheel_core::{CustomerId, OrderId, policy::{Operation, Resource}};

use crate::db::{CustomerRepository, OrderRepository};
use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, authorize};
use crate::models::{CreateOrder, OrderWithItems, UpdateOrder, User};
use crate::pagination::{Page, PageParams};
use crate::services;
use crate::state::AppState;

/// Resolve the caller's customer id; absence is a provisioning invariant
/// violation.
async fn own_customer_id(state: &AppState, user: &User) -> Result<CustomerId> {
    let customer = CustomerRepository::new(state.pool())
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("no customer profile for user {}", user.id)))?;
    Ok(customer.id)
}

/// `POST /orders`
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateOrder>,
) -> Result<(StatusCode, Json<OrderWithItems>)> {
    authorize(user.role(), Resource::Order, Operation::Create)?;

    let order =
        services::orders::place_order(state.pool(), state.signals(), user.id, input.cart_id)
            .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /orders`
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<OrderWithItems>>> {
    authorize(user.role(), Resource::Order, Operation::List)?;

    let default_page_size = state.config().page_size;
    let limit = params.limit(default_page_size);
    let offset = params.offset(default_page_size);

    let repo = OrderRepository::new(state.pool());
    let (count, orders) = if user.is_staff {
        (repo.count_all().await?, repo.list_all(limit, offset).await?)
    } else {
        let customer_id = own_customer_id(&state, &user).await?;
        (
            repo.count_for_customer(customer_id).await?,
            repo.list_for_customer(customer_id, limit, offset).await?,
        )
    };

    Ok(Json(Page::new(count, orders)))
}

/// `GET /orders/{id}`
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderWithItems>> {
    authorize(user.role(), Resource::Order, Operation::Retrieve)?;

    let order = OrderRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    // Non-staff callers only see their own orders; a foreign order is
    // indistinguishable from a missing one.
    if !user.is_staff {
        let customer_id = own_customer_id(&state, &user).await?;
        if order.customer_id != customer_id {
            return Err(AppError::NotFound(format!("order {id}")));
        }
    }

    Ok(Json(order))
}

/// `PATCH /orders/{id}`
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<OrderId>,
    Json(input): Json<UpdateOrder>,
) -> Result<Json<OrderWithItems>> {
    authorize(user.role(), Resource::Order, Operation::Update)?;

    let order = OrderRepository::new(state.pool())
        .update_status(id, input.payment_status)
        .await?;
    Ok(Json(order))
}

/// `DELETE /orders/{id}`
///
/// An order that still has items is protected; the ledger keeps its history.
pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<OrderId>,
) -> Result<StatusCode> {
    authorize(user.role(), Resource::Order, Operation::Delete)?;

    let repo = OrderRepository::new(state.pool());
    if repo.item_count(id).await? > 0 {
        return Err(AppError::Protected(
            "Order cannot be deleted because it has order items.".to_owned(),
        ));
    }

    if repo.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("order {id}")))
    }
}
