//! Customer route handlers.
//!
//! Arbitrary customer records are staff-only; `/customers/me` lets any
//! authenticated caller read and update their own profile. Profiles are
//! provisioned automatically at identity creation, never through this
//! surface.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use cartwheel_core::{CustomerId, policy::{Operation, Resource}};

use crate::db::CustomerRepository;
use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, authorize};
use crate::models::{Customer, CustomerInput};
use crate::pagination::{Page, PageParams};
use crate::state::AppState;

/// `GET /customers`
pub async fn index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Customer>>> {
    authorize(user.role(), Resource::Customer, Operation::List)?;

    let default_page_size = state.config().page_size;
    let repo = CustomerRepository::new(state.pool());
    let count = repo.count().await?;
    let customers = repo
        .list(
            params.limit(default_page_size),
            params.offset(default_page_size),
        )
        .await?;

    Ok(Json(Page::new(count, customers)))
}

/// `GET /customers/{id}`
pub async fn show(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<CustomerId>,
) -> Result<Json<Customer>> {
    authorize(user.role(), Resource::Customer, Operation::Retrieve)?;

    let customer = CustomerRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;
    Ok(Json(customer))
}

/// `PUT /customers/{id}`
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<CustomerId>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<Customer>> {
    authorize(user.role(), Resource::Customer, Operation::Update)?;

    let customer = CustomerRepository::new(state.pool())
        .update(id, &input)
        .await?;
    Ok(Json(customer))
}

/// `GET /customers/me`
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Customer>> {
    authorize(user.role(), Resource::CustomerSelf, Operation::Retrieve)?;

    let customer = CustomerRepository::new(state.pool())
        .get_by_user(user.id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("no customer profile for user {}", user.id)))?;
    Ok(Json(customer))
}

/// `PUT /customers/me`
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CustomerInput>,
) -> Result<Json<Customer>> {
    authorize(user.role(), Resource::CustomerSelf, Operation::Update)?;

    let customer = CustomerRepository::new(state.pool())
        .update_by_user(user.id, &input)
        .await
        .map_err(|err| match err {
            crate::db::RepositoryError::NotFound => {
                AppError::Internal(format!("no customer profile for user {}", user.id))
            }
            other => other.into(),
        })?;
    Ok(Json(customer))
}

/// `GET /customers/{id}/history`
///
/// Stub endpoint kept for surface compatibility.
pub async fn history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<CustomerId>,
) -> Result<String> {
    authorize(user.role(), Resource::CustomerHistory, Operation::Retrieve)?;

    CustomerRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    Ok("ok".to_owned())
}
