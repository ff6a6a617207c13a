//! Collection route handlers.
//!
//! Reads are public; mutations are staff-only. Responses carry a
//! `products_count` annotation.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use cartwheel_core::{CollectionId, policy::{Operation, Resource}};

use crate::db::CollectionRepository;
use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, authorize};
use crate::models::{CollectionInput, CollectionWithCount};
use crate::routes::role_of;
use crate::state::AppState;

/// `GET /collections`
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<Json<Vec<CollectionWithCount>>> {
    authorize(role_of(user.as_ref()), Resource::Collection, Operation::List)?;

    let collections = CollectionRepository::new(state.pool()).list().await?;
    Ok(Json(collections))
}

/// `GET /collections/{id}`
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<CollectionId>,
) -> Result<Json<CollectionWithCount>> {
    authorize(
        role_of(user.as_ref()),
        Resource::Collection,
        Operation::Retrieve,
    )?;

    let collection = CollectionRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("collection {id}")))?;

    Ok(Json(collection))
}

/// `POST /collections`
pub async fn create(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Json(input): Json<CollectionInput>,
) -> Result<(StatusCode, Json<CollectionWithCount>)> {
    authorize(
        role_of(user.as_ref()),
        Resource::Collection,
        Operation::Create,
    )?;
    input.validate().map_err(AppError::Validation)?;

    let repo = CollectionRepository::new(state.pool());
    let created = repo.create(&input).await?;
    let collection = repo
        .get(created.id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("collection {} vanished", created.id)))?;

    Ok((StatusCode::CREATED, Json(collection)))
}

/// `PUT /collections/{id}`
pub async fn update(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<CollectionId>,
    Json(input): Json<CollectionInput>,
) -> Result<Json<CollectionWithCount>> {
    authorize(
        role_of(user.as_ref()),
        Resource::Collection,
        Operation::Update,
    )?;
    input.validate().map_err(AppError::Validation)?;

    let repo = CollectionRepository::new(state.pool());
    repo.update(id, &input).await?;
    let collection = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("collection {id} vanished")))?;

    Ok(Json(collection))
}

/// `DELETE /collections/{id}`
///
/// A collection that still includes products is protected and cannot be
/// deleted; the response is 405 with a stable message.
pub async fn destroy(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<CollectionId>,
) -> Result<StatusCode> {
    authorize(
        role_of(user.as_ref()),
        Resource::Collection,
        Operation::Delete,
    )?;

    let repo = CollectionRepository::new(state.pool());
    if repo.product_count(id).await? > 0 {
        return Err(AppError::Protected(
            "Collection cannot be deleted because it includes one or more products.".to_owned(),
        ));
    }

    if repo.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("collection {id}")))
    }
}
