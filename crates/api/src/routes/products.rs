//! Product route handlers.
//!
//! Listings are public and support filtering, substring search, whitelisted
//! ordering, and page-number pagination. Mutations are staff-only.

use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use cartwheel_core::{CollectionId, ProductId, policy::{Operation, Resource}};

use crate::db::{ProductFilter, ProductOrdering, ProductRepository};
use crate::error::{AppError, Result};
use crate::middleware::{OptionalUser, authorize};
use crate::models::{ProductImage, ProductInput, ProductResponse};
use crate::pagination::{Page, PageParams};
use crate::routes::role_of;
use crate::state::AppState;

/// Query parameters for product listings.
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub collection_id: Option<CollectionId>,
    pub unit_price_gt: Option<Decimal>,
    pub unit_price_lt: Option<Decimal>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ProductListQuery {
    fn filter(&self) -> Result<ProductFilter> {
        let ordering = match self.ordering.as_deref() {
            None => ProductOrdering::default(),
            Some(raw) => ProductOrdering::from_str(raw).map_err(AppError::Validation)?,
        };

        Ok(ProductFilter {
            collection_id: self.collection_id,
            unit_price_gt: self.unit_price_gt,
            unit_price_lt: self.unit_price_lt,
            search: self.search.clone(),
            ordering,
        })
    }

    const fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// `GET /products`
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Page<ProductResponse>>> {
    authorize(role_of(user.as_ref()), Resource::Product, Operation::List)?;

    let filter = query.filter()?;
    let params = query.page_params();
    let default_page_size = state.config().page_size;

    let repo = ProductRepository::new(state.pool());
    let count = repo.count(&filter).await?;
    let products = repo
        .list(
            &filter,
            params.limit(default_page_size),
            params.offset(default_page_size),
        )
        .await?;

    let ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
    let mut images_by_product: HashMap<ProductId, Vec<ProductImage>> = HashMap::new();
    for image in repo.images_for(&ids).await? {
        images_by_product
            .entry(image.product_id)
            .or_default()
            .push(image);
    }

    let results = products
        .into_iter()
        .map(|product| {
            let images = images_by_product.remove(&product.id).unwrap_or_default();
            ProductResponse::new(product, images)
        })
        .collect();

    Ok(Json(Page::new(count, results)))
}

/// `GET /products/{id}`
pub async fn show(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductResponse>> {
    authorize(role_of(user.as_ref()), Resource::Product, Operation::Retrieve)?;

    let repo = ProductRepository::new(state.pool());
    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let images = repo.images_for(&[id]).await?;

    Ok(Json(ProductResponse::new(product, images)))
}

/// `POST /products`
pub async fn create(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    authorize(role_of(user.as_ref()), Resource::Product, Operation::Create)?;
    input.validate().map_err(AppError::Validation)?;

    let product = ProductRepository::new(state.pool()).create(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse::new(product, Vec::new())),
    ))
}

/// `PUT /products/{id}`
pub async fn update(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<ProductId>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductResponse>> {
    authorize(role_of(user.as_ref()), Resource::Product, Operation::Update)?;
    input.validate().map_err(AppError::Validation)?;

    let repo = ProductRepository::new(state.pool());
    let product = repo.update(id, &input).await?;
    let images = repo.images_for(&[id]).await?;

    Ok(Json(ProductResponse::new(product, images)))
}

/// `DELETE /products/{id}`
///
/// A product referenced by any order item is protected and cannot be
/// deleted; the response is 405 with a stable message.
pub async fn destroy(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    authorize(role_of(user.as_ref()), Resource::Product, Operation::Delete)?;

    let repo = ProductRepository::new(state.pool());
    if repo.order_item_count(id).await? > 0 {
        return Err(AppError::Protected(
            "Product cannot be deleted because it is associated with an order item.".to_owned(),
        ));
    }

    if repo.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("product {id}")))
    }
}
