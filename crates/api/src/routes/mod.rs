//! HTTP route handlers for the Cartwheel API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Catalog
//! GET  /products                            - Product listing (filters, search, ordering, paging)
//! POST /products                            - Create product (staff)
//! GET  /products/{id}                       - Product detail
//! PUT  /products/{id}                       - Replace product (staff)
//! DELETE /products/{id}                     - Delete product (staff; protected if ordered)
//! GET/POST /products/{id}/reviews           - Reviews, nested
//! GET/PUT/DELETE /products/{id}/reviews/{review_id}
//! GET/POST /products/{id}/images            - Image metadata, nested
//! GET/PUT/DELETE /products/{id}/images/{image_id}
//! GET  /collections                         - Collection listing with product counts
//! POST /collections                         - Create collection (staff)
//! GET/PUT/DELETE /collections/{id}          - Detail / replace / delete (staff; protected if non-empty)
//!
//! # Carts (no auth; the cart id is the capability)
//! POST /carts                               - Mint an empty cart
//! GET/DELETE /carts/{id}                    - Cart with items and total price
//! GET/POST /carts/{id}/items                - Lines (add accumulates quantities)
//! PATCH/DELETE /carts/{id}/items/{item_id}  - Set quantity / remove line
//!
//! # Customers
//! GET  /customers                           - Listing (staff)
//! GET/PUT /customers/{id}                   - Detail / replace (staff)
//! GET  /customers/{id}/history              - History stub (staff)
//! GET/PUT /customers/me                     - Own profile (auth)
//!
//! # Orders
//! POST /orders                              - Place an order from a cart (auth)
//! GET  /orders                              - Listing (auth; staff see all, others own)
//! GET  /orders/{id}                         - Detail (ownership-scoped)
//! PATCH /orders/{id}                        - Set payment status (staff)
//! DELETE /orders/{id}                       - Delete (staff; protected while items exist)
//!
//! # Identity
//! POST /auth/users                          - Create a user, returns its api token
//! ```

pub mod carts;
pub mod collections;
pub mod customers;
pub mod images;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use cartwheel_core::policy::Role;

use crate::models::User;
use crate::state::AppState;

/// Policy role of an optionally authenticated caller.
#[must_use]
pub fn role_of(user: Option<&User>) -> Role {
    user.map_or(Role::Anonymous, User::role)
}

/// Create the product routes router, including nested reviews and images.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
        .route(
            "/{id}/reviews",
            get(reviews::index).post(reviews::create),
        )
        .route(
            "/{id}/reviews/{review_id}",
            get(reviews::show)
                .put(reviews::update)
                .delete(reviews::destroy),
        )
        .route("/{id}/images", get(images::index).post(images::create))
        .route(
            "/{id}/images/{image_id}",
            get(images::show).put(images::update).delete(images::destroy),
        )
}

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(collections::index).post(collections::create))
        .route(
            "/{id}",
            get(collections::show)
                .put(collections::update)
                .delete(collections::destroy),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(carts::create))
        .route("/{id}", get(carts::show).delete(carts::destroy))
        .route("/{id}/items", get(carts::items).post(carts::add_item))
        .route(
            "/{id}/items/{item_id}",
            axum::routing::patch(carts::update_item).delete(carts::remove_item),
        )
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::index))
        .route("/me", get(customers::me).put(customers::update_me))
        .route("/{id}", get(customers::show).put(customers::update))
        .route("/{id}/history", get(customers::history))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route(
            "/{id}",
            get(orders::show)
                .patch(orders::update)
                .delete(orders::destroy),
        )
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/collections", collection_routes())
        .nest("/carts", cart_routes())
        .nest("/customers", customer_routes())
        .nest("/orders", order_routes())
        .route("/auth/users", post(users::create))
}
