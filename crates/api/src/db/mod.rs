//! Database operations for the Cartwheel `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` - Minimal identities (email, staff flag, opaque api token)
//! - `customers` - One profile per user, provisioned automatically
//! - `collections` / `products` / `promotions` / `product_images` / `reviews` - Catalog
//! - `carts` / `cart_items` - Ephemeral carts keyed by opaque UUID
//! - `orders` / `order_items` - The durable order ledger with price snapshots
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p cartwheel-cli -- migrate
//! ```

pub mod carts;
pub mod collections;
pub mod customers;
pub mod images;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::CartRepository;
pub use collections::CollectionRepository;
pub use customers::CustomerRepository;
pub use images::ProductImageRepository;
pub use orders::OrderRepository;
pub use products::{ProductFilter, ProductOrdering, ProductRepository};
pub use reviews::ReviewRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A write referenced an id that does not exist.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// Delete blocked because other rows still reference the entity.
    #[error("protected: {0}")]
    Protected(String),
}

/// Map a unique-constraint violation to `Conflict` with `message`, passing
/// other errors through as `Database`.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(err)
}

/// Map a foreign-key violation on a write to `InvalidReference` with
/// `message`, passing other errors through as `Database`.
pub(crate) fn invalid_ref_on_fk(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::InvalidReference(message.to_owned());
    }
    RepositoryError::Database(err)
}

/// Map a foreign-key violation on a delete to `Protected` with `message`,
/// passing other errors through as `Database`.
pub(crate) fn protected_on_fk(err: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_foreign_key_violation()
    {
        return RepositoryError::Protected(message.to_owned());
    }
    RepositoryError::Database(err)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
