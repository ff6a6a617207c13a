//! Seed the database with demo catalog data.
//!
//! Inserts a small set of collections and products suitable for local
//! development and load testing. Idempotent: collections are keyed by title
//! and products by slug, so re-running never duplicates rows.

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use super::migrate::{MigrationError, database_url};

/// Demo collections.
const COLLECTIONS: &[&str] = &["Beverages", "Produce", "Bakery", "Pantry"];

/// Demo products: (title, slug, collection, unit price, inventory).
const PRODUCTS: &[(&str, &str, &str, &str, i32)] = &[
    ("Cold Brew Coffee", "cold-brew-coffee", "Beverages", "4.50", 120),
    ("Sparkling Water", "sparkling-water", "Beverages", "1.25", 400),
    ("Orange Juice", "orange-juice", "Beverages", "3.75", 80),
    ("Organic Bananas", "organic-bananas", "Produce", "1.99", 250),
    ("Heirloom Tomatoes", "heirloom-tomatoes", "Produce", "5.40", 60),
    ("Sourdough Loaf", "sourdough-loaf", "Bakery", "6.00", 30),
    ("Butter Croissant", "butter-croissant", "Bakery", "3.25", 48),
    ("Olive Oil", "olive-oil", "Pantry", "12.90", 75),
    ("Basmati Rice", "basmati-rice", "Pantry", "8.15", 140),
    ("Dark Chocolate", "dark-chocolate", "Pantry", "4.80", 200),
];

/// Seed demo data.
///
/// # Errors
///
/// Returns an error if the environment is incomplete or a query fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    for title in COLLECTIONS {
        sqlx::query(
            r"
            INSERT INTO collections (title)
            SELECT $1
            WHERE NOT EXISTS (SELECT 1 FROM collections WHERE title = $1)
            ",
        )
        .bind(title)
        .execute(&pool)
        .await?;
    }
    info!(collections = COLLECTIONS.len(), "Collections seeded");

    for (title, slug, collection, price, inventory) in PRODUCTS {
        let unit_price: Decimal = price.parse().unwrap_or(Decimal::ONE);
        sqlx::query(
            r"
            INSERT INTO products (title, slug, unit_price, inventory, collection_id)
            SELECT $1, $2, $3, $4, c.id
            FROM collections c
            WHERE c.title = $5
              AND NOT EXISTS (SELECT 1 FROM products WHERE slug = $2)
            ",
        )
        .bind(title)
        .bind(slug)
        .bind(unit_price)
        .bind(inventory)
        .bind(collection)
        .execute(&pool)
        .await?;
    }
    info!(products = PRODUCTS.len(), "Products seeded");

    Ok(())
}
