//! Integration tests for Cartwheel.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p cartwheel-cli -- migrate
//!
//! # Start the API
//! cargo run -p cartwheel-api
//!
//! # Run the (ignored) integration tests against it
//! cargo test -p cartwheel-integration-tests -- --ignored
//! ```
//!
//! All tests are `#[ignore]`-gated because they need a running server; the
//! base URL is configurable via `CARTWHEEL_BASE_URL`.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CARTWHEEL_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_owned())
}

/// Plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder().build().expect("Failed to create HTTP client")
}

/// A user created through `POST /auth/users`, with its bearer token.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub email: String,
    pub api_token: String,
}

/// Create a user with a unique email; `staff` grants the staff role.
///
/// # Panics
///
/// Panics if the request fails or the response is not the created user.
pub async fn create_user(client: &Client, staff: bool) -> TestUser {
    let email = format!("test-{}@example.com", Uuid::new_v4());
    let resp = client
        .post(format!("{}/auth/users", base_url()))
        .json(&json!({"email": email, "staff": staff}))
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse user response");
    TestUser {
        email,
        api_token: body["api_token"]
            .as_str()
            .expect("api_token missing")
            .to_owned(),
    }
}

/// Create a collection as staff and return its id.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_collection(client: &Client, staff: &TestUser) -> i64 {
    let resp = client
        .post(format!("{}/collections", base_url()))
        .bearer_auth(&staff.api_token)
        .json(&json!({"title": format!("Collection {}", Uuid::new_v4())}))
        .send()
        .await
        .expect("Failed to create collection");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse collection");
    body["id"].as_i64().expect("collection id missing")
}

/// Create a product as staff and return its id.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_product(
    client: &Client,
    staff: &TestUser,
    collection_id: i64,
    unit_price: &str,
) -> i64 {
    let slug = format!("product-{}", Uuid::new_v4());
    let resp = client
        .post(format!("{}/products", base_url()))
        .bearer_auth(&staff.api_token)
        .json(&json!({
            "title": format!("Product {slug}"),
            "slug": slug,
            "unit_price": unit_price,
            "inventory": 100,
            "collection_id": collection_id,
        }))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse product");
    body["id"].as_i64().expect("product id missing")
}

/// Mint a cart and return its opaque id.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_cart(client: &Client) -> String {
    let resp = client
        .post(format!("{}/carts", base_url()))
        .send()
        .await
        .expect("Failed to create cart");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse cart");
    body["id"].as_str().expect("cart id missing").to_owned()
}

/// Add a product to a cart, returning the full response.
///
/// # Panics
///
/// Panics if the request itself fails (non-2xx statuses are returned to the
/// caller for assertion).
pub async fn add_cart_item(
    client: &Client,
    cart_id: &str,
    product_id: i64,
    quantity: i64,
) -> reqwest::Response {
    client
        .post(format!("{}/carts/{cart_id}/items", base_url()))
        .json(&json!({"product_id": product_id, "quantity": quantity}))
        .send()
        .await
        .expect("Failed to add cart item")
}
