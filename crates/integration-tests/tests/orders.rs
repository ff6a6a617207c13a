//! Integration tests for order placement and the order ledger.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p cartwheel-api)
//!
//! Run with: cargo test -p cartwheel-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use cartwheel_integration_tests::{
    TestUser, add_cart_item, base_url, client, create_cart, create_collection, create_product,
    create_user,
};

async fn place_order(
    client: &reqwest::Client,
    user: &TestUser,
    cart_id: &str,
) -> reqwest::Response {
    client
        .post(format!("{}/orders", base_url()))
        .bearer_auth(&user.api_token)
        .json(&json!({"cart_id": cart_id}))
        .send()
        .await
        .expect("Failed to place order")
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_order_placement_requires_auth() {
    let client = client();
    let cart_id = create_cart(&client).await;

    let resp = client
        .post(format!("{}/orders", base_url()))
        .json(&json!({"cart_id": cart_id}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_order_snapshots_prices_and_consumes_cart() {
    let client = client();
    let staff = create_user(&client, true).await;
    let shopper = create_user(&client, false).await;
    let collection_id = create_collection(&client, &staff).await;
    let product_id = create_product(&client, &staff, collection_id, "10.00").await;

    let cart_id = create_cart(&client).await;
    let resp = add_cart_item(&client, &cart_id, product_id, 3).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = place_order(&client, &shopper, &cart_id).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.expect("Failed to parse order");
    let order_id = order["id"].as_i64().expect("order id missing");
    assert_eq!(order["payment_status"].as_str(), Some("pending"));

    let items = order["items"].as_array().expect("items missing");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"].as_i64(), Some(3));
    assert_eq!(items[0]["unit_price"].as_str(), Some("10.00"));

    // The cart is consumed by placement
    let resp = client
        .get(format!("{}/carts/{cart_id}", base_url()))
        .send()
        .await
        .expect("Failed to get cart");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // A later catalog price change never alters the ledger
    let resp = client
        .put(format!("{}/products/{product_id}", base_url()))
        .bearer_auth(&staff.api_token)
        .json(&json!({
            "title": "Repriced",
            "slug": format!("repriced-{product_id}"),
            "unit_price": "99.00",
            "inventory": 100,
            "collection_id": collection_id,
        }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/orders/{order_id}", base_url()))
        .bearer_auth(&shopper.api_token)
        .send()
        .await
        .expect("Failed to get order");
    assert_eq!(resp.status(), StatusCode::OK);
    let order: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(
        order["items"][0]["unit_price"].as_str(),
        Some("10.00"),
        "snapshot must not follow catalog price changes"
    );
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_empty_cart_cannot_be_ordered() {
    let client = client();
    let shopper = create_user(&client, false).await;
    let cart_id = create_cart(&client).await;

    let resp = place_order(&client, &shopper, &cart_id).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["code"].as_str(), Some("validation_error"));
    assert_eq!(body["message"].as_str(), Some("The cart is empty."));

    // The failed placement leaves the cart untouched
    let resp = client
        .get(format!("{}/carts/{cart_id}", base_url()))
        .send()
        .await
        .expect("Failed to get cart");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_ordered_product_delete_protected() {
    let client = client();
    let staff = create_user(&client, true).await;
    let shopper = create_user(&client, false).await;
    let collection_id = create_collection(&client, &staff).await;
    let product_id = create_product(&client, &staff, collection_id, "5.00").await;

    let cart_id = create_cart(&client).await;
    add_cart_item(&client, &cart_id, product_id, 1).await;
    let resp = place_order(&client, &shopper, &cart_id).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .delete(format!("{}/products/{product_id}", base_url()))
        .bearer_auth(&staff.api_token)
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(
        body["message"].as_str(),
        Some("Product cannot be deleted because it is associated with an order item.")
    );
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_concurrent_placement_has_one_winner() {
    let client = client();
    let staff = create_user(&client, true).await;
    let shopper = create_user(&client, false).await;
    let collection_id = create_collection(&client, &staff).await;
    let product_id = create_product(&client, &staff, collection_id, "5.00").await;

    let cart_id = create_cart(&client).await;
    add_cart_item(&client, &cart_id, product_id, 1).await;

    let (first, second) = tokio::join!(
        place_order(&client, &shopper, &cart_id),
        place_order(&client, &shopper, &cart_id),
    );

    let statuses = [first.status(), second.status()];
    let created = statuses
        .iter()
        .filter(|s| **s == StatusCode::CREATED)
        .count();
    let not_found = statuses
        .iter()
        .filter(|s| **s == StatusCode::NOT_FOUND)
        .count();

    assert_eq!(created, 1, "exactly one placement must win: {statuses:?}");
    assert_eq!(not_found, 1, "the loser must see the cart as gone");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_order_listing_is_ownership_scoped() {
    let client = client();
    let staff = create_user(&client, true).await;
    let shopper = create_user(&client, false).await;
    let bystander = create_user(&client, false).await;
    let collection_id = create_collection(&client, &staff).await;
    let product_id = create_product(&client, &staff, collection_id, "5.00").await;

    let cart_id = create_cart(&client).await;
    add_cart_item(&client, &cart_id, product_id, 1).await;
    let resp = place_order(&client, &shopper, &cart_id).await;
    let order: Value = resp.json().await.expect("Failed to parse order");
    let order_id = order["id"].as_i64().expect("order id missing");

    // The owner sees the order
    let resp = client
        .get(format!("{}/orders/{order_id}", base_url()))
        .bearer_auth(&shopper.api_token)
        .send()
        .await
        .expect("Failed to get order");
    assert_eq!(resp.status(), StatusCode::OK);

    // Another shopper cannot tell it exists
    let resp = client
        .get(format!("{}/orders/{order_id}", base_url()))
        .bearer_auth(&bystander.api_token)
        .send()
        .await
        .expect("Failed to get order");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Staff see everything
    let resp = client
        .get(format!("{}/orders/{order_id}", base_url()))
        .bearer_auth(&staff.api_token)
        .send()
        .await
        .expect("Failed to get order");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/orders", base_url()))
        .bearer_auth(&bystander.api_token)
        .send()
        .await
        .expect("Failed to list orders");
    let body: Value = resp.json().await.expect("Failed to parse listing");
    assert_eq!(body["count"].as_i64(), Some(0));
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_payment_status_update_is_staff_only() {
    let client = client();
    let staff = create_user(&client, true).await;
    let shopper = create_user(&client, false).await;
    let collection_id = create_collection(&client, &staff).await;
    let product_id = create_product(&client, &staff, collection_id, "5.00").await;

    let cart_id = create_cart(&client).await;
    add_cart_item(&client, &cart_id, product_id, 1).await;
    let resp = place_order(&client, &shopper, &cart_id).await;
    let order: Value = resp.json().await.expect("Failed to parse order");
    let order_id = order["id"].as_i64().expect("order id missing");

    let resp = client
        .patch(format!("{}/orders/{order_id}", base_url()))
        .bearer_auth(&shopper.api_token)
        .json(&json!({"payment_status": "complete"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .patch(format!("{}/orders/{order_id}", base_url()))
        .bearer_auth(&staff.api_token)
        .json(&json!({"payment_status": "complete"}))
        .send()
        .await
        .expect("Failed to update order");
    assert_eq!(resp.status(), StatusCode::OK);
    let order: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(order["payment_status"].as_str(), Some("complete"));
}
