//! Integration tests for the cart surface.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p cartwheel-api)
//!
//! Run with: cargo test -p cartwheel-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use cartwheel_integration_tests::{
    add_cart_item, base_url, client, create_cart, create_collection, create_product, create_user,
};

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_fresh_cart_is_empty_with_zero_total() {
    let client = client();
    let cart_id = create_cart(&client).await;

    let resp = client
        .get(format!("{}/carts/{cart_id}", base_url()))
        .send()
        .await
        .expect("Failed to get cart");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["total_price"].as_str(), Some("0"));
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_adding_same_product_accumulates_quantity() {
    let client = client();
    let staff = create_user(&client, true).await;
    let collection_id = create_collection(&client, &staff).await;
    let product_id = create_product(&client, &staff, collection_id, "10.00").await;
    let cart_id = create_cart(&client).await;

    let resp = add_cart_item(&client, &cart_id, product_id, 2).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = add_cart_item(&client, &cart_id, product_id, 3).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: Value = resp.json().await.expect("Failed to parse item");
    assert_eq!(item["quantity"].as_i64(), Some(5));

    // Still a single line, with the accumulated total
    let resp = client
        .get(format!("{}/carts/{cart_id}", base_url()))
        .send()
        .await
        .expect("Failed to get cart");
    let body: Value = resp.json().await.expect("Failed to parse cart");
    let items = body["items"].as_array().expect("items missing");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"].as_i64(), Some(5));
    assert_eq!(body["total_price"].as_str(), Some("50.00"));
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_non_positive_quantities_rejected() {
    let client = client();
    let staff = create_user(&client, true).await;
    let collection_id = create_collection(&client, &staff).await;
    let product_id = create_product(&client, &staff, collection_id, "10.00").await;
    let cart_id = create_cart(&client).await;

    let resp = add_cart_item(&client, &cart_id, product_id, 0).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = add_cart_item(&client, &cart_id, product_id, -3).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Update-to-zero is not an implicit delete either
    let resp = add_cart_item(&client, &cart_id, product_id, 2).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: Value = resp.json().await.expect("Failed to parse item");
    let item_id = item["id"].as_i64().expect("item id missing");

    let resp = client
        .patch(format!("{}/carts/{cart_id}/items/{item_id}", base_url()))
        .json(&json!({"quantity": 0}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_unknown_product_rejected_as_validation_error() {
    let client = client();
    let cart_id = create_cart(&client).await;

    let resp = add_cart_item(&client, &cart_id, 999_999_999, 1).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["code"].as_str(), Some("validation_error"));
    assert_eq!(
        body["message"].as_str(),
        Some("No product with the given ID was found.")
    );
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_item_update_and_removal() {
    let client = client();
    let staff = create_user(&client, true).await;
    let collection_id = create_collection(&client, &staff).await;
    let product_id = create_product(&client, &staff, collection_id, "4.00").await;
    let cart_id = create_cart(&client).await;

    let resp = add_cart_item(&client, &cart_id, product_id, 1).await;
    let item: Value = resp.json().await.expect("Failed to parse item");
    let item_id = item["id"].as_i64().expect("item id missing");

    let resp = client
        .patch(format!("{}/carts/{cart_id}/items/{item_id}", base_url()))
        .json(&json!({"quantity": 7}))
        .send()
        .await
        .expect("Failed to update item");
    assert_eq!(resp.status(), StatusCode::OK);
    let item: Value = resp.json().await.expect("Failed to parse item");
    assert_eq!(item["quantity"].as_i64(), Some(7));
    assert_eq!(item["total_price"].as_str(), Some("28.00"));

    let resp = client
        .delete(format!("{}/carts/{cart_id}/items/{item_id}", base_url()))
        .send()
        .await
        .expect("Failed to remove item");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{}/carts/{cart_id}", base_url()))
        .send()
        .await
        .expect("Failed to get cart");
    let body: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_deleted_cart_is_gone() {
    let client = client();
    let cart_id = create_cart(&client).await;

    let resp = client
        .delete(format!("{}/carts/{cart_id}", base_url()))
        .send()
        .await
        .expect("Failed to delete cart");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{}/carts/{cart_id}", base_url()))
        .send()
        .await
        .expect("Failed to get cart");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
