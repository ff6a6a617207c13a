//! Integration tests for the catalog surface (products, collections).
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p cartwheel-api)
//!
//! Run with: cargo test -p cartwheel-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use cartwheel_integration_tests::{
    base_url, client, create_collection, create_product, create_user,
};

// ============================================================================
// Listing, Filtering, Pagination
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_product_list_envelope_and_collection_filter() {
    let client = client();
    let staff = create_user(&client, true).await;
    let collection_id = create_collection(&client, &staff).await;
    create_product(&client, &staff, collection_id, "3.00").await;
    create_product(&client, &staff, collection_id, "7.00").await;

    let resp = client
        .get(format!(
            "{}/products?collection_id={collection_id}",
            base_url()
        ))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse listing");
    assert_eq!(body["count"].as_i64(), Some(2));
    let results = body["results"].as_array().expect("results missing");
    assert_eq!(results.len(), 2);
    for product in results {
        assert_eq!(product["collection_id"].as_i64(), Some(collection_id));
    }
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_product_ordering_descending_price() {
    let client = client();
    let staff = create_user(&client, true).await;
    let collection_id = create_collection(&client, &staff).await;
    create_product(&client, &staff, collection_id, "2.00").await;
    create_product(&client, &staff, collection_id, "9.00").await;
    create_product(&client, &staff, collection_id, "5.00").await;

    let resp = client
        .get(format!(
            "{}/products?collection_id={collection_id}&ordering=-unit_price",
            base_url()
        ))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse listing");
    let prices: Vec<String> = body["results"]
        .as_array()
        .expect("results missing")
        .iter()
        .map(|p| p["unit_price"].as_str().expect("unit_price missing").to_owned())
        .collect();
    assert_eq!(prices, vec!["9.00", "5.00", "2.00"]);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_product_invalid_ordering_rejected() {
    let client = client();

    let resp = client
        .get(format!("{}/products?ordering=inventory", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["code"].as_str(), Some("validation_error"));
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_product_detail_includes_price_with_tax() {
    let client = client();
    let staff = create_user(&client, true).await;
    let collection_id = create_collection(&client, &staff).await;
    let product_id = create_product(&client, &staff, collection_id, "10.99").await;

    let resp = client
        .get(format!("{}/products/{product_id}", base_url()))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse product");
    assert_eq!(body["unit_price"].as_str(), Some("10.99"));
    assert_eq!(body["price_with_tax"].as_str(), Some("12.09"));
}

// ============================================================================
// Authorization
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_product_create_requires_staff() {
    let client = client();
    let staff = create_user(&client, true).await;
    let collection_id = create_collection(&client, &staff).await;
    let payload = json!({
        "title": "Unauthorized Product",
        "slug": "unauthorized-product",
        "unit_price": "3.00",
        "inventory": 1,
        "collection_id": collection_id,
    });

    // Anonymous callers get 401
    let resp = client
        .post(format!("{}/products", base_url()))
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Authenticated non-staff callers get 403
    let shopper = create_user(&client, false).await;
    let resp = client
        .post(format!("{}/products", base_url()))
        .bearer_auth(&shopper.api_token)
        .json(&payload)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_product_price_below_one_rejected() {
    let client = client();
    let staff = create_user(&client, true).await;
    let collection_id = create_collection(&client, &staff).await;

    let resp = client
        .post(format!("{}/products", base_url()))
        .bearer_auth(&staff.api_token)
        .json(&json!({
            "title": "Too Cheap",
            "slug": "too-cheap",
            "unit_price": "0.50",
            "inventory": 1,
            "collection_id": collection_id,
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Referential Protection
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_unordered_product_deletes_cleanly() {
    let client = client();
    let staff = create_user(&client, true).await;
    let collection_id = create_collection(&client, &staff).await;
    let product_id = create_product(&client, &staff, collection_id, "4.00").await;

    let resp = client
        .delete(format!("{}/products/{product_id}", base_url()))
        .bearer_auth(&staff.api_token)
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{}/products/{product_id}", base_url()))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_non_empty_collection_delete_protected() {
    let client = client();
    let staff = create_user(&client, true).await;
    let collection_id = create_collection(&client, &staff).await;
    create_product(&client, &staff, collection_id, "4.00").await;

    let resp = client
        .delete(format!("{}/collections/{collection_id}", base_url()))
        .bearer_auth(&staff.api_token)
        .send()
        .await
        .expect("Failed to delete collection");
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let body: Value = resp.json().await.expect("Failed to parse error");
    assert_eq!(body["code"].as_str(), Some("protected"));
    assert_eq!(
        body["message"].as_str(),
        Some("Collection cannot be deleted because it includes one or more products.")
    );
}

// ============================================================================
// Nested Reviews
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_review_lifecycle_under_product() {
    let client = client();
    let staff = create_user(&client, true).await;
    let collection_id = create_collection(&client, &staff).await;
    let product_id = create_product(&client, &staff, collection_id, "4.00").await;

    let resp = client
        .post(format!("{}/products/{product_id}/reviews", base_url()))
        .json(&json!({"name": "Ada", "description": "Exactly as described."}))
        .send()
        .await
        .expect("Failed to create review");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let review: Value = resp.json().await.expect("Failed to parse review");
    let review_id = review["id"].as_i64().expect("review id missing");

    // The review is not addressable through another product
    let other_product = create_product(&client, &staff, collection_id, "5.00").await;
    let resp = client
        .get(format!(
            "{}/products/{other_product}/reviews/{review_id}",
            base_url()
        ))
        .send()
        .await
        .expect("Failed to get review");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = client
        .get(format!(
            "{}/products/{product_id}/reviews/{review_id}",
            base_url()
        ))
        .send()
        .await
        .expect("Failed to get review");
    assert_eq!(resp.status(), StatusCode::OK);
}
