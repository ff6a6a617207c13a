//! Integration tests for identity creation and customer profiles.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p cartwheel-api)
//!
//! Run with: cargo test -p cartwheel-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use cartwheel_integration_tests::{base_url, client, create_user};

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_new_user_is_provisioned_a_bronze_profile() {
    let client = client();
    let user = create_user(&client, false).await;

    let resp = client
        .get(format!("{}/customers/me", base_url()))
        .bearer_auth(&user.api_token)
        .send()
        .await
        .expect("Failed to get own profile");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse profile");
    assert_eq!(body["membership"].as_str(), Some("bronze"));
    assert_eq!(body["phone"].as_str(), Some(""));
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_duplicate_email_conflicts() {
    let client = client();
    let user = create_user(&client, false).await;

    let resp = client
        .post(format!("{}/auth/users", base_url()))
        .json(&json!({"email": user.email}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_own_profile_update() {
    let client = client();
    let user = create_user(&client, false).await;

    let resp = client
        .put(format!("{}/customers/me", base_url()))
        .bearer_auth(&user.api_token)
        .json(&json!({
            "phone": "+1-555-0100",
            "birth_date": "1990-04-01",
            "membership": "bronze",
        }))
        .send()
        .await
        .expect("Failed to update profile");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse profile");
    assert_eq!(body["phone"].as_str(), Some("+1-555-0100"));
    assert_eq!(body["birth_date"].as_str(), Some("1990-04-01"));
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_customer_listing_is_staff_only() {
    let client = client();
    let staff = create_user(&client, true).await;
    let shopper = create_user(&client, false).await;

    let resp = client
        .get(format!("{}/customers", base_url()))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client
        .get(format!("{}/customers", base_url()))
        .bearer_auth(&shopper.api_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .get(format!("{}/customers", base_url()))
        .bearer_auth(&staff.api_token)
        .send()
        .await
        .expect("Failed to list customers");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse listing");
    assert!(body["count"].as_i64().is_some());
    assert!(body["results"].is_array());
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_history_stub_is_staff_gated() {
    let client = client();
    let staff = create_user(&client, true).await;
    let shopper = create_user(&client, false).await;

    // Resolve the shopper's own customer id via /customers/me
    let me: Value = client
        .get(format!("{}/customers/me", base_url()))
        .bearer_auth(&shopper.api_token)
        .send()
        .await
        .expect("Failed to get own profile")
        .json()
        .await
        .expect("Failed to parse profile");
    let customer_id = me["id"].as_i64().expect("customer id missing");

    let resp = client
        .get(format!("{}/customers/{customer_id}/history", base_url()))
        .bearer_auth(&shopper.api_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .get(format!("{}/customers/{customer_id}/history", base_url()))
        .bearer_auth(&staff.api_token)
        .send()
        .await
        .expect("Failed to get history");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_invalid_token_rejected() {
    let client = client();

    let resp = client
        .get(format!("{}/customers/me", base_url()))
        .bearer_auth("definitely-not-a-token")
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
