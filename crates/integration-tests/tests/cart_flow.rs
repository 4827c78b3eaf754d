//! End-to-end tests for the cart merge workflow.
//!
//! These tests require:
//! - A running API server (cargo run -p heartwood-api)
//! - A migrated, seeded `PostgreSQL` database
//!
//! Run with: cargo test -p heartwood-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use heartwood_integration_tests::{base_url, client, register_user, seeded_products};

// ============================================================================
// Read Semantics
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_get_cart_is_empty_value_not_error_for_new_user() {
    let client = client();
    let user = register_user(&client).await;

    let resp = client
        .get(format!("{}/cart/{}", base_url(), user.user_id))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to get cart");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(body, json!({ "items": [] }));
}

#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_get_cart_is_idempotent() {
    let client = client();
    let user = register_user(&client).await;
    let products = seeded_products(&client).await;
    let product_id = products[0]["id"].as_str().expect("product id");

    add_item(&client, &user.token, &user.user_id, product_id, 2).await;

    let first: Value = get_cart(&client, &user.token, &user.user_id).await;
    let second: Value = get_cart(&client, &user.token, &user.user_id).await;
    assert_eq!(first, second);
}

// ============================================================================
// The Merge Workflow
// ============================================================================

/// The end-to-end scenario: add accumulates, update sets, remove deletes.
#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_add_update_remove_scenario() {
    let client = client();
    let user = register_user(&client).await;
    let products = seeded_products(&client).await;
    let product_id = products[0]["id"].as_str().expect("product id");

    // addItem(u, p, 2) on empty cart -> one item, quantity 2
    let cart = add_item(&client, &user.token, &user.user_id, product_id, 2).await;
    assert_eq!(cart["items"].as_array().expect("items").len(), 1);
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(cart["items"][0]["productId"], product_id);

    // addItem(u, p, 3) -> accumulates to 5, not replaced
    let cart = add_item(&client, &user.token, &user.user_id, product_id, 3).await;
    assert_eq!(cart["items"].as_array().expect("items").len(), 1);
    assert_eq!(cart["items"][0]["quantity"], 5);

    // updateQuantity(u, p, 1) -> absolute set to 1
    let resp = client
        .put(format!(
            "{}/cart/{}/{}",
            base_url(),
            user.user_id,
            product_id
        ))
        .bearer_auth(&user.token)
        .json(&json!({ "quantity": 1 }))
        .send()
        .await
        .expect("Failed to update quantity");
    assert_eq!(resp.status(), StatusCode::OK);
    let cart: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(cart["items"][0]["quantity"], 1);

    // removeItem(u, p) -> empty cart
    let resp = client
        .delete(format!(
            "{}/cart/{}/{}",
            base_url(),
            user.user_id,
            product_id
        ))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to remove item");
    assert_eq!(resp.status(), StatusCode::OK);
    let cart: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(cart, json!({ "items": [] }));
}

#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_add_item_snapshots_product_fields() {
    let client = client();
    let user = register_user(&client).await;
    let products = seeded_products(&client).await;
    let product = &products[0];
    let product_id = product["id"].as_str().expect("product id");

    let cart = add_item(&client, &user.token, &user.user_id, product_id, 1).await;

    assert_eq!(cart["items"][0]["name"], product["name"]);
    assert_eq!(cart["items"][0]["price"], product["price"]);
    assert_eq!(cart["items"][0]["imageUrl"], product["imageUrl"]);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_sequential_adds_accumulate() {
    let client = client();
    let user = register_user(&client).await;
    let products = seeded_products(&client).await;
    let product_id = products[0]["id"].as_str().expect("product id");

    let quantities = [1, 4, 2, 3];
    let mut cart = Value::Null;
    for quantity in quantities {
        cart = add_item(&client, &user.token, &user.user_id, product_id, quantity).await;
    }

    let expected: i64 = quantities.iter().sum();
    assert_eq!(cart["items"][0]["quantity"], expected);
}

// ============================================================================
// Validation & Not-Found
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_add_item_rejects_non_positive_quantity() {
    let client = client();
    let user = register_user(&client).await;
    let products = seeded_products(&client).await;
    let product_id = products[0]["id"].as_str().expect("product id");

    for quantity in [0, -1] {
        let resp = client
            .post(format!("{}/cart", base_url()))
            .bearer_auth(&user.token)
            .json(&json!({
                "ownerId": user.user_id,
                "productId": product_id,
                "quantity": quantity,
            }))
            .send()
            .await
            .expect("Failed to send add request");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    // Nothing was persisted by the rejected calls
    let cart = get_cart(&client, &user.token, &user.user_id).await;
    assert_eq!(cart, json!({ "items": [] }));
}

#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_add_unknown_product_is_not_found() {
    let client = client();
    let user = register_user(&client).await;

    let resp = client
        .post(format!("{}/cart", base_url()))
        .bearer_auth(&user.token)
        .json(&json!({
            "ownerId": user.user_id,
            "productId": uuid::Uuid::new_v4().to_string(),
            "quantity": 1,
        }))
        .send()
        .await
        .expect("Failed to send add request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_update_rejects_quantity_below_one() {
    let client = client();
    let user = register_user(&client).await;
    let products = seeded_products(&client).await;
    let product_id = products[0]["id"].as_str().expect("product id");

    add_item(&client, &user.token, &user.user_id, product_id, 2).await;

    // Rejected with 400, not treated as removal
    let resp = client
        .put(format!(
            "{}/cart/{}/{}",
            base_url(),
            user.user_id,
            product_id
        ))
        .bearer_auth(&user.token)
        .json(&json!({ "quantity": 0 }))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let cart = get_cart(&client, &user.token, &user.user_id).await;
    assert_eq!(cart["items"][0]["quantity"], 2);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_remove_missing_item_is_not_found_and_leaves_cart_alone() {
    let client = client();
    let user = register_user(&client).await;
    let products = seeded_products(&client).await;
    let product_id = products[0]["id"].as_str().expect("product id");

    add_item(&client, &user.token, &user.user_id, product_id, 2).await;

    let resp = client
        .delete(format!(
            "{}/cart/{}/{}",
            base_url(),
            user.user_id,
            uuid::Uuid::new_v4()
        ))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to send remove");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let cart = get_cart(&client, &user.token, &user.user_id).await;
    assert_eq!(cart["items"][0]["quantity"], 2);
}

// ============================================================================
// Ownership
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_cannot_touch_another_users_cart() {
    let client = client();
    let alice = register_user(&client).await;
    let mallory = register_user(&client).await;

    let resp = client
        .get(format!("{}/cart/{}", base_url(), alice.user_id))
        .bearer_auth(&mallory.token)
        .send()
        .await
        .expect("Failed to get cart");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_cart_requires_token() {
    let client = client();
    let user = register_user(&client).await;

    let resp = client
        .get(format!("{}/cart/{}", base_url(), user.user_id))
        .send()
        .await
        .expect("Failed to get cart");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Helpers
// ============================================================================

async fn add_item(
    client: &reqwest::Client,
    token: &str,
    owner_id: &str,
    product_id: &str,
    quantity: i64,
) -> Value {
    let resp = client
        .post(format!("{}/cart", base_url()))
        .bearer_auth(token)
        .json(&json!({
            "ownerId": owner_id,
            "productId": product_id,
            "quantity": quantity,
        }))
        .send()
        .await
        .expect("Failed to add item");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse cart")
}

async fn get_cart(client: &reqwest::Client, token: &str, owner_id: &str) -> Value {
    let resp = client
        .get(format!("{}/cart/{owner_id}", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to get cart");

    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.expect("Failed to parse cart")
}
