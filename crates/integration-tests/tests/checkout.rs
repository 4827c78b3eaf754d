//! End-to-end tests for checkout: cart snapshot in, immutable order out,
//! cart cleared.
//!
//! These tests require:
//! - A running API server (cargo run -p heartwood-api)
//! - A migrated, seeded `PostgreSQL` database
//!
//! Run with: cargo test -p heartwood-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use heartwood_integration_tests::{base_url, client, register_user, seeded_products};

#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_place_order_snapshots_cart_and_clears_it() {
    let client = client();
    let user = register_user(&client).await;
    let products = seeded_products(&client).await;
    let product_id = products[0]["id"].as_str().expect("product id");

    // Build up a cart, then check out its contents verbatim.
    let cart = add_item(&client, &user.token, &user.user_id, product_id, 3).await;
    let items = cart["items"].clone();
    let total = line_total(&cart["items"][0]);

    let resp = client
        .post(format!("{}/orders", base_url()))
        .bearer_auth(&user.token)
        .json(&json!({
            "userId": user.user_id,
            "items": items,
            "totalAmount": total,
        }))
        .send()
        .await
        .expect("Failed to place order");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = resp.json().await.expect("Failed to parse order");

    // The order mirrors the submitted snapshot
    assert_eq!(order["userId"], user.user_id);
    assert_eq!(order["totalAmount"], total);
    assert_eq!(order["items"], cart["items"]);
    assert!(order["createdAt"].is_string());

    // The cart is empty immediately after
    let resp = client
        .get(format!("{}/cart/{}", base_url(), user.user_id))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to get cart");
    let cart: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(cart, json!({ "items": [] }));

    // And the order shows up in the history
    let resp = client
        .get(format!("{}/orders/{}", base_url(), user.user_id))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to list orders");
    assert_eq!(resp.status(), StatusCode::OK);
    let history: Value = resp.json().await.expect("Failed to parse orders");
    assert_eq!(history["orders"][0]["id"], order["id"]);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_place_order_rejects_empty_items() {
    let client = client();
    let user = register_user(&client).await;

    let resp = client
        .post(format!("{}/orders", base_url()))
        .bearer_auth(&user.token)
        .json(&json!({
            "userId": user.user_id,
            "items": [],
            "totalAmount": "0",
        }))
        .send()
        .await
        .expect("Failed to send order");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse error");
    assert!(body["message"].is_string());
}

#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_place_order_rejects_mismatched_total() {
    let client = client();
    let user = register_user(&client).await;
    let products = seeded_products(&client).await;
    let product_id = products[0]["id"].as_str().expect("product id");

    let cart = add_item(&client, &user.token, &user.user_id, product_id, 2).await;

    let resp = client
        .post(format!("{}/orders", base_url()))
        .bearer_auth(&user.token)
        .json(&json!({
            "userId": user.user_id,
            "items": cart["items"],
            "totalAmount": "0.01",
        }))
        .send()
        .await
        .expect("Failed to send order");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Rejection must not have touched the cart
    let resp = client
        .get(format!("{}/cart/{}", base_url(), user.user_id))
        .bearer_auth(&user.token)
        .send()
        .await
        .expect("Failed to get cart");
    let after: Value = resp.json().await.expect("Failed to parse cart");
    assert_eq!(after["items"][0]["quantity"], 2);
}

#[tokio::test]
#[ignore = "Requires running API server and seeded PostgreSQL"]
async fn test_cannot_order_for_another_user() {
    let client = client();
    let alice = register_user(&client).await;
    let mallory = register_user(&client).await;
    let products = seeded_products(&client).await;
    let product = &products[0];

    let resp = client
        .post(format!("{}/orders", base_url()))
        .bearer_auth(&mallory.token)
        .json(&json!({
            "userId": alice.user_id,
            "items": [{
                "productId": product["id"],
                "name": product["name"],
                "price": product["price"],
                "quantity": 1,
                "imageUrl": product["imageUrl"],
            }],
            "totalAmount": product["price"],
        }))
        .send()
        .await
        .expect("Failed to send order");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
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

/// quantity × price for a line item, formatted the way the API formats
/// decimals (two fractional digits).
fn line_total(item: &Value) -> String {
    let price: f64 = item["price"]
        .as_str()
        .expect("price is a string")
        .parse()
        .expect("price parses");
    let quantity = item["quantity"].as_i64().expect("quantity");
    #[allow(clippy::cast_precision_loss)]
    let total = price * quantity as f64;
    format!("{total:.2}")
}
