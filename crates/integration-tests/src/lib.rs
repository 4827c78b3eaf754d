//! End-to-end tests for the Heartwood API.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate and seed the database, then start the server
//! cargo run -p heartwood-cli -- migrate
//! cargo run -p heartwood-cli -- seed
//! cargo run -p heartwood-api
//!
//! # Run the end-to-end tests against it
//! cargo test -p heartwood-integration-tests -- --ignored
//! ```
//!
//! Tests talk to a live server (`HEARTWOOD_BASE_URL`, default
//! `http://localhost:5000`) backed by a seeded database. Each test registers
//! its own throwaway user, so runs don't interfere with each other.

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("HEARTWOOD_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_owned())
}

/// Plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A freshly registered test user.
pub struct TestUser {
    pub token: String,
    pub user_id: String,
}

/// Register a throwaway user and return their token and ID.
///
/// # Panics
///
/// Panics if registration fails; the server must be running and migrated.
pub async fn register_user(client: &Client) -> TestUser {
    let email = format!("e2e-{}@example.com", uuid::Uuid::new_v4());
    let resp = client
        .post(format!("{}/api/auth/register", base_url()))
        .json(&json!({
            "name": "E2E Test User",
            "email": email,
            "password": "a perfectly fine password",
        }))
        .send()
        .await
        .expect("Failed to register test user");

    assert_eq!(resp.status(), 201, "registration should succeed");

    let body: Value = resp.json().await.expect("Failed to parse auth response");
    TestUser {
        token: body["token"].as_str().expect("token missing").to_owned(),
        user_id: body["user"]["id"].as_str().expect("user id missing").to_owned(),
    }
}

/// Fetch the seeded catalog and return it as JSON.
///
/// # Panics
///
/// Panics if the catalog is unreachable or empty; run `heartwood-cli seed`
/// first.
pub async fn seeded_products(client: &Client) -> Vec<Value> {
    let resp = client
        .get(format!("{}/api/products", base_url()))
        .send()
        .await
        .expect("Failed to list products");

    assert_eq!(resp.status(), 200);

    let products: Vec<Value> = resp.json().await.expect("Failed to parse products");
    assert!(!products.is_empty(), "catalog is empty; run heartwood-cli seed");
    products
}
