//! Integration tests for SnipVault.
//!
//! These tests drive a running API server over HTTP. They require:
//! - a `PostgreSQL` database with migrations applied (sqlx migrate run)
//! - the API server running (cargo run -p snipvault-api)
//!
//! All tests are `#[ignore]`d by default so `cargo test` stays offline:
//!
//! ```bash
//! cargo test -p snipvault-integration-tests -- --ignored
//! ```
//!
//! The server address defaults to `http://localhost:8000` and can be
//! overridden with `SNIPVAULT_BASE_URL`.

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Client;
use serde_json::{Value, json};

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("SNIPVAULT_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

/// Produce a unique lowercase suffix so test runs never collide on
/// unique columns (username, email, tag name).
#[must_use]
pub fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{prefix}{nanos}")
}

/// Register a fresh account and return `(username, bearer token)`.
///
/// # Panics
///
/// Panics if the server rejects the signup or login, since every test
/// needs a working account before it can assert anything.
pub async fn signup_and_login(client: &Client, prefix: &str) -> (String, String) {
    let base_url = base_url();
    let username = unique(prefix);

    let resp = client
        .post(format!("{base_url}/auth/signup"))
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "integration-pw-1",
        }))
        .send()
        .await
        .expect("Failed to sign up");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({
            "username": username,
            "password": "integration-pw-1",
        }))
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse login response");
    let token = body["access_token"]
        .as_str()
        .expect("Login response missing access_token")
        .to_owned();

    (username, token)
}

/// Create a snippet and return the response body.
///
/// # Panics
///
/// Panics if the server does not answer 201 with a JSON body.
pub async fn create_snippet(client: &Client, token: &str, payload: &Value) -> Value {
    let resp = client
        .post(format!("{}/snippets/", base_url()))
        .bearer_auth(token)
        .json(payload)
        .send()
        .await
        .expect("Failed to create snippet");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    resp.json().await.expect("Failed to parse snippet response")
}
