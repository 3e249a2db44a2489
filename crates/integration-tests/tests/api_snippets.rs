//! Integration tests for snippet storage, tagging, and public sharing.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p snipvault-api)
//!
//! Run with: cargo test -p snipvault-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use snipvault_integration_tests::{base_url, create_snippet, signup_and_login, unique};

// ============================================================================
// Tag Normalization Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_tag_case_variants_collapse_to_one_row() {
    let client = Client::new();
    let base_url = base_url();
    let (_, token) = signup_and_login(&client, "tagcase").await;

    let tag = unique("casetag");
    let upper = tag.to_uppercase();

    // Two snippets referencing the same tag in different casings
    let first = create_snippet(
        &client,
        &token,
        &json!({"title": "a", "code": "1", "language": "rust", "tags": [tag]}),
    )
    .await;
    let second = create_snippet(
        &client,
        &token,
        &json!({"title": "b", "code": "2", "language": "rust", "tags": [upper]}),
    )
    .await;

    // Both responses carry the canonical name
    assert_eq!(first["tags"][0]["name"], json!(tag));
    assert_eq!(second["tags"][0]["name"], json!(tag));

    // Exactly one tag row exists for the name
    let resp = client
        .get(format!("{base_url}/tags/"))
        .send()
        .await
        .expect("Failed to list tags");
    assert_eq!(resp.status(), StatusCode::OK);
    let tags: Vec<Value> = resp.json().await.expect("Failed to parse tags");
    let matching = tags.iter().filter(|t| t["name"] == json!(tag)).count();
    assert_eq!(matching, 1, "expected one row for {tag}, found {matching}");
}

// ============================================================================
// Deletion Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_delete_removes_listing_but_keeps_tag_rows() {
    let client = Client::new();
    let base_url = base_url();
    let (_, token) = signup_and_login(&client, "deleter").await;

    let tag = unique("keptag");
    let snippet = create_snippet(
        &client,
        &token,
        &json!({"title": "doomed", "code": "x", "language": "rust", "tags": [tag]}),
    )
    .await;
    let id = snippet["id"].as_i64().expect("snippet id");

    let resp = client
        .delete(format!("{base_url}/snippets/{id}"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to delete snippet");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // Gone from the owner listing
    let resp = client
        .get(format!("{base_url}/snippets/"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list snippets");
    assert_eq!(resp.status(), StatusCode::OK);
    let listed: Vec<Value> = resp.json().await.expect("Failed to parse list");
    assert!(listed.iter().all(|s| s["id"].as_i64() != Some(id)));

    // The tag row survives for reuse
    let resp = client
        .get(format!("{base_url}/tags/"))
        .send()
        .await
        .expect("Failed to list tags");
    let tags: Vec<Value> = resp.json().await.expect("Failed to parse tags");
    assert!(
        tags.iter().any(|t| t["name"] == json!(tag)),
        "tag row should survive snippet deletion"
    );
}

// ============================================================================
// Visibility Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_toggle_public_twice_round_trips() {
    let client = Client::new();
    let base_url = base_url();
    let (_, token) = signup_and_login(&client, "toggler").await;

    let snippet = create_snippet(
        &client,
        &token,
        &json!({"title": "flip", "code": "x", "language": "rust"}),
    )
    .await;
    let id = snippet["id"].as_i64().expect("snippet id");
    assert_eq!(snippet["is_public"], json!(false));

    let resp = client
        .patch(format!("{base_url}/snippets/{id}/toggle-public"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to toggle");
    assert_eq!(resp.status(), StatusCode::OK);
    let toggled: Value = resp.json().await.expect("Failed to parse toggle");
    assert_eq!(toggled["is_public"], json!(true));

    let resp = client
        .patch(format!("{base_url}/snippets/{id}/toggle-public"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to toggle back");
    assert_eq!(resp.status(), StatusCode::OK);
    let toggled: Value = resp.json().await.expect("Failed to parse toggle");
    assert_eq!(toggled["is_public"], json!(false));

    // Back to private: invisible anonymously again
    let resp = client
        .get(format!("{base_url}/public/snippets/{id}"))
        .send()
        .await
        .expect("Failed to fetch public snippet");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Public Sharing Scenario
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_public_sharing_flow() {
    let client = Client::new();
    let base_url = base_url();
    let (_, alice_token) = signup_and_login(&client, "alice").await;

    // Alice creates a private snippet
    let tag = unique("sharetag");
    let snippet = create_snippet(
        &client,
        &alice_token,
        &json!({
            "title": "alice's helper",
            "code": "fn help() {}",
            "language": "rust",
            "tags": [tag],
        }),
    )
    .await;
    let id = snippet["id"].as_i64().expect("snippet id");

    // Anonymous callers can't see it while private
    let resp = client
        .get(format!("{base_url}/public/snippets/{id}"))
        .send()
        .await
        .expect("Failed to fetch public snippet");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // Alice shares it
    let resp = client
        .patch(format!("{base_url}/snippets/{id}/toggle-public"))
        .bearer_auth(&alice_token)
        .send()
        .await
        .expect("Failed to toggle");
    assert_eq!(resp.status(), StatusCode::OK);

    // Now anonymously visible, by ID and through the filtered listing
    let resp = client
        .get(format!("{base_url}/public/snippets/{id}"))
        .send()
        .await
        .expect("Failed to fetch public snippet");
    assert_eq!(resp.status(), StatusCode::OK);
    let shared: Value = resp.json().await.expect("Failed to parse snippet");
    assert_eq!(shared["title"], json!("alice's helper"));

    let resp = client
        .get(format!("{base_url}/public/snippets/?tag={tag}"))
        .send()
        .await
        .expect("Failed to list public snippets");
    assert_eq!(resp.status(), StatusCode::OK);
    let listed: Vec<Value> = resp.json().await.expect("Failed to parse list");
    assert!(listed.iter().any(|s| s["id"].as_i64() == Some(id)));

    // Bob's own listing never shows Alice's snippet
    let (_, bob_token) = signup_and_login(&client, "bob").await;
    let resp = client
        .get(format!("{base_url}/snippets/"))
        .bearer_auth(&bob_token)
        .send()
        .await
        .expect("Failed to list snippets");
    assert_eq!(resp.status(), StatusCode::OK);
    let listed: Vec<Value> = resp.json().await.expect("Failed to parse list");
    assert!(listed.iter().all(|s| s["id"].as_i64() != Some(id)));
}
