//! Drink CRUD integration tests.
//!
//! Exercises the full HTTP stack over the in-memory repository with valid
//! RSA-signed tokens, verifying the documented body shapes and failure
//! codes.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod support;

use anyhow::Result;
use serde_json::json;
use support::TestServer;

fn latte_body() -> serde_json::Value {
    json!({
        "title": "Latte",
        "recipe": [
            {"name": "espresso", "color": "#6f4e37", "parts": 1},
            {"name": "steamed milk", "color": "#fffaf0", "parts": 3}
        ]
    })
}

async fn create_latte(server: &TestServer) -> Result<serde_json::Value> {
    let client = reqwest::Client::new();
    let token = server.token(&["post:drinks"]);

    let response = client
        .post(format!("{}/drinks", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&latte_body())
        .send()
        .await?;

    assert_eq!(response.status(), 200);
    Ok(response.json().await?)
}

/// Round-trip: create a drink, then the detail listing includes a matching
/// long-form record.
#[tokio::test]
async fn test_create_then_detail_round_trip() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let created = create_latte(&server).await?;
    assert_eq!(created["success"], true);
    assert_eq!(created["drinks"]["title"], "Latte");
    assert_eq!(created["drinks"]["recipe"][0]["name"], "espresso");

    let token = server.token(&["get:drinks-detail"]);
    let response = client
        .get(format!("{}/drinks-detail", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await?;

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], true);
    let drinks = body["drinks"].as_array().unwrap();
    assert_eq!(drinks.len(), 1);
    assert_eq!(drinks[0]["title"], "Latte");
    assert_eq!(drinks[0]["recipe"], latte_body()["recipe"]);

    Ok(())
}

/// The public listing returns the short form: ingredient names stripped.
#[tokio::test]
async fn test_public_listing_is_short_form() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    create_latte(&server).await?;

    let response = client
        .get(format!("{}/drinks", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    let drinks = body["drinks"].as_array().unwrap();
    assert_eq!(drinks.len(), 1);
    assert_eq!(drinks[0]["title"], "Latte");

    let first_ingredient = &drinks[0]["recipe"][0];
    assert_eq!(first_ingredient["color"], "#6f4e37");
    assert_eq!(first_ingredient["parts"], 1);
    assert!(
        first_ingredient.get("name").is_none(),
        "short form must not carry ingredient names"
    );

    Ok(())
}

/// Creating a drink with an empty title or empty recipe is a bad request.
#[tokio::test]
async fn test_create_rejects_empty_fields() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();
    let token = server.token(&["post:drinks"]);

    // Empty title
    let response = client
        .post(format!("{}/drinks", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({"title": "", "recipe": latte_body()["recipe"]}))
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    // Empty recipe
    let response = client
        .post(format!("{}/drinks", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({"title": "Latte", "recipe": []}))
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    assert_eq!(server.repo.count(), 0, "no drink should have been created");

    Ok(())
}

/// Creating a duplicate title always returns 409 and performs no mutation.
#[tokio::test]
async fn test_create_duplicate_title_conflicts() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();
    let token = server.token(&["post:drinks"]);

    create_latte(&server).await?;

    let response = client
        .post(format!("{}/drinks", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&latte_body())
        .send()
        .await?;

    assert_eq!(response.status(), 409);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 409);

    assert_eq!(server.repo.count(), 1, "conflict must not mutate the store");

    Ok(())
}

/// Patching updates the named fields and returns the long form in an array.
#[tokio::test]
async fn test_patch_updates_title() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let created = create_latte(&server).await?;
    let id = created["drinks"]["id"].as_i64().unwrap();

    let token = server.token(&["patch:drinks"]);
    let response = client
        .patch(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({"title": "Flat White"}))
        .send()
        .await?;

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], true);
    let drinks = body["drinks"].as_array().unwrap();
    assert_eq!(drinks.len(), 1);
    assert_eq!(drinks[0]["id"], id);
    assert_eq!(drinks[0]["title"], "Flat White");
    // Recipe untouched
    assert_eq!(drinks[0]["recipe"], latte_body()["recipe"]);

    Ok(())
}

/// Patching with both fields absent is a bad request whether or not the id
/// exists.
#[tokio::test]
async fn test_patch_requires_at_least_one_field() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let created = create_latte(&server).await?;
    let id = created["drinks"]["id"].as_i64().unwrap();

    let token = server.token(&["patch:drinks"]);

    // Existing id
    let response = client
        .patch(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    // Unknown id - still 400, the field check comes first
    let response = client
        .patch(format!("{}/drinks/999", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    // Blank title and empty recipe count as absent
    let response = client
        .patch(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({"title": "  ", "recipe": []}))
        .send()
        .await?;
    assert_eq!(response.status(), 400);

    Ok(())
}

/// Patching an unknown id is 404.
#[tokio::test]
async fn test_patch_unknown_id_is_404() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let token = server.token(&["patch:drinks"]);
    let response = client
        .patch(format!("{}/drinks/999", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&json!({"title": "Ghost"}))
        .send()
        .await?;

    assert_eq!(response.status(), 404);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 404);

    Ok(())
}

/// Deleting returns the deleted id.
#[tokio::test]
async fn test_delete_returns_deleted_id() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let created = create_latte(&server).await?;
    let id = created["drinks"]["id"].as_i64().unwrap();

    let token = server.token(&["delete:drinks"]);
    let response = client
        .delete(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await?;

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["delete"], id);

    assert_eq!(server.repo.count(), 0);

    Ok(())
}

/// Deleting a non-existent id always returns 404 and performs no mutation.
#[tokio::test]
async fn test_delete_unknown_id_is_404() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    create_latte(&server).await?;

    let token = server.token(&["delete:drinks"]);
    let response = client
        .delete(format!("{}/drinks/999", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await?;

    assert_eq!(response.status(), 404);
    assert_eq!(server.repo.count(), 1, "failed delete must not mutate");

    Ok(())
}

/// A token with only `get:drinks-detail` cannot delete; the drink count is
/// unchanged.
#[tokio::test]
async fn test_delete_with_wrong_permission_is_403() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let created = create_latte(&server).await?;
    let id = created["drinks"]["id"].as_i64().unwrap();

    let token = server.token(&["get:drinks-detail"]);
    let response = client
        .delete(format!("{}/drinks/{id}", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .send()
        .await?;

    assert_eq!(response.status(), 403);
    assert_eq!(server.repo.count(), 1, "forbidden delete must not mutate");

    Ok(())
}

/// Storage faults surface as 422 with the canonical error body.
#[tokio::test]
async fn test_storage_fault_is_422() -> Result<()> {
    let server = TestServer::spawn_failing().await?;
    let client = reqwest::Client::new();

    // Public listing
    let response = client
        .get(format!("{}/drinks", server.url()))
        .send()
        .await?;
    assert_eq!(response.status(), 422);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 422);
    assert_eq!(body["message"], "unprocessable");

    // Gated create hits the same storage fault
    let token = server.token(&["post:drinks"]);
    let response = client
        .post(format!("{}/drinks", server.url()))
        .header("Authorization", format!("Bearer {token}"))
        .json(&latte_body())
        .send()
        .await?;
    assert_eq!(response.status(), 422);

    Ok(())
}

/// Unknown routes return the canonical 404 body.
#[tokio::test]
async fn test_unknown_route_has_json_body() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/no-such-route", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 404);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 404);
    assert_eq!(body["message"], "resource not found");

    Ok(())
}

/// A method the path does not support returns the canonical 405 body.
#[tokio::test]
async fn test_method_not_allowed_has_json_body() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .put(format!("{}/drinks", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 405);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], 405);
    assert_eq!(body["message"], "method not allowed");

    Ok(())
}

/// The health endpoint is public and reports store health.
#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let server = TestServer::spawn().await?;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "healthy");

    Ok(())
}
