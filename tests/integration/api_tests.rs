//! API integration tests
//!
//! These run against a live server with an empty or disposable database.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Unique suffix so repeated runs do not collide on names
fn unique(prefix: &str) -> String {
    format!("{} {}", prefix, uuid::Uuid::new_v4().simple())
}

async fn create_member(client: &Client, last_name: &str) -> Value {
    let response = client
        .post(format!("{}/members", BASE_URL))
        .json(&json!({
            "first_name": "Ivan",
            "last_name": last_name,
            "role": "member"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

async fn procure(client: &Client, name: &str, quantity: i32) -> Value {
    let response = client
        .post(format!("{}/stock-items", BASE_URL))
        .json(&json!({ "name": name, "quantity": quantity }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_member_crud() {
    let client = Client::new();
    let last_name = unique("Horvat");

    let member = create_member(&client, &last_name).await;
    let id = member["id"].as_str().expect("No id in response");
    assert_eq!(member["last_name"], last_name.as_str());

    let response = client
        .put(format!("{}/members/{}", BASE_URL, id))
        .json(&json!({ "phone": "091 123 4567" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["phone"], "091 123 4567");

    let response = client
        .delete(format!("{}/members/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/members/{}", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_create_member_without_name() {
    let client = Client::new();

    let response = client
        .post(format!("{}/members", BASE_URL))
        .json(&json!({ "first_name": "  ", "last_name": "Kovač", "role": "member" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_equipment_returns_existing() {
    let client = Client::new();
    let name = unique("Motorna pila");

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let first: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(first["created"], true);

    // Same name with different case and spacing
    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .json(&json!({ "name": format!("  {}  ", name.to_uppercase()) }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let second: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(second["created"], false);
    assert_eq!(second["id"], first["id"]);
}

#[tokio::test]
#[ignore]
async fn test_checkout_decrements_availability() {
    let client = Client::new();
    let member = create_member(&client, &unique("Babić")).await;
    let item = procure(&client, &unique("Kaciga"), 2).await;
    let item_id = item["id"].as_str().expect("No id in response");

    let response = client
        .post(format!("{}/checkouts", BASE_URL))
        .json(&json!({
            "member_id": member["id"],
            "stock_item_id": item_id,
            "tag": "XL"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/stock-items/{}", BASE_URL, item_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["total"], 2);
    assert_eq!(body["checked_out"], 1);
    assert_eq!(body["available"], 1);

    // Stock cannot be removed while pieces are checked out
    let response = client
        .delete(format!("{}/stock-items/{}", BASE_URL, item_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_bulk_checkout_over_availability() {
    let client = Client::new();
    let member = create_member(&client, &unique("Marić")).await;
    let item = procure(&client, &unique("Čizme"), 1).await;

    let response = client
        .post(format!("{}/checkouts/bulk", BASE_URL))
        .json(&json!({
            "member_id": member["id"],
            "rows": [
                { "stock_item_id": item["id"], "quantity": 3 },
                { "stock_item_id": null, "quantity": 1 }
            ]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.expect("Failed to parse response");
    let rows = body["rows"].as_array().expect("No rows in response");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["row"], 0);
    assert_eq!(rows[0]["message"], "Requested 3, available 1");
    assert_eq!(rows[1]["message"], "Select a stock item");

    // Nothing was written
    let response = client
        .get(format!("{}/checkouts?member_id={}", BASE_URL, member["id"].as_str().unwrap_or_default()))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore]
async fn test_export_checkouts_csv() {
    let client = Client::new();

    let response = client
        .get(format!("{}/checkouts/export", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));

    let body = response.text().await.expect("Failed to read body");
    let header = body.trim_start_matches('\u{feff}').lines().next().unwrap_or_default();
    assert_eq!(header, "Rbr;Clan;Artikl;Oznaka;Datum");
}

#[tokio::test]
#[ignore]
async fn test_unknown_subscription_collection() {
    let client = Client::new();

    let response = client
        .get(format!("{}/subscribe/nonsense", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_member_edit_clears_optional_fields() {
    let client = Client::new();

    // Contact fields are free text
    let response = client
        .post(format!("{}/members", BASE_URL))
        .json(&json!({
            "first_name": "Marko",
            "last_name": unique("Jurić"),
            "role": "member",
            "email": "marko na dvd",
            "personal_id": "1234",
            "birth_date": "1990-05-01"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let member: Value = response.json().await.expect("Failed to parse response");
    let id = member["id"].as_str().expect("No id in response");
    assert_eq!(member["personal_id"], "1234");

    let response = client
        .put(format!("{}/members/{}", BASE_URL, id))
        .json(&json!({ "email": "", "birth_date": null }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["email"].is_null());
    assert!(body["birth_date"].is_null());
    // Absent fields are kept
    assert_eq!(body["personal_id"], "1234");
}

#[tokio::test]
#[ignore]
async fn test_stock_total_cannot_drop_below_checked_out() {
    let client = Client::new();
    let member = create_member(&client, &unique("Novak")).await;
    let name = unique("Jakna");
    let item = procure(&client, &name, 2).await;
    let item_id = item["id"].as_str().expect("No id in response");

    let response = client
        .post(format!("{}/checkouts", BASE_URL))
        .json(&json!({ "member_id": member["id"], "stock_item_id": item_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let response = client
        .put(format!("{}/stock-items/{}", BASE_URL, item_id))
        .json(&json!({ "name": name, "total": 0 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);

    let response = client
        .put(format!("{}/stock-items/{}", BASE_URL, item_id))
        .json(&json!({ "name": name, "total": 1 }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["total"], 1);
}

#[tokio::test]
#[ignore]
async fn test_edit_checkout_of_last_piece() {
    let client = Client::new();
    let member = create_member(&client, &unique("Perić")).await;
    let item = procure(&client, &unique("Rukavice"), 1).await;
    let item_id = item["id"].as_str().expect("No id in response");

    let response = client
        .post(format!("{}/checkouts", BASE_URL))
        .json(&json!({ "member_id": member["id"], "stock_item_id": item_id, "tag": "M" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let checkout: Value = response.json().await.expect("Failed to parse response");
    let checkout_id = checkout["id"].as_str().expect("No id in response");

    // The record's own piece does not count against it
    let response = client
        .put(format!("{}/checkouts/{}", BASE_URL, checkout_id))
        .json(&json!({ "member_id": member["id"], "stock_item_id": item_id, "tag": "L" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["tag"], "L");

    // A second check-out of the same item is refused
    let response = client
        .post(format!("{}/checkouts", BASE_URL))
        .json(&json!({ "member_id": member["id"], "stock_item_id": item_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 422);
}

#[tokio::test]
#[ignore]
async fn test_rename_equipment_collision() {
    let client = Client::new();
    let first_name = unique("Pumpa");

    let mut ids = Vec::new();
    for name in [first_name.clone(), unique("Agregat")] {
        let response = client
            .post(format!("{}/equipment", BASE_URL))
            .json(&json!({ "name": name }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.expect("Failed to parse response");
        ids.push(body["id"].as_str().expect("No id in response").to_string());
    }

    let response = client
        .put(format!("{}/equipment/{}", BASE_URL, ids[1]))
        .json(&json!({ "name": first_name.to_lowercase() }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);
}

#[tokio::test]
#[ignore]
async fn test_delete_category_removes_activities() {
    let client = Client::new();

    let response = client
        .post(format!("{}/activity-categories", BASE_URL))
        .json(&json!({ "name": unique("Vježbe") }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let category: Value = response.json().await.expect("Failed to parse response");
    let category_id = category["id"].as_str().expect("No id in response");

    let response = client
        .post(format!("{}/activities", BASE_URL))
        .json(&json!({ "category_id": category_id, "name": "Noćna vježba" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let activity: Value = response.json().await.expect("Failed to parse response");
    let activity_id = activity["id"].as_str().expect("No id in response");

    let response = client
        .delete(format!("{}/activity-categories/{}", BASE_URL, category_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/activities/{}", BASE_URL, activity_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_control_log_entries() {
    let client = Client::new();

    let response = client
        .post(format!("{}/control-log/equipment", BASE_URL))
        .json(&json!({ "name": unique("Motorna pila"), "category": "Pile" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);
    let equipment: Value = response.json().await.expect("Failed to parse response");
    let equipment_id = equipment["id"].as_str().expect("No id in response");
    let entries_url = format!("{}/control-log/equipment/{}/entries", BASE_URL, equipment_id);

    let mut entry_ids = Vec::new();
    for title in ["Prvo", "Drugo"] {
        let response = client
            .post(&entries_url)
            .json(&json!({
                "title": title,
                "date": "2025-02-01",
                "time_from": "08:00",
                "time_to": "09:30",
                "user": "Ivan"
            }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.expect("Failed to parse response");
        // Newest entry first
        assert_eq!(body["entries"][0]["title"], title);
        entry_ids.push(body["entries"][0]["id"].as_str().expect("No entry id").to_string());
    }

    let response = client
        .put(format!("{}/{}", entries_url, entry_ids[0]))
        .json(&json!({ "title": "Prvo (ispravak)", "date": "2025-02-01", "user": "Ivan" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["entries"][0]["id"], entry_ids[1].as_str());
    assert_eq!(body["entries"][1]["id"], entry_ids[0].as_str());
    assert_eq!(body["entries"][1]["title"], "Prvo (ispravak)");

    let response = client
        .delete(format!("{}/{}", entries_url, entry_ids[1]))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let entries = body["entries"].as_array().expect("No entries in response");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], entry_ids[0].as_str());
}
