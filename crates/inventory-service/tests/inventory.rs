//! Inventory endpoint integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::{json, Value};

use inventory_core::{Decimal, InventoryKey};
use inventory_store::Store;

fn dec(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal serialized as string")
        .parse()
        .expect("valid decimal")
}

fn path_for(key: &InventoryKey) -> String {
    format!("/customer/{}/product/{}", key.customer_id, key.product_id)
}

// ============================================================================
// Mutations
// ============================================================================

#[tokio::test]
async fn add_returns_summary() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();

    let body = harness.add(&path, 100, "10").await;

    assert_eq!(body["available_quantity"], 100);
    assert_eq!(dec(&body["available_value"]), Decimal::from(1000));
    assert_eq!(body["sold_quantity"], 0);
    assert_eq!(body["total_quantity"], 100);
    assert_eq!(body["available"].as_array().unwrap().len(), 1);
    assert_eq!(body["available"][0]["quantity"], 100);
    assert_eq!(dec(&body["available"][0]["unit_price"]), Decimal::from(10));
    assert!(body["as_of"].is_string());
}

#[tokio::test]
async fn summary_carries_key_and_date() {
    let harness = TestHarness::new();
    let key = InventoryKey::generate();
    let path = path_for(&key);

    let before = chrono::Utc::now() - chrono::Duration::seconds(1);
    let added = harness.add(&path, 4, "2").await;
    let summary: Value = harness.server.get(&format!("{path}/summary")).await.json();

    assert_eq!(summary, added);
    assert_eq!(summary["customer_id"], key.customer_id.to_string());
    assert_eq!(summary["product_id"], key.product_id.to_string());

    let date: chrono::DateTime<chrono::Utc> = summary["date"]
        .as_str()
        .expect("date serialized as string")
        .parse()
        .expect("valid RFC 3339 date");
    assert!(date >= before);
    assert!(date <= chrono::Utc::now());
}

#[tokio::test]
async fn repeated_use_scenario() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();

    harness.add(&path, 100, "10").await;
    harness.remove(&path, 50).await;
    harness.add(&path, 250, "15").await;
    harness.remove(&path, 225).await;
    harness.add(&path, 150, "12.5").await;
    let body = harness.remove(&path, 50).await;

    assert_eq!(body["available_quantity"], 175);
    assert_eq!(dec(&body["available_value"]), Decimal::from(2250));
    assert_eq!(body["sold_quantity"], 325);
    assert_eq!(dec(&body["sold_value"]), Decimal::from(4375));
    assert_eq!(body["total_quantity"], 500);
    assert_eq!(dec(&body["total_value"]), Decimal::from(6625));

    let lots = body["available"].as_array().unwrap();
    assert_eq!(lots.len(), 2);
    assert_eq!(lots[0]["quantity"], 25);
    assert_eq!(dec(&lots[0]["unit_price"]), Decimal::from(15));
    assert_eq!(lots[1]["quantity"], 150);
    assert_eq!(dec(&lots[1]["unit_price"]), Decimal::new(125, 1));
}

#[tokio::test]
async fn numeric_strings_and_rm_alias_are_accepted() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();

    harness
        .server
        .put(&path)
        .json(&json!({"operation": "add", "quantity": "40", "unit_price": 2.5}))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .put(&path)
        .json(&json!({"operation": "rm", "quantity": 15, "info": "order 12"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["available_quantity"], 25);

    let log: Value = harness.server.get(&format!("{path}/log")).await.json();
    assert_eq!(log[0]["operation"], "remove");
    assert_eq!(log[0]["info"], "order 12");
}

#[tokio::test]
async fn over_removal_is_conflict() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();
    harness.add(&path, 10, "1").await;

    let response = harness
        .server
        .put(&path)
        .json(&json!({"operation": "remove", "quantity": 11}))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_available");
    assert_eq!(body["error"]["details"]["available"], 10);
    assert_eq!(body["error"]["details"]["requested"], 11);

    // Nothing changed and the lock is gone
    let summary: Value = harness.server.get(&format!("{path}/summary")).await.json();
    assert_eq!(summary["available_quantity"], 10);
    harness.add(&path, 1, "1").await;
}

#[tokio::test]
async fn remove_from_unknown_inventory_is_conflict() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();

    let response = harness
        .server
        .put(&path)
        .json(&json!({"operation": "remove", "quantity": 1}))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn held_lock_is_reported() {
    let harness = TestHarness::new();
    let key = InventoryKey::generate();
    let path = path_for(&key);
    harness.add(&path, 5, "1").await;
    harness.store.insert_lock_if_absent(&key).unwrap();

    let response = harness
        .server
        .put(&path)
        .json(&json!({"operation": "add", "quantity": 1, "unit_price": 1}))
        .await;

    response.assert_status(StatusCode::LOCKED);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "locked");
    assert_eq!(
        body["error"]["details"]["customer_id"],
        key.customer_id.to_string()
    );

    // Reads do not wait on the lock
    let summary: Value = harness.server.get(&format!("{path}/summary")).await.json();
    assert_eq!(summary["available_quantity"], 5);

    harness.store.delete_lock(&key).unwrap();
    harness.add(&path, 1, "1").await;
}

// ============================================================================
// Validation
// ============================================================================

async fn assert_invalid(harness: &TestHarness, path: &str, body: Value, field: &str) {
    let response = harness.server.put(path).json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "invalid_value");
    assert_eq!(body["error"]["details"]["field"], field);
}

#[tokio::test]
async fn invalid_quantities_are_rejected() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();

    for quantity in [json!("asdas"), json!(-100), json!(0), json!(1.5), json!(null)] {
        assert_invalid(
            &harness,
            &path,
            json!({"operation": "add", "quantity": quantity, "unit_price": 1}),
            "quantity",
        )
        .await;
    }
    assert_invalid(
        &harness,
        &path,
        json!({"operation": "remove", "quantity": "many"}),
        "quantity",
    )
    .await;
}

#[tokio::test]
async fn invalid_prices_are_rejected() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();

    for unit_price in [json!("asdas"), json!(-10)] {
        assert_invalid(
            &harness,
            &path,
            json!({"operation": "add", "quantity": 1, "unit_price": unit_price}),
            "unit_price",
        )
        .await;
    }
    assert_invalid(
        &harness,
        &path,
        json!({"operation": "add", "quantity": 1}),
        "unit_price",
    )
    .await;
}

#[tokio::test]
async fn free_items_are_allowed() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();

    let body = harness.add(&path, 3, "0").await;
    assert_eq!(dec(&body["available_value"]), Decimal::ZERO);
}

#[tokio::test]
async fn unknown_operation_is_rejected() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();

    assert_invalid(
        &harness,
        &path,
        json!({"operation": "steal", "quantity": 1}),
        "operation",
    )
    .await;
}

#[tokio::test]
async fn malformed_ids_are_rejected() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get(&format!("/customer/nope/product/{}/summary", uuid::Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["details"]["field"], "customer_id");

    let response = harness
        .server
        .get(&format!("/customer/{}/product/nope/log", uuid::Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["details"]["field"], "product_id");
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();

    let response = harness.server.put(&path).text("{not json").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["details"]["field"], "body");
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn unknown_inventory_reads_empty() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();

    let summary: Value = harness.server.get(&format!("{path}/summary")).await.json();
    assert_eq!(summary["available_quantity"], 0);
    assert_eq!(summary["total_quantity"], 0);
    assert!(summary["available"].as_array().unwrap().is_empty());
    assert!(summary["as_of"].is_null());
    assert!(summary["date"].is_null());

    let log: Value = harness.server.get(&format!("{path}/log")).await.json();
    assert!(log.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn log_is_newest_first() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();

    harness.add(&path, 100, "10").await;
    harness.add(&path, 250, "15").await;
    harness.remove(&path, 200).await;

    let log: Value = harness.server.get(&format!("{path}/log")).await.json();
    let log = log.as_array().unwrap();

    assert_eq!(log.len(), 3);
    assert_eq!(log[0]["operation"], "remove");
    assert_eq!(log[0]["records"][0]["quantity"], 100);
    assert_eq!(dec(&log[0]["records"][0]["unit_price"]), Decimal::from(10));
    assert_eq!(log[0]["records"][1]["quantity"], 100);
    assert_eq!(dec(&log[0]["records"][1]["unit_price"]), Decimal::from(15));
    assert_eq!(log[1]["operation"], "add");
    assert_eq!(log[2]["operation"], "add");
}

#[tokio::test]
async fn as_of_reads_past_state() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();

    let first = harness.add(&path, 10, "1").await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let cutoff = chrono::Utc::now().to_rfc3339();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    harness.add(&path, 20, "1").await;

    let summary: Value = harness
        .server
        .get(&format!("{path}/summary"))
        .add_query_param("as_of", &cutoff)
        .await
        .json();
    assert_eq!(summary, first);

    // `date` is accepted as well
    let summary: Value = harness
        .server
        .get(&format!("{path}/summary"))
        .add_query_param("date", &cutoff)
        .await
        .json();
    assert_eq!(summary["available_quantity"], 10);

    let log: Value = harness
        .server
        .get(&format!("{path}/log"))
        .add_query_param("as_of", &cutoff)
        .await
        .json();
    assert_eq!(log.as_array().unwrap().len(), 1);

    let log: Value = harness.server.get(&format!("{path}/log")).await.json();
    assert_eq!(log.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn as_of_before_everything_is_empty() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();
    harness.add(&path, 10, "1").await;

    let summary: Value = harness
        .server
        .get(&format!("{path}/summary"))
        .add_query_param("as_of", "2000-01-01")
        .await
        .json();
    assert_eq!(summary["available_quantity"], 0);
}

#[tokio::test]
async fn unparsable_as_of_is_rejected() {
    let harness = TestHarness::new();
    let path = TestHarness::new_inventory();

    let response = harness
        .server
        .get(&format!("{path}/summary"))
        .add_query_param("as_of", "yesterday-ish")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"]["details"]["field"], "as_of");
    assert_eq!(body["error"]["details"]["value"], "yesterday-ish");
}
