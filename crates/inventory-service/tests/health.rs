//! Health endpoint integration tests.

mod common;

use common::TestHarness;

#[tokio::test]
async fn ping_returns_pong() {
    let harness = TestHarness::new();

    let response = harness.server.get("/ping").await;

    response.assert_status_ok();
    response.assert_text("pong");
}

#[tokio::test]
async fn health_check_returns_json() {
    let harness = TestHarness::new();

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "Inventory API");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let harness = TestHarness::new();

    let response = harness.server.get("/nowhere").await;

    response.assert_status_not_found();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}
