//! Common test utilities for inventory service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use inventory_service::{create_router, AppState, ServiceConfig};
use inventory_store::RocksStore;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The store behind the server, for lock manipulation.
    pub store: Arc<RocksStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            request_log: false,
            ..ServiceConfig::default()
        };

        let state = AppState::new(store.clone(), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            _temp_dir: temp_dir,
        }
    }

    /// Base path of a fresh inventory.
    pub fn new_inventory() -> String {
        format!(
            "/customer/{}/product/{}",
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4()
        )
    }

    /// PUT an add and return the response body.
    pub async fn add(&self, path: &str, quantity: u64, unit_price: &str) -> Value {
        let response = self
            .server
            .put(path)
            .json(&json!({
                "operation": "add",
                "quantity": quantity,
                "unit_price": unit_price
            }))
            .await;
        response.assert_status_ok();
        response.json()
    }

    /// PUT a remove and return the response body.
    pub async fn remove(&self, path: &str, quantity: u64) -> Value {
        let response = self
            .server
            .put(path)
            .json(&json!({
                "operation": "remove",
                "quantity": quantity
            }))
            .await;
        response.assert_status_ok();
        response.json()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
