/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for taskview-adapter tests

use serde_json::{Value, json};
use wiremock::MockServer;

pub const SERVICE_PATH: &str = "/TaskServices/api/services";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Service base URL pointing at the mock server
pub fn service_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), SERVICE_PATH)
}

/// Full request path for an endpoint below the service base
pub fn endpoint(path: &str) -> String {
    format!("{SERVICE_PATH}/{path}")
}

pub fn task_json(id: i64, title: &str, status: &str) -> Value {
    json!({ "id": id, "title": title, "status": status })
}
