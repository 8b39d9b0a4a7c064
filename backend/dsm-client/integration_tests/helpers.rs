//! Test helpers for OpenDSM integration tests.
//!
//! The client is blocking while `wiremock` needs a tokio runtime, so every
//! client call (including construction and drop) runs inside
//! `spawn_blocking`.

use dsm_client::{ClientConfig, DsmClient, DsmError};

use serde_json::{Value, json};

/// Test constants for authentication
pub const TEST_API_KEY: &str = "test-api-key-12345";
pub const TEST_USERNAME: &str = "alice";
pub const TEST_TOKEN: &str = "test-token-12345";

/// Test helper: Run blocking client code off the async runtime.
pub async fn run_blocking<T, F>(work: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .expect("Blocking client task panicked")
}

/// Test helper: API-key session against the mock server (no validation round-trip).
pub fn api_key_client(uri: &str) -> DsmClient {
    DsmClient::with_api_key(TEST_API_KEY, &ClientConfig::new(uri))
        .expect("API key session should not contact the server")
}

/// Test helper: Run `work` against a fresh API-key session.
pub async fn with_client<T, F>(uri: String, work: F) -> Result<T, DsmError>
where
    F: FnOnce(&DsmClient) -> Result<T, DsmError> + Send + 'static,
    T: Send + 'static,
{
    run_blocking(move || {
        let client = api_key_client(&uri);
        work(&client)
    })
    .await
}

/// Test helper: A user document in wire format.
pub fn user_json(id: u64, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "about": format!("About {username}"),
        "createdProducts": [id * 10],
        "ownedProducts": [],
        "git": {
            "isDeveloperAccount": false,
            "hasGitReadme": false,
            "useReadme": false
        }
    })
}

/// Test helper: A product document in wire format.
pub fn product_json(id: u64) -> Value {
    json!({
        "id": id,
        "name": format!("Product {id}"),
        "about": "About",
        "short_summary": "Summary",
        "keywords": ["tool"],
        "tags": [1]
    })
}
