use opendsm::commands::{Command, PageArgs, execute};
use opendsm::error::OpendsmError;

use dsm_client::{ClientConfig, DsmClient, DsmError};

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Integration tests for command execution against a mocked OpenDSM server
// ============================================================================

async fn run_command(uri: String, command: Command) -> Result<Value, OpendsmError> {
    tokio::task::spawn_blocking(move || {
        let client = DsmClient::with_api_key("cli-test-key", &ClientConfig::new(uri))?;
        execute(&client, &command)
    })
    .await
    .expect("Blocking command panicked")
}

/// **VALUE**: Verifies the tags command prints ids in ascending order.
///
/// **WHY THIS MATTERS**: Output is meant for scripts and humans; a HashMap order that changes
/// between runs makes diffs useless.
#[tokio::test(flavor = "multi_thread")]
async fn given_tags_when_command_executed_then_output_is_sorted_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/tags"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"9": "Music", "1": "Games"})),
        )
        .mount(&server)
        .await;

    let output = run_command(server.uri(), Command::Tags).await.unwrap();

    assert_eq!(output.to_string(), r#"{"1":"Games","9":"Music"}"#);
}

#[tokio::test(flavor = "multi_thread")]
async fn given_search_users_when_command_executed_then_prints_wire_format_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("query", "ali"))
        .and(query_param("count", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "username": "alice",
            "email": "alice@example.com",
            "about": "",
            "git": {"isDeveloperAccount": true, "hasGitReadme": true, "useReadme": false}
        }])))
        .mount(&server)
        .await;

    let output = run_command(
        server.uri(),
        Command::SearchUsers {
            query: "ali".to_string(),
            page: PageArgs { page: 0, count: 5 },
        },
    )
    .await
    .unwrap();

    assert_eq!(output[0]["username"], "alice");
    assert_eq!(output[0]["git"]["isDeveloperAccount"], true);
    assert_eq!(output[0]["createdProducts"], json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn given_missing_user_when_find_user_executed_then_prints_null() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let output = run_command(
        server.uri(),
        Command::FindUser {
            username: "nobody".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(output, Value::Null);
}

#[tokio::test(flavor = "multi_thread")]
async fn given_missing_product_when_command_executed_then_returns_client_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/5"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "gone"})))
        .mount(&server)
        .await;

    let result = run_command(server.uri(), Command::Product { id: 5 }).await;

    assert!(matches!(
        result,
        Err(OpendsmError::Client(DsmError::UnresolvedQueryResult { .. }))
    ));
}
