use crate::helpers::{TEST_API_KEY, TEST_TOKEN, TEST_USERNAME, run_blocking, user_json};

use dsm_client::{ClientConfig, DsmClient, DsmError};

use serde_json::json;
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Session construction and credential headers
// ============================================================================

/// **VALUE**: Verifies a token the server rejects fails session construction with its message.
///
/// **WHY THIS MATTERS**: Callers show this message to the user ("bad token", "expired"...).
/// Losing it leaves them guessing why login failed.
///
/// **BUG THIS CATCHES**: Would catch only checking the status code, since the server answers
/// 200 with `success: false`.
#[tokio::test(flavor = "multi_thread")]
async fn given_rejected_token_when_session_created_then_invalid_credentials_with_message() {
    // GIVEN: A server rejecting the token
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/validate/token"))
        .and(body_string(format!("username={TEST_USERNAME}&token={TEST_TOKEN}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "bad token"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let uri = server.uri();

    // WHEN: Creating a token session
    let result = run_blocking(move || {
        DsmClient::with_token(TEST_USERNAME, TEST_TOKEN, &ClientConfig::new(uri)).map(|_| ())
    })
    .await;

    // THEN: InvalidCredentials carrying the server message
    let err = result.unwrap_err();
    assert!(matches!(err, DsmError::InvalidCredentials { .. }));
    assert!(err.to_string().contains("bad token"));
}

#[tokio::test(flavor = "multi_thread")]
async fn given_unauthorized_status_without_body_when_session_created_then_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/validate/token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let uri = server.uri();

    let result = run_blocking(move || {
        DsmClient::with_token(TEST_USERNAME, TEST_TOKEN, &ClientConfig::new(uri)).map(|_| ())
    })
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, DsmError::InvalidCredentials { .. }));
    assert!(err.to_string().contains("401"));
}

/// **VALUE**: Verifies an accepted token session sends `auth_user`/`auth_token` on later calls.
#[tokio::test(flavor = "multi_thread")]
async fn given_accepted_token_when_request_sent_then_carries_token_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/validate/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/"))
        .and(header("auth_user", TEST_USERNAME))
        .and(header("auth_token", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(1, TEST_USERNAME)))
        .expect(1)
        .mount(&server)
        .await;
    let uri = server.uri();

    let user = run_blocking(move || {
        let client = DsmClient::with_token(TEST_USERNAME, TEST_TOKEN, &ClientConfig::new(uri))?;
        client.users().get_user(None)
    })
    .await
    .unwrap();

    assert_eq!(user.username(), TEST_USERNAME);
}

/// **VALUE**: Verifies API-key sessions skip the validation round-trip and send `api_key`.
///
/// **BUG THIS CATCHES**: Would catch validating every credential kind, which fails against
/// servers where `/user/validate/token` only understands tokens.
#[tokio::test(flavor = "multi_thread")]
async fn given_api_key_when_session_created_then_no_validation_call_is_made() {
    let server = MockServer::start().await;
    Mock::given(path("/user/validate/token"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/tags"))
        .and(header("api_key", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"1": "Games"})))
        .expect(1)
        .mount(&server)
        .await;
    let uri = server.uri();

    let tags = run_blocking(move || {
        let client = DsmClient::with_api_key(TEST_API_KEY, &ClientConfig::new(uri))?;
        client.products().get_tags()
    })
    .await
    .unwrap();

    assert_eq!(tags.get(&1).map(String::as_str), Some("Games"));
}

#[tokio::test(flavor = "multi_thread")]
async fn given_invalid_host_when_session_created_then_config_error() {
    let result = run_blocking(|| {
        DsmClient::with_api_key(TEST_API_KEY, &ClientConfig::new("opendsm.tk")).map(|_| ())
    })
    .await;

    assert!(matches!(result, Err(DsmError::Config(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn given_api_key_with_newline_when_session_created_then_invalid_credentials() {
    let result = run_blocking(|| {
        DsmClient::with_api_key("bad\nkey", &ClientConfig::new("http://127.0.0.1:9")).map(|_| ())
    })
    .await;

    assert!(matches!(result, Err(DsmError::InvalidCredentials { .. })));
}

/// **VALUE**: Verifies connection failures surface as `Http` errors, not panics.
#[tokio::test(flavor = "multi_thread")]
async fn given_unreachable_host_when_token_session_created_then_http_error() {
    let result = run_blocking(|| {
        DsmClient::with_token(
            TEST_USERNAME,
            TEST_TOKEN,
            &ClientConfig::new("http://127.0.0.1:65534"),
        )
        .map(|_| ())
    })
    .await;

    assert!(matches!(result, Err(DsmError::Http { .. })));
}
