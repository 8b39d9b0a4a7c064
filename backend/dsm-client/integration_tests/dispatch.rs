use crate::helpers::with_client;

use dsm_client::DsmRequest;

use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// DsmClient::execute() - wire behaviour of the dispatcher
// ============================================================================

/// **VALUE**: Verifies the dispatcher returns error statuses instead of failing.
///
/// **WHY THIS MATTERS**: Facades read `message` out of 4xx/5xx bodies; a dispatcher that
/// raised on status would make those messages unreachable.
#[tokio::test(flavor = "multi_thread")]
async fn given_server_error_when_executed_then_response_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/products/3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let response = with_client(server.uri(), |client| {
        client.execute(DsmRequest::delete("/products/3"))
    })
    .await
    .unwrap();

    assert_eq!(response.status.0, 500);
    assert_eq!(response.body, "boom");
    assert!(!response.is_success());
}

#[tokio::test(flavor = "multi_thread")]
async fn given_raw_body_when_executed_then_sent_verbatim_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/user/about"))
        .and(header("content-type", "text/plain; charset=utf-8"))
        .and(body_string("new about text"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let response = with_client(server.uri(), |client| {
        client.execute(DsmRequest::patch("/user/about").body("new about text"))
    })
    .await
    .unwrap();

    assert!(response.is_success());
}

#[tokio::test(flavor = "multi_thread")]
async fn given_form_fields_when_executed_then_sent_url_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("username=al+ice&email=a%40example.com"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    with_client(server.uri(), |client| {
        client.execute(
            DsmRequest::post("/user").form([("username", "al ice"), ("email", "a@example.com")]),
        )
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn given_query_pairs_when_executed_then_sent_on_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("query", "bob smith"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    with_client(server.uri(), |client| {
        client.execute(
            DsmRequest::get("/search/users")
                .query("query", "bob smith")
                .query("page", 2),
        )
    })
    .await
    .unwrap();
}
