use crate::helpers::{user_json, with_client};

use dsm_client::{DsmError, ImageSource};

use std::io::Cursor;

use serde_json::json;
use wiremock::matchers::{body_string, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ----------------------------------------------------------------------------
// get_user()
// ----------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn given_existing_user_when_get_user_then_decodes_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(7, "alice")))
        .mount(&server)
        .await;

    let user = with_client(server.uri(), |client| client.users().get_user(Some(7)))
        .await
        .unwrap();

    assert_eq!(user.id(), 7);
    assert_eq!(user.username(), "alice");
    assert_eq!(user.created_product_ids(), &[70]);
}

/// **VALUE**: Verifies a "No user found" answer maps to `UnresolvedQueryResult`.
///
/// **WHY THIS MATTERS**: Callers treat a missing user differently from a broken server; both
/// arrive as 404/500 statuses, only the message tells them apart.
#[tokio::test(flavor = "multi_thread")]
async fn given_missing_user_when_get_user_then_unresolved_query_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/99"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "No user found with id 99"})),
        )
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| client.users().get_user(Some(99))).await;

    let err = result.unwrap_err();
    assert!(matches!(err, DsmError::UnresolvedQueryResult { .. }));
    assert_eq!(err.server_message(), Some("No user found with id 99"));
}

#[tokio::test(flavor = "multi_thread")]
async fn given_server_failure_when_get_user_then_transport_error_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/5"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "database offline"})),
        )
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| client.users().get_user(Some(5))).await;

    let err = result.unwrap_err();
    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.server_message(), Some("database offline"));
}

#[tokio::test(flavor = "multi_thread")]
async fn given_user_without_git_block_when_get_user_then_malformed_response() {
    let server = MockServer::start().await;
    let mut body = user_json(3, "carol");
    body.as_object_mut().unwrap().remove("git");
    Mock::given(method("GET"))
        .and(path("/user/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| client.users().get_user(Some(3))).await;

    assert!(matches!(result, Err(DsmError::MalformedResponse { .. })));
}

// ----------------------------------------------------------------------------
// search() / get_user_by_username()
// ----------------------------------------------------------------------------

/// **VALUE**: Verifies every search hit is decoded from its own array element.
///
/// **BUG THIS CATCHES**: Would catch filling every result from the first element.
#[tokio::test(flavor = "multi_thread")]
async fn given_search_results_when_search_then_each_user_is_distinct() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("query", "a"))
        .and(query_param("page", "1"))
        .and(query_param("count", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            user_json(1, "alice"),
            user_json(2, "alan"),
            user_json(3, "ada"),
        ])))
        .mount(&server)
        .await;

    let users = with_client(server.uri(), |client| client.users().search("a", 1, 3))
        .await
        .unwrap();

    let names: Vec<&str> = users.iter().map(|user| user.username()).collect();
    assert_eq!(names, vec!["alice", "alan", "ada"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn given_failed_search_when_search_then_unresolved_without_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "bad query"})))
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| client.users().search_default("")).await;

    let err = result.unwrap_err();
    assert!(matches!(err, DsmError::UnresolvedQueryResult { message: None, .. }));
}

/// **VALUE**: Verifies the username lookup only returns an exact match.
///
/// **WHY THIS MATTERS**: Search is fuzzy; "alice" also matches "alice2". Returning the first
/// hit blindly would hand callers the wrong account.
#[tokio::test(flavor = "multi_thread")]
async fn given_fuzzy_hits_when_get_user_by_username_then_returns_exact_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .and(query_param("query", "alice"))
        .and(query_param("page", "0"))
        .and(query_param("count", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            user_json(1, "alice2"),
            user_json(2, "alice"),
        ])))
        .mount(&server)
        .await;

    let user = with_client(server.uri(), |client| {
        client.users().get_user_by_username("alice")
    })
    .await
    .unwrap();

    assert_eq!(user.map(|user| user.id()), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn given_no_exact_hit_when_get_user_by_username_then_returns_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([user_json(1, "Alice")])))
        .mount(&server)
        .await;

    let user = with_client(server.uri(), |client| {
        client.users().get_user_by_username("alice")
    })
    .await
    .unwrap();

    assert!(user.is_none());
}

// ----------------------------------------------------------------------------
// create_user()
// ----------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn given_accepted_registration_when_create_user_then_decodes_nested_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user"))
        .and(body_string("username=dave&email=dave%40example.com&password=pw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "user": user_json(11, "dave"),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = with_client(server.uri(), |client| {
        client.users().create_user("dave", "dave@example.com", "pw")
    })
    .await
    .unwrap();

    assert_eq!(user.id(), 11);
}

#[tokio::test(flavor = "multi_thread")]
async fn given_rejected_registration_when_create_user_then_transport_error_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "username taken"})),
        )
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| {
        client.users().create_user("dave", "dave@example.com", "pw")
    })
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, DsmError::Transport { .. }));
    assert_eq!(err.status_code(), Some(409));
    assert_eq!(err.server_message(), Some("username taken"));
}

/// **VALUE**: Verifies a non-JSON answer is reported as a content-type problem.
///
/// **BUG THIS CATCHES**: Would catch trying to decode an HTML proxy error page as a user.
#[tokio::test(flavor = "multi_thread")]
async fn given_html_response_when_create_user_then_transport_error_names_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| {
        client.users().create_user("dave", "dave@example.com", "pw")
    })
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, DsmError::Transport { .. }));
    assert!(err.server_message().unwrap_or_default().contains("text/html"));
}

// ----------------------------------------------------------------------------
// validate_credentials()
// ----------------------------------------------------------------------------

/// **VALUE**: Verifies a wrong password is a normal return value, not an error.
///
/// **WHY THIS MATTERS**: Login forms call this on every attempt; an error path would force
/// callers to pattern-match errors for ordinary user typos.
#[tokio::test(flavor = "multi_thread")]
async fn given_wrong_password_when_validate_credentials_then_returns_unsuccessful_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/validate"))
        .and(body_string("username=bob&password=wrongpass"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Username or password is incorrect",
        })))
        .mount(&server)
        .await;

    let validation = with_client(server.uri(), |client| {
        client.users().validate_credentials("bob", "wrongpass")
    })
    .await
    .unwrap();

    assert!(!validation.success);
    assert!(validation.user.is_none());
    assert_eq!(validation.message, "Username or password is incorrect");
}

#[tokio::test(flavor = "multi_thread")]
async fn given_correct_password_when_validate_credentials_then_returns_user() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/validate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "ok",
            "user": user_json(4, "bob"),
        })))
        .mount(&server)
        .await;

    let validation = with_client(server.uri(), |client| {
        client.users().validate_credentials("bob", "secret")
    })
    .await
    .unwrap();

    assert!(validation.success);
    assert_eq!(validation.user.map(|user| user.id()), Some(4));
    assert_eq!(validation.message, "ok");
}

#[tokio::test(flavor = "multi_thread")]
async fn given_gateway_error_page_when_validate_credentials_then_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/validate"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| {
        client.users().validate_credentials("bob", "secret")
    })
    .await;

    assert_eq!(result.unwrap_err().status_code(), Some(502));
}

// ----------------------------------------------------------------------------
// get_repositories()
// ----------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn given_repositories_when_listed_then_keyed_by_id_last_write_wins() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/git/repositories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "engine"},
            {"id": 2, "name": "website"},
            {"id": 1, "name": "engine-renamed"},
        ])))
        .mount(&server)
        .await;

    let repositories = with_client(server.uri(), |client| client.users().get_repositories())
        .await
        .unwrap();

    assert_eq!(repositories.len(), 2);
    assert_eq!(repositories[&1], "engine-renamed");
    assert_eq!(repositories[&2], "website");
}

#[tokio::test(flavor = "multi_thread")]
async fn given_refused_listing_when_get_repositories_then_unresolved_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/git/repositories"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "not a developer"})),
        )
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| client.users().get_repositories()).await;

    let err = result.unwrap_err();
    assert!(matches!(err, DsmError::UnresolvedQueryResult { .. }));
    assert_eq!(err.server_message(), Some("not a developer"));
}

#[tokio::test(flavor = "multi_thread")]
async fn given_missing_content_type_when_get_repositories_then_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/git/repositories"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| client.users().get_repositories()).await;

    let err = result.unwrap_err();
    assert!(matches!(err, DsmError::Transport { .. }));
    assert!(err.server_message().unwrap_or_default().contains("no content type"));
}

// ----------------------------------------------------------------------------
// activate_developer_account() / update_user_setting()
// ----------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn given_git_account_when_activated_then_returns_status_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/git/activate"))
        .and(body_string("git_username=alice-gh&git_token=ghp_x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let activated = with_client(server.uri(), |client| {
        client.users().activate_developer_account("alice-gh", "ghp_x")
    })
    .await
    .unwrap();

    assert!(activated);
}

#[tokio::test(flavor = "multi_thread")]
async fn given_refused_activation_when_activated_then_returns_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/git/activate"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "bad token"})))
        .mount(&server)
        .await;

    let activated = with_client(server.uri(), |client| {
        client.users().activate_developer_account("alice-gh", "nope")
    })
    .await
    .unwrap();

    assert!(!activated);
}

#[tokio::test(flavor = "multi_thread")]
async fn given_setting_when_updated_then_value_is_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/user/about"))
        .and(body_string("I make games"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let updated = with_client(server.uri(), |client| {
        client.users().update_user_setting("about", "I make games")
    })
    .await
    .unwrap();

    assert!(updated);
}

/// **VALUE**: Verifies a setting name with reserved URL characters addresses that setting.
///
/// **BUG THIS CATCHES**: Would catch `bio#x` being cut at the `#` and silently patching
/// `/user/bio` instead.
#[tokio::test(flavor = "multi_thread")]
async fn given_reserved_character_in_setting_name_when_updated_then_name_is_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/user/bio%23x"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/user/bio"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let updated = with_client(server.uri(), |client| {
        client.users().update_user_setting("bio#x", "v")
    })
    .await
    .unwrap();

    assert!(updated);
}

#[tokio::test(flavor = "multi_thread")]
async fn given_refused_setting_when_updated_then_unresolved_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/user/email"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "email already in use"})),
        )
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| {
        client.users().update_user_setting("email", "taken@example.com")
    })
    .await;

    let err = result.unwrap_err();
    assert!(matches!(err, DsmError::UnresolvedQueryResult { .. }));
    assert_eq!(err.server_message(), Some("email already in use"));
}

// ----------------------------------------------------------------------------
// upload_image*()
// ----------------------------------------------------------------------------

/// **VALUE**: Verifies all three image sources send the same base64 body.
///
/// **BUG THIS CATCHES**: Would catch double-encoding a pre-encoded payload, or sending raw
/// bytes from the reader entry point.
#[tokio::test(flavor = "multi_thread")]
async fn given_each_image_source_when_uploaded_then_body_is_same_base64() {
    // GIVEN: "PNG" encodes to "UE5H"
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/user/profile"))
        .and(body_string("UE5H"))
        .respond_with(ResponseTemplate::new(200))
        .expect(4)
        .mount(&server)
        .await;
    let dir = tempfile::TempDir::new().unwrap();
    let image_path = dir.path().join("avatar.png");
    std::fs::write(&image_path, b"PNG").unwrap();

    // WHEN: Uploading from a file, a reader, a base64 string and raw bytes
    let results = with_client(server.uri(), move |client| {
        let users = client.users();
        Ok(vec![
            users.upload_image_file("profile", &image_path)?,
            users.upload_image_reader("profile", Cursor::new(b"PNG".to_vec()))?,
            users.upload_image_base64("profile", "UE5H")?,
            users.upload_image("profile", ImageSource::Bytes(b"PNG".to_vec()))?,
        ])
    })
    .await
    .unwrap();

    // THEN: Every upload succeeded with the identical payload
    assert_eq!(results, vec![true, true, true, true]);
}

#[tokio::test(flavor = "multi_thread")]
async fn given_missing_file_when_uploaded_then_io_error_and_no_request() {
    let server = MockServer::start().await;
    Mock::given(path("/images/user/banner"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| {
        client
            .users()
            .upload_image_file("banner", "/definitely/not/here.png")
    })
    .await;

    assert!(matches!(result, Err(DsmError::Io { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn given_refused_upload_when_uploaded_then_returns_false() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images/user/banner"))
        .respond_with(
            ResponseTemplate::new(413).set_body_json(json!({"message": "image too large"})),
        )
        .mount(&server)
        .await;

    let uploaded = with_client(server.uri(), |client| {
        client.users().upload_image_base64("banner", "QUJD")
    })
    .await
    .unwrap();

    assert!(!uploaded);
}
