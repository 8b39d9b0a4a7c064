// Unit tests for the dispatcher's request description and response helpers
// Network behaviour is covered in integration_tests/dispatch.rs

use crate::dispatch::{DsmRequest, DsmResponse, HttpMethod, RequestContent};

use common::HttpStatusCode;

use log::Level;

fn response(status: u16, content_type: Option<&str>, body: &str) -> DsmResponse {
    DsmResponse {
        status: HttpStatusCode(status),
        content_type: content_type.map(str::to_string),
        body: body.to_string(),
    }
}

/// **VALUE**: Verifies a non-blank raw body takes precedence over form fields.
///
/// **WHY THIS MATTERS**: `update_user_setting` and `upload_image` send raw bodies; if form
/// fields silently won, the server would receive the wrong payload.
#[test]
fn given_body_and_form_when_content_resolved_then_raw_body_wins() {
    let request = DsmRequest::post("/user/about")
        .form([("username", "alice")])
        .body("hello");

    assert_eq!(request.content(), RequestContent::Raw("hello".to_string()));
}

/// **VALUE**: Verifies a whitespace-only body falls through to the form fields.
///
/// **BUG THIS CATCHES**: Would catch a check on `is_empty()` instead of blank-ness.
#[test]
fn given_blank_body_and_form_when_content_resolved_then_form_is_used() {
    let request = DsmRequest::post("/user")
        .body("   ")
        .form([("username", "alice"), ("email", "a@example.com")]);

    assert_eq!(
        request.content(),
        RequestContent::Form(vec![
            ("username".to_string(), "alice".to_string()),
            ("email".to_string(), "a@example.com".to_string()),
        ])
    );
}

#[test]
fn given_no_body_and_no_form_when_content_resolved_then_empty() {
    let request = DsmRequest::get("/products/tags");

    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.content(), RequestContent::Empty);
}

/// **VALUE**: Verifies URLs are `{host}{path}` with encoded query pairs.
///
/// **BUG THIS CATCHES**: Would catch double slashes from a trailing slash on the host, or
/// search queries with spaces/ampersands breaking the query string.
#[test]
fn given_host_with_trailing_slash_when_url_built_then_path_and_query_are_appended() {
    let request = DsmRequest::get("/search/users")
        .query("query", "jane & co")
        .query("page", 0)
        .query("count", 20);

    let url = request.url("http://127.0.0.1:8080/").unwrap();

    assert_eq!(
        url.as_str(),
        "http://127.0.0.1:8080/search/users?query=jane+%26+co&page=0&count=20"
    );
}

#[test]
fn given_no_query_when_url_built_then_no_question_mark() {
    let url = DsmRequest::get("/user/42").url("http://api.opendsm.tk").unwrap();

    assert_eq!(url.as_str(), "http://api.opendsm.tk/user/42");
}

/// **VALUE**: Verifies path segments are percent-encoded instead of spliced into the URL.
///
/// **WHY THIS MATTERS**: Setting names and image kinds come from callers. A `#` would
/// otherwise start a fragment and a `/` would add a path level, so the request would hit a
/// different resource.
///
/// **BUG THIS CATCHES**: Would catch building the path with `format!` before parsing.
#[test]
fn given_reserved_characters_in_segment_when_url_built_then_segment_is_encoded() {
    let request = DsmRequest::patch("/user").segment("bio#x?y/z");

    let url = request.url("http://127.0.0.1:8080").unwrap();

    assert_eq!(url.as_str(), "http://127.0.0.1:8080/user/bio%23x%3Fy%2Fz");
    assert_eq!(url.fragment(), None);
}

#[test]
fn given_numeric_segment_and_query_when_url_built_then_both_are_appended() {
    let url = DsmRequest::get("/products")
        .segment(12)
        .query("page", 0)
        .url("http://api.opendsm.tk/")
        .unwrap();

    assert_eq!(url.as_str(), "http://api.opendsm.tk/products/12?page=0");
}

#[test]
fn given_invalid_host_when_url_built_then_returns_error() {
    let result = DsmRequest::get("/user").url("not a url");

    assert!(result.is_err());
}

/// **VALUE**: Verifies Debug output never includes form values or the raw body.
///
/// **WHY THIS MATTERS**: Requests carry passwords (`create_user`) and git tokens.
#[test]
fn given_request_with_password_when_debug_formatted_then_values_are_hidden() {
    let request = DsmRequest::post("/user/validate")
        .form([("username", "bob"), ("password", "hunter2")]);

    let debug = format!("{request:?}");

    assert!(debug.contains("password"));
    assert!(!debug.contains("hunter2"));
}

#[test]
fn given_json_content_type_with_charset_when_is_json_then_true() {
    assert!(response(200, Some("application/json; charset=utf-8"), "{}").is_json());
    assert!(response(200, Some("Application/JSON"), "{}").is_json());
    assert!(!response(200, Some("text/html"), "{}").is_json());
    assert!(!response(200, None, "{}").is_json());
}

#[test]
fn given_json_error_body_when_message_read_then_returns_message_field() {
    let response = response(404, None, r#"{"message":"No user found with id 7"}"#);

    assert_eq!(response.message().as_deref(), Some("No user found with id 7"));
    assert_eq!(response.success_flag(), None);
}

#[test]
fn given_non_json_body_when_message_read_then_none() {
    let response = response(500, Some("text/plain"), "Internal Server Error");

    assert_eq!(response.message(), None);
    assert!(response.json().is_err());
}

#[test]
fn given_success_field_when_success_flag_read_then_returns_value() {
    let response = response(200, None, r#"{"success":false,"message":"bad token"}"#);

    assert_eq!(response.success_flag(), Some(false));
}

/// **VALUE**: Verifies refusals are logged at a level matching who is at fault.
///
/// **WHY THIS MATTERS**: Listings and uploads swallow failures into empty results; the log
/// line is the only trace, and a 5xx should stand out from a rejected request.
#[test]
fn given_status_class_when_failure_level_read_then_matches_fault() {
    assert_eq!(response(503, None, "").failure_level(), Level::Error);
    assert_eq!(response(404, None, "").failure_level(), Level::Warn);
    assert_eq!(response(200, None, "").failure_level(), Level::Info);
}
