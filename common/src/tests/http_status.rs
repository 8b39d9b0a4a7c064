// Unit tests for HttpStatusCode categorization

use crate::HttpStatusCode;

/// **VALUE**: Verifies the 2xx range boundaries used to decide success.
///
/// **WHY THIS MATTERS**: Every facade branches on `is_success()`. An off-by-one here
/// would turn a 299 into a failure or a 300 redirect into a decoded body.
#[test]
fn given_status_codes_when_is_success_then_only_2xx_match() {
    assert!(!HttpStatusCode(199).is_success());
    assert!(HttpStatusCode(200).is_success());
    assert!(HttpStatusCode(204).is_success());
    assert!(HttpStatusCode(299).is_success());
    assert!(!HttpStatusCode(300).is_success());
    assert!(!HttpStatusCode(404).is_success());
}

#[test]
fn given_status_codes_when_categorized_then_client_and_server_ranges_are_disjoint() {
    assert!(HttpStatusCode(404).is_client_error());
    assert!(!HttpStatusCode(404).is_server_error());
    assert!(HttpStatusCode(503).is_server_error());
    assert!(!HttpStatusCode(503).is_client_error());
}

#[test]
fn given_status_code_when_displayed_then_prints_number_only() {
    assert_eq!(HttpStatusCode::from(418).to_string(), "418");
}
