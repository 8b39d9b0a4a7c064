// Unit tests for RedactedSecret
// Tests that secrets never leak through formatting or serialization

use crate::RedactedSecret;

/// **VALUE**: Verifies that Debug and Display never print the secret.
///
/// **WHY THIS MATTERS**: Credentials are stored inside the session and errors; a single
/// `{:?}` in a log line would otherwise publish a user's token.
///
/// **BUG THIS CATCHES**: Would catch someone swapping the manual Debug impl for a derive.
#[test]
fn given_secret_when_formatted_then_value_is_redacted() {
    // GIVEN: A secret token
    let secret = RedactedSecret::new("super-secret-token");

    // WHEN: Formatting it both ways
    let debug = format!("{secret:?}");
    let display = format!("{secret}");

    // THEN: Neither output contains the value
    assert!(!debug.contains("super-secret-token"));
    assert!(!display.contains("super-secret-token"));
    assert_eq!(secret.expose(), "super-secret-token");
    assert_eq!(secret.len(), 18);
}

/// **VALUE**: Verifies that serializing a secret fails instead of writing the value.
///
/// **BUG THIS CATCHES**: Would catch a `#[derive(Serialize)]` sneaking onto the type.
#[test]
fn given_secret_when_serialized_then_returns_error() {
    let secret = RedactedSecret::from("abc");

    let result = serde_json::to_string(&secret);

    assert!(result.is_err(), "Secrets must refuse serialization");
}
