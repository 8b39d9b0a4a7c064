// Unit tests for User decoding
// Covers the two defensive id lists and the required git block

use crate::error::DsmError;
use crate::models::User;

use serde_json::{Value, json};

fn full_user() -> Value {
    json!({
        "id": 7,
        "username": "alice",
        "email": "alice@example.com",
        "about": "Builds things",
        "createdProducts": [1, 2, 3],
        "ownedProducts": [4],
        "git": {
            "isDeveloperAccount": true,
            "hasGitReadme": false,
            "useReadme": true
        }
    })
}

#[test]
fn given_complete_user_json_when_decoded_then_all_fields_are_read() {
    let user = User::from_value(full_user()).unwrap();

    assert_eq!(user.id(), 7);
    assert_eq!(user.username(), "alice");
    assert_eq!(user.email(), "alice@example.com");
    assert_eq!(user.about(), "Builds things");
    assert_eq!(user.created_product_ids(), &[1, 2, 3]);
    assert_eq!(user.owned_product_ids(), &[4]);
    assert!(user.is_developer_account());
    assert!(!user.has_git_readme());
    assert!(user.use_git_readme());
}

#[test]
fn given_string_id_when_decoded_then_id_is_parsed() {
    let mut json = full_user();
    json["id"] = json!("7");

    let user = User::from_json(&json.to_string()).unwrap();

    assert_eq!(user.id(), 7);
    assert_eq!(User::from_value(full_user()).unwrap(), user);
}

/// **VALUE**: Verifies missing product id lists decode as empty instead of failing.
///
/// **WHY THIS MATTERS**: Freshly registered accounts come back without these arrays; the
/// whole user must still be usable.
#[test]
fn given_user_without_product_lists_when_decoded_then_lists_are_empty() {
    let mut json = full_user();
    let object = json.as_object_mut().unwrap();
    object.remove("createdProducts");
    object.remove("ownedProducts");

    let user = User::from_value(json).unwrap();

    assert!(user.created_product_ids().is_empty());
    assert!(user.owned_product_ids().is_empty());
}

/// **VALUE**: Verifies unusable product lists (null, wrong type, wrong element type) degrade to empty.
///
/// **BUG THIS CATCHES**: Would catch a plain `#[serde(default)]`, which only covers absence.
#[test]
fn given_user_with_unusable_product_lists_when_decoded_then_lists_are_empty() {
    for bad in [json!(null), json!("1,2"), json!({"0": 1}), json!(["a", "b"])] {
        let mut json = full_user();
        json["createdProducts"] = bad.clone();
        json["ownedProducts"] = bad;

        let user = User::from_value(json).unwrap();

        assert!(user.created_product_ids().is_empty());
        assert!(user.owned_product_ids().is_empty());
    }
}

/// **VALUE**: Verifies a missing `git` block fails the decode.
///
/// **WHY THIS MATTERS**: Defaulting the developer flags to false would silently demote
/// developer accounts in every client that reads them.
#[test]
fn given_user_without_git_block_when_decoded_then_fails() {
    let mut json = full_user();
    json.as_object_mut().unwrap().remove("git");

    let result = User::from_value(json);

    assert!(matches!(result, Err(DsmError::MalformedResponse { .. })));
}

#[test]
fn given_user_without_email_when_decoded_then_fails() {
    let mut json = full_user();
    json.as_object_mut().unwrap().remove("email");

    assert!(User::from_value(json).is_err());
}

#[test]
fn given_raw_json_string_when_decoded_then_matches_parsed_value() {
    let raw = full_user().to_string();

    let from_str = User::from_json(&raw).unwrap();
    let from_value = User::from_value(full_user()).unwrap();

    assert_eq!(from_str, from_value);
}

/// **VALUE**: Verifies a decoded user re-encodes to the wire shape and decodes to an equal value.
///
/// **BUG THIS CATCHES**: Would catch the serializer emitting flat snake_case fields that the
/// decoder cannot read back (for example a lost `git` block).
#[test]
fn given_decoded_user_when_reencoded_then_decodes_to_equal_value() {
    let user = User::from_value(full_user()).unwrap();

    let encoded = serde_json::to_value(&user).unwrap();
    let decoded = User::from_value(encoded.clone()).unwrap();

    assert_eq!(decoded, user);
    assert_eq!(encoded["git"]["useReadme"], true);
    assert_eq!(encoded["createdProducts"], json!([1, 2, 3]));
}
