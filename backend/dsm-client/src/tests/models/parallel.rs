// Unit tests for the parallel array decoder

use crate::error::DsmError;
use crate::models::{User, decode_parallel, into_array};

use serde_json::{Value, json};

fn user_json(id: u64) -> Value {
    json!({
        "id": id,
        "username": format!("user{id}"),
        "email": format!("user{id}@example.com"),
        "about": "",
        "git": {"isDeveloperAccount": false, "hasGitReadme": false, "useReadme": false}
    })
}

/// **VALUE**: Verifies each output slot is decoded from the source element at the same index.
///
/// **BUG THIS CATCHES**: Would catch every slot being filled from element 0, which yields a
/// list of identical users.
#[test]
fn given_many_users_when_decoded_in_parallel_then_each_slot_matches_its_source() {
    let items: Vec<Value> = (0..97).map(user_json).collect();

    let users = decode_parallel(items, User::from_value).unwrap();

    assert_eq!(users.len(), 97);
    for (index, user) in users.iter().enumerate() {
        assert_eq!(user.id(), index as u64);
        assert_eq!(user.username(), format!("user{index}"));
    }
}

#[test]
fn given_empty_array_when_decoded_in_parallel_then_returns_empty() {
    let users = decode_parallel(Vec::new(), User::from_value).unwrap();

    assert!(users.is_empty());
}

#[test]
fn given_one_bad_element_when_decoded_in_parallel_then_whole_decode_fails() {
    let mut items: Vec<Value> = (0..10).map(user_json).collect();
    items[6] = json!({"id": 6});

    let result = decode_parallel(items, User::from_value);

    assert!(matches!(result, Err(DsmError::MalformedResponse { .. })));
}

#[test]
fn given_non_array_json_when_into_array_then_fails_with_kind() {
    let result = into_array(json!({"message": "nope"}));

    let Err(DsmError::MalformedResponse { message, .. }) = result else {
        panic!("expected MalformedResponse");
    };
    assert!(message.contains("an object"));
}
