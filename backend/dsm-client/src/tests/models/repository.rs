// Unit tests for Repository decoding

use crate::models::Repository;

use serde_json::json;

#[test]
fn given_numeric_or_string_id_when_decoded_then_ids_match() {
    let numeric = Repository::from_value(json!({"id": 31, "name": "engine"})).unwrap();
    let quoted = Repository::from_value(json!({"id": "31", "name": "engine"})).unwrap();

    assert_eq!(numeric, quoted);
    assert_eq!(quoted.id, 31);
}

#[test]
fn given_missing_name_when_decoded_then_fails() {
    assert!(Repository::from_value(json!({"id": 31})).is_err());
}
