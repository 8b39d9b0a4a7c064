// Unit tests for Product decoding
// Products have no defensive defaults: every missing field is an error

use crate::models::{Product, ProductListType};

use serde_json::{Value, json};

fn full_product() -> Value {
    json!({
        "id": 12,
        "name": "Widget",
        "about": "A widget",
        "short_summary": "Widgets things",
        "keywords": ["widget", "tool"],
        "tags": [1, 5]
    })
}

#[test]
fn given_complete_product_json_when_decoded_then_all_fields_are_read() {
    let product = Product::from_value(full_product()).unwrap();

    assert_eq!(product.id(), 12);
    assert_eq!(product.name(), "Widget");
    assert_eq!(product.about(), "A widget");
    assert_eq!(product.short_summary(), "Widgets things");
    assert_eq!(product.keywords(), &["widget".to_string(), "tool".to_string()]);
    assert_eq!(product.tags(), &[1, 5]);
}

/// **VALUE**: Verifies the service's historical `short_summery` spelling is accepted.
#[test]
fn given_legacy_summary_spelling_when_decoded_then_short_summary_is_set() {
    let mut json = full_product();
    let summary = json.as_object_mut().unwrap().remove("short_summary").unwrap();
    json["short_summery"] = summary;

    let product = Product::from_value(json).unwrap();

    assert_eq!(product.short_summary(), "Widgets things");
}

/// **VALUE**: Verifies that every field is required.
///
/// **BUG THIS CATCHES**: Would catch a `#[serde(default)]` added to any Product field.
#[test]
fn given_product_missing_any_field_when_decoded_then_fails() {
    for field in ["id", "name", "about", "short_summary", "keywords", "tags"] {
        let mut json = full_product();
        json.as_object_mut().unwrap().remove(field);

        assert!(
            Product::from_value(json).is_err(),
            "Missing {field} should fail the decode"
        );
    }
}

/// **VALUE**: Verifies ids sent as numeric strings decode like numbers.
///
/// **WHY THIS MATTERS**: Some OpenDSM endpoints quote ids; rejecting them would fail whole
/// listings over a formatting difference.
#[test]
fn given_string_id_when_decoded_then_id_is_parsed() {
    let mut json = full_product();
    json["id"] = json!("12");

    let product = Product::from_value(json).unwrap();

    assert_eq!(product.id(), 12);
}

#[test]
fn given_non_numeric_string_id_when_decoded_then_fails() {
    for id in [json!("twelve"), json!("-3"), json!(-3)] {
        let mut json = full_product();
        json["id"] = id.clone();

        assert!(Product::from_value(json).is_err(), "Id {id} should be rejected");
    }
}

#[test]
fn given_mistyped_tags_when_decoded_then_fails() {
    let mut json = full_product();
    json["tags"] = json!(["one"]);

    assert!(Product::from_json(&json.to_string()).is_err());
}

#[test]
fn given_list_types_when_displayed_then_match_wire_names() {
    assert_eq!(ProductListType::Latest.to_string(), "Latest");
    assert_eq!(ProductListType::Popular.to_string(), "Popular");
    assert_eq!(ProductListType::default(), ProductListType::Latest);
}
