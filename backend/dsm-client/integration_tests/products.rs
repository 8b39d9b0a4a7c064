use crate::helpers::{product_json, with_client};

use dsm_client::{DsmError, ProductListType};

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn products(count: u64) -> Value {
    Value::Array((1..=count).map(product_json).collect())
}

// ----------------------------------------------------------------------------
// get_product()
// ----------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn given_existing_product_when_get_product_then_decodes_product() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json(12)))
        .mount(&server)
        .await;

    let product = with_client(server.uri(), |client| client.products().get_product(12))
        .await
        .unwrap();

    assert_eq!(product.id(), 12);
    assert_eq!(product.name(), "Product 12");
}

#[tokio::test(flavor = "multi_thread")]
async fn given_missing_product_when_get_product_then_unresolved_with_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Product not found"})),
        )
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| client.products().get_product(404)).await;

    let err = result.unwrap_err();
    assert!(matches!(err, DsmError::UnresolvedQueryResult { .. }));
    assert_eq!(err.server_message(), Some("Product not found"));
}

// ----------------------------------------------------------------------------
// get_products() / search()
// ----------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn given_full_page_when_get_products_then_returns_products_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("type", "Popular"))
        .and(query_param("page", "2"))
        .and(query_param("items_per_page", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(5)))
        .expect(1)
        .mount(&server)
        .await;

    let page = with_client(server.uri(), |client| {
        client.products().get_products(ProductListType::Popular, 2, 5)
    })
    .await
    .unwrap();

    let ids: Vec<u64> = page.iter().map(|product| product.id()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

/// **VALUE**: Verifies a page larger than requested is refused.
///
/// **WHY THIS MATTERS**: Pagination math on the caller side assumes at most
/// `items_per_page` results; an oversized page means the server ignored the parameters.
///
/// **BUG THIS CATCHES**: Would catch an off-by-one (`>=`/`>` on the wrong side) letting a
/// sixth item through for a page of five.
#[tokio::test(flavor = "multi_thread")]
async fn given_oversized_page_when_get_products_then_unresolved_query_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(6)))
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| {
        client.products().get_products(ProductListType::Latest, 0, 5)
    })
    .await;

    assert!(matches!(result, Err(DsmError::UnresolvedQueryResult { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn given_short_page_when_get_products_then_returns_only_received_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(2)))
        .mount(&server)
        .await;

    let page = with_client(server.uri(), |client| {
        client.products().get_products(ProductListType::Latest, 0, 20)
    })
    .await
    .unwrap();

    assert_eq!(page.len(), 2);
}

/// **VALUE**: Verifies the page size is only an upper bound, never an allocation size.
///
/// **WHY THIS MATTERS**: `--count` comes straight from the command line; the largest `u32`
/// is a legal request even though the server will answer with a handful of items.
///
/// **BUG THIS CATCHES**: Would catch reserving `items_per_page` slots up front, which aborts
/// the process on allocation failure for a huge page size.
#[tokio::test(flavor = "multi_thread")]
async fn given_huge_page_size_when_get_products_then_returns_received_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("items_per_page", u32::MAX.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(1)))
        .mount(&server)
        .await;

    let page = with_client(server.uri(), |client| {
        client
            .products()
            .get_products(ProductListType::Latest, 0, u32::MAX)
    })
    .await
    .unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn given_unavailable_listing_when_get_products_then_returns_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let page = with_client(server.uri(), |client| {
        client.products().get_products(ProductListType::Latest, 0, 20)
    })
    .await
    .unwrap();

    assert!(page.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn given_product_missing_field_when_get_products_then_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "x"}])))
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| {
        client.products().get_products(ProductListType::Latest, 0, 20)
    })
    .await;

    assert!(matches!(result, Err(DsmError::MalformedResponse { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn given_tag_filter_when_search_then_tags_are_semicolon_joined() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/applications"))
        .and(query_param("query", "space game"))
        .and(query_param("page", "0"))
        .and(query_param("items_per_page", "10"))
        .and(query_param("tags", "1;5;9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(products(3)))
        .expect(1)
        .mount(&server)
        .await;

    let results = with_client(server.uri(), |client| {
        client.products().search("space game", 0, 10, &[1, 5, 9])
    })
    .await
    .unwrap();

    assert_eq!(results.len(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn given_no_tags_when_search_default_then_tags_param_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/applications"))
        .and(query_param("tags", ""))
        .and(query_param("items_per_page", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let results = with_client(server.uri(), |client| client.products().search_default("x"))
        .await
        .unwrap();

    assert!(results.is_empty());
}

// ----------------------------------------------------------------------------
// get_tags()
// ----------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn given_tag_object_when_get_tags_then_maps_ids_to_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/tags"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"1": "Games", "5": "Tools", "9": null})),
        )
        .mount(&server)
        .await;

    let tags = with_client(server.uri(), |client| client.products().get_tags())
        .await
        .unwrap();

    assert_eq!(tags.len(), 2);
    assert_eq!(tags[&1], "Games");
    assert_eq!(tags[&5], "Tools");
}

/// **VALUE**: Verifies a failing tag listing yields an empty map, not an error.
///
/// **WHY THIS MATTERS**: Tags only decorate listings; a tag outage must not break browsing.
#[tokio::test(flavor = "multi_thread")]
async fn given_failing_server_when_get_tags_then_returns_empty_map() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/tags"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let tags = with_client(server.uri(), |client| client.products().get_tags())
        .await
        .unwrap();

    assert!(tags.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn given_non_numeric_tag_id_when_get_tags_then_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"games": "Games"})))
        .mount(&server)
        .await;

    let result = with_client(server.uri(), |client| client.products().get_tags()).await;

    assert!(matches!(result, Err(DsmError::MalformedResponse { .. })));
}
