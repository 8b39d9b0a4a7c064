use super::{DEFAULT_ITEMS_PER_PAGE, DEFAULT_PAGE};
use crate::client::DsmClient;
use crate::dispatch::DsmRequest;
use crate::error::DsmError;
use crate::models::{Product, ProductListType, into_array, json_kind};

use std::collections::HashMap;

use log::log;
use serde_json::Value;

const PRODUCTS_ENDPOINT: &str = "/products";
const TAGS_ENDPOINT: &str = "/products/tags";
const SEARCH_PRODUCTS_ENDPOINT: &str = "/search/applications";

const TAG_SEPARATOR: &str = ";";

/// Requests against the `/products` family of endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ProductRequests<'a> {
    client: &'a DsmClient,
}

impl<'a> ProductRequests<'a> {
    pub fn new(client: &'a DsmClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// Returns [`DsmError::UnresolvedQueryResult`] with the server message if the product cannot be fetched.
    pub fn get_product(&self, id: u64) -> Result<Product, DsmError> {
        let response = self
            .client
            .execute(DsmRequest::get(PRODUCTS_ENDPOINT).segment(id))?;

        if !response.is_success() {
            return Err(DsmError::unresolved(response.message()));
        }
        Product::from_json(&response.body)
    }

    /// One page of products ordered by `list_type`.
    ///
    /// # Errors
    /// Returns [`DsmError::UnresolvedQueryResult`] if the server sends more than `items_per_page` products.
    pub fn get_products(
        &self,
        list_type: ProductListType,
        page: u32,
        items_per_page: u32,
    ) -> Result<Vec<Product>, DsmError> {
        let request = DsmRequest::get(PRODUCTS_ENDPOINT)
            .query("type", list_type)
            .query("page", page)
            .query("items_per_page", items_per_page);
        self.fetch_page(request, items_per_page)
    }

    /// Search products, optionally restricted to tag ids.
    pub fn search(
        &self,
        query: &str,
        page: u32,
        items_per_page: u32,
        tags: &[i64],
    ) -> Result<Vec<Product>, DsmError> {
        let tags = tags
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(TAG_SEPARATOR);
        let request = DsmRequest::get(SEARCH_PRODUCTS_ENDPOINT)
            .query("query", query)
            .query("page", page)
            .query("items_per_page", items_per_page)
            .query("tags", tags);
        self.fetch_page(request, items_per_page)
    }

    /// [`search`](Self::search) with the first page of 20 and no tag filter.
    pub fn search_default(&self, query: &str) -> Result<Vec<Product>, DsmError> {
        self.search(query, DEFAULT_PAGE, DEFAULT_ITEMS_PER_PAGE, &[])
    }

    /// All tags by id. An unsuccessful response yields an empty map.
    pub fn get_tags(&self) -> Result<HashMap<i64, String>, DsmError> {
        let response = self.client.execute(DsmRequest::get(TAGS_ENDPOINT))?;

        if !response.is_success() {
            log!(
                response.failure_level(),
                "Tag listing unavailable (HTTP {})",
                response.status
            );
            return Ok(HashMap::new());
        }

        let entries = match response.json()? {
            Value::Object(entries) => entries,
            other => {
                return Err(DsmError::malformed(format!(
                    "expected a JSON object of tags, got {}",
                    json_kind(&other)
                )));
            }
        };

        let mut tags = HashMap::with_capacity(entries.len());
        for (key, value) in entries {
            let id: i64 = key
                .parse()
                .map_err(|_| DsmError::malformed(format!("tag id '{key}' is not an integer")))?;
            match value {
                Value::Null => continue,
                Value::String(name) => tags.insert(id, name),
                other => tags.insert(id, other.to_string()),
            };
        }
        Ok(tags)
    }

    /// Decode a product array page, refusing pages larger than requested.
    fn fetch_page(&self, request: DsmRequest, items_per_page: u32) -> Result<Vec<Product>, DsmError> {
        let response = self.client.execute(request)?;

        if !response.is_success() {
            log!(
                response.failure_level(),
                "Product listing unavailable (HTTP {}): {}",
                response.status,
                response.message().unwrap_or_default()
            );
            return Ok(Vec::new());
        }

        let items = into_array(response.json()?)?;
        if items.len() as u64 > u64::from(items_per_page) {
            return Err(DsmError::unresolved(Some(format!(
                "Server returned {} results, more than the {items_per_page} requested",
                items.len()
            ))));
        }

        items.into_iter().map(Product::from_value).collect()
    }
}
