use crate::error::DsmError;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A marketplace listing. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "crate::models::flexible_id")]
    id: u64,
    name: String,
    about: String,
    #[serde(alias = "short_summery")]
    short_summary: String,
    keywords: Vec<String>,
    tags: Vec<i64>,
}

impl Product {
    pub fn from_json(json: &str) -> Result<Self, DsmError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self, DsmError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn about(&self) -> &str {
        &self.about
    }

    pub fn short_summary(&self) -> &str {
        &self.short_summary
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn tags(&self) -> &[i64] {
        &self.tags
    }
}

/// Ordering of a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProductListType {
    #[default]
    Latest,
    Popular,
}

impl fmt::Display for ProductListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductListType::Latest => f.write_str("Latest"),
            ProductListType::Popular => f.write_str("Popular"),
        }
    }
}
