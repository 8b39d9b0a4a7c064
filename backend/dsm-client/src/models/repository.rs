use crate::error::DsmError;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A git repository linked to a developer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(deserialize_with = "crate::models::flexible_id")]
    pub id: u64,
    pub name: String,
}

impl Repository {
    pub fn from_value(value: Value) -> Result<Self, DsmError> {
        Ok(serde_json::from_value(value)?)
    }
}
