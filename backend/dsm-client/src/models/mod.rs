//! Plain data records decoded from OpenDSM responses.
//!
//! Models have no behaviour beyond decoding; each is created per response
//! and handed to the caller.

pub mod product;
pub mod repository;
pub mod user;

pub use product::{Product, ProductListType};
pub use repository::Repository;
pub use user::{CredentialValidation, User};

use crate::error::DsmError;

use std::num::NonZeroUsize;
use std::thread;

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Ids arrive either as JSON numbers or as numeric strings.
pub(crate) fn flexible_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum WireId {
        Number(u64),
        Text(String),
    }

    match WireId::deserialize(deserializer)? {
        WireId::Number(id) => Ok(id),
        WireId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("id '{text}' is not an unsigned integer"))),
    }
}

/// Take the elements out of a JSON array body.
#[track_caller]
pub(crate) fn into_array(json: Value) -> Result<Vec<Value>, DsmError> {
    match json {
        Value::Array(items) => Ok(items),
        other => Err(DsmError::malformed(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Decode every element of a JSON array on scoped worker threads.
///
/// Elements are split into contiguous chunks, one per worker; output slot `i`
/// is always decoded from source element `i`.
pub(crate) fn decode_parallel<T, F>(items: Vec<Value>, decode: F) -> Result<Vec<T>, DsmError>
where
    T: Send,
    F: Fn(Value) -> Result<T, DsmError> + Sync,
{
    if items.is_empty() {
        return Ok(Vec::new());
    }

    let total = items.len();
    let workers = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
        .min(total);
    let chunk_size = total.div_ceil(workers);

    let mut chunks = Vec::with_capacity(workers);
    let mut items = items.into_iter().peekable();
    while items.peek().is_some() {
        chunks.push(items.by_ref().take(chunk_size).collect::<Vec<_>>());
    }

    let decode = &decode;
    thread::scope(|scope| -> Result<Vec<T>, DsmError> {
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                scope.spawn(move || chunk.into_iter().map(decode).collect::<Result<Vec<T>, _>>())
            })
            .collect();

        let mut decoded = Vec::with_capacity(total);
        for handle in handles {
            let chunk = handle
                .join()
                .map_err(|_| DsmError::malformed("decode worker panicked"))??;
            decoded.extend(chunk);
        }
        Ok(decoded)
    })
}
