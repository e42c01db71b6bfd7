//! Identifier injection for already-serialized collection documents.
//!
//! [`Collection::to_json`](crate::model::Collection::to_json) never emits
//! `info._postman_id`, so chunk files go through a second shape that carries the
//! field explicitly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, SplitError};
use crate::model::Item;

#[derive(Debug, Serialize, Deserialize)]
struct IdentifiedInfo {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<Value>,
    #[serde(default)]
    schema: String,
    #[serde(rename = "_postman_id", default)]
    postman_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct IdentifiedCollection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth: Option<Value>,
    info: IdentifiedInfo,
    #[serde(default)]
    item: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variable: Option<Value>,
}

/// Sets `info._postman_id` to `new_id` and re-emits the document with two-space
/// indentation. An empty id is written as-is.
pub fn rewrite_identifier(document: &[u8], new_id: &str) -> Result<Vec<u8>> {
    let mut collection: IdentifiedCollection =
        serde_json::from_slice(document).map_err(SplitError::MalformedDocument)?;

    collection.info.postman_id = new_id.to_string();

    serde_json::to_vec_pretty(&collection).map_err(SplitError::SerializationFailure)
}
