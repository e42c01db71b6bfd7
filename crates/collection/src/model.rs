//! In-memory form of a Postman v2.1 collection document.
//!
//! Only the parts the splitter needs are typed. Everything else (auth blocks,
//! scripts, saved responses, unknown keys) is carried through as raw JSON so
//! that a chunk re-emits requests exactly as they were read.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, SplitError};

pub const SCHEMA_V210: &str =
    "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Value>,
    pub info: Info,
    #[serde(default)]
    pub item: Vec<Item>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub name: String,
    /// Either a plain string or a `{content, type, version}` object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
    #[serde(default)]
    pub schema: String,
    /// Read from source documents but never written back by [`Collection::to_json`];
    /// see [`crate::rewrite`] for how the identifier reaches output files.
    #[serde(rename = "_postman_id", default, skip_serializing)]
    pub postman_id: Option<String>,
}

impl Info {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            version: None,
            schema: SCHEMA_V210.to_string(),
            postman_id: None,
        }
    }
}

/// A node of the collection tree. Anything carrying an `item` array is a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Item {
    Group(ItemGroup),
    Request(RequestItem),
}

impl Item {
    pub fn is_group(&self) -> bool {
        matches!(self, Item::Group(_))
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Group(group) => &group.name,
            Item::Request(request) => &request.name,
        }
    }

    /// Direct children; always empty for requests.
    pub fn children(&self) -> &[Item] {
        match self {
            Item::Group(group) => &group.item,
            Item::Request(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGroup {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    pub item: Vec<Item>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemGroup {
    pub fn new(name: impl Into<String>, item: Vec<Item>) -> Self {
        Self {
            name: name.into(),
            description: None,
            item,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestItem {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Request>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The schema allows a request to be just its URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Request {
    Url(String),
    Detailed(RequestDetails),
}

impl Request {
    pub fn method(&self) -> &str {
        match self {
            Request::Detailed(RequestDetails {
                method: Some(method),
                ..
            }) => method,
            _ => "GET",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Collection {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(SplitError::MalformedDocument)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(SplitError::MalformedDocument)
    }

    /// Pretty-printed v2.1 document, without `info._postman_id`.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(SplitError::SerializationFailure)
    }

    /// Total number of requests at any depth.
    pub fn request_count(&self) -> usize {
        fn count(items: &[Item]) -> usize {
            items
                .iter()
                .map(|item| match item {
                    Item::Group(group) => count(&group.item),
                    Item::Request(_) => 1,
                })
                .sum()
        }
        count(&self.item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "info": {
                "_postman_id": "c0ffee",
                "name": "Store API",
                "schema": SCHEMA_V210
            },
            "item": [
                {
                    "name": "Orders",
                    "item": [
                        {
                            "name": "List orders",
                            "request": {
                                "method": "GET",
                                "url": "{{baseUrl}}/orders",
                                "header": []
                            },
                            "response": []
                        },
                        {
                            "name": "Nested",
                            "item": []
                        }
                    ]
                },
                {
                    "name": "Ping",
                    "request": "{{baseUrl}}/ping"
                }
            ],
            "variable": [{ "key": "baseUrl", "value": "http://localhost" }]
        })
    }

    #[test]
    fn test_groups_and_requests_are_told_apart() {
        let collection = Collection::from_value(sample()).unwrap();

        assert_eq!(collection.item.len(), 2);
        assert!(collection.item[0].is_group());
        assert!(!collection.item[1].is_group());
        assert_eq!(collection.item[0].children().len(), 2);
        assert!(collection.item[0].children()[1].is_group());
        assert!(collection.item[1].children().is_empty());
        assert_eq!(collection.request_count(), 2);
    }

    #[test]
    fn test_bare_url_request() {
        let collection = Collection::from_value(sample()).unwrap();

        match &collection.item[1] {
            Item::Request(request) => {
                let request = request.request.as_ref().unwrap();
                assert_eq!(request, &Request::Url("{{baseUrl}}/ping".to_string()));
                assert_eq!(request.method(), "GET");
            }
            other => panic!("expected request, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_fields_survive_reserialization() {
        let collection = Collection::from_value(sample()).unwrap();
        let written: Value = serde_json::from_slice(&collection.to_json().unwrap()).unwrap();

        assert_eq!(written["item"][0]["item"][0]["response"], json!([]));
        assert_eq!(written["variable"][0]["key"], "baseUrl");
    }

    #[test]
    fn test_writer_omits_postman_id() {
        let collection = Collection::from_value(sample()).unwrap();
        assert_eq!(collection.info.postman_id.as_deref(), Some("c0ffee"));

        let written: Value = serde_json::from_slice(&collection.to_json().unwrap()).unwrap();
        assert!(written["info"].get("_postman_id").is_none());
    }

    #[test]
    fn test_missing_info_is_malformed() {
        let result = Collection::from_slice(br#"{"item": []}"#);
        assert!(matches!(result, Err(SplitError::MalformedDocument(_))));
    }
}
