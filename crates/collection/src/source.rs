//! Loading the collection to split, from disk or from a collection API.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{Result, SplitError};
use crate::model::Collection;

#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// `None` waits as long as the server takes.
    pub timeout: Option<Duration>,
    /// Sent as `X-Api-Key` when present.
    pub api_key: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            api_key: None,
        }
    }
}

/// Parses either a flat collection document or the `{"collection": {...}}`
/// wrapper returned by the collection API.
pub fn parse_source(bytes: &[u8]) -> Result<Collection> {
    let mut value: Value = serde_json::from_slice(bytes).map_err(SplitError::MalformedDocument)?;

    let wrapped = value
        .as_object_mut()
        .filter(|object| !object.contains_key("info"))
        .and_then(|object| object.remove("collection"));

    Collection::from_value(wrapped.unwrap_or(value))
}

pub fn fetch_from_storage<P: AsRef<Path>>(path: P) -> Result<Collection> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| SplitError::SourceUnavailable {
        location: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let collection = parse_source(&bytes)?;
    info!(path = %path.display(), name = %collection.info.name, "loaded collection");
    Ok(collection)
}

/// Downloads a collection. A response other than 200 means there is nothing to
/// split and yields `Ok(None)`; transport failures and timeouts are errors.
pub async fn fetch_from_network(url: &str, options: &FetchOptions) -> Result<Option<Collection>> {
    let unavailable = |e: reqwest::Error| SplitError::SourceUnavailable {
        location: url.to_string(),
        reason: e.to_string(),
    };

    let mut builder = Client::builder();
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().map_err(unavailable)?;

    let mut request = client.get(url);
    if let Some(key) = &options.api_key {
        request = request.header("X-Api-Key", key);
    }

    let response = request.send().await.map_err(unavailable)?;

    let status = response.status();
    if status != StatusCode::OK {
        warn!(%url, %status, "collection request failed, nothing to split");
        return Ok(None);
    }

    let body = response.bytes().await.map_err(unavailable)?;
    let collection = parse_source(&body)?;
    info!(%url, name = %collection.info.name, "downloaded collection");
    Ok(Some(collection))
}
