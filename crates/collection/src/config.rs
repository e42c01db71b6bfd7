use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SplitError};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Maximum number of direct children per chunk.
    pub max_requests: i64,
    /// Directory receiving one `<chunk>.json` per chunk.
    pub output_dir: PathBuf,
    /// Written to `info._postman_id` of every chunk, even when empty.
    pub postman_id: String,
    /// Worker threads used to write chunks. 1 keeps everything on the caller's thread.
    pub jobs: usize,
    /// Copy collection auth/events/variables and folder settings into each chunk.
    pub inherit_settings: bool,
    /// When set, top-level requests outside any folder are chunked as a folder of this name.
    pub loose_requests_group: Option<String>,
    /// Deadline for fetching the source collection over the network; 0 disables it.
    pub timeout_secs: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            output_dir: PathBuf::from("."),
            postman_id: String::new(),
            jobs: 1,
            inherit_settings: false,
            loose_requests_group: None,
            timeout_secs: 30,
        }
    }
}

impl SplitConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| SplitError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml_str(&content)
            .map_err(|e| SplitError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// The chunk size, rejecting zero and negative values.
    pub fn limit(&self) -> Result<usize> {
        usize::try_from(self.max_requests)
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or(SplitError::InvalidLimit(self.max_requests))
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
