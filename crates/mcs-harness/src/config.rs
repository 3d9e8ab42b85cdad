use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::HarnessResult;

/// Fields of a status response that change between runs and are removed
/// before comparison.
pub const DEFAULT_IGNORED_FIELDS: &[&str] = &["icon", "latency", "raw.favicon"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// JSON array of servers and their expected status documents.
    pub data_file: PathBuf,
    /// Where per-server results are written; `None` disables saving.
    pub results_dir: Option<PathBuf>,
    /// Dotted paths stripped from every actual status document.
    pub ignored_fields: Vec<String>,
    pub fetch_timeout_secs: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data/for_testing.json"),
            results_dir: Some(PathBuf::from("results")),
            ignored_fields: DEFAULT_IGNORED_FIELDS.iter().map(|f| f.to_string()).collect(),
            fetch_timeout_secs: 10,
        }
    }
}

impl HarnessConfig {
    /// Load a TOML config file. Keys that are not set keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> HarnessResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
