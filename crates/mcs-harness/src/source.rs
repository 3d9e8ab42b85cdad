use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{HarnessError, HarnessResult};
use crate::server::ServerForTesting;

/// Produces the actual status document of a server.
///
/// Querying a live server over the Minecraft protocol is done by an
/// implementation of this trait outside the harness.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, server: &ServerForTesting) -> HarnessResult<serde_json::Value>;
}

/// Reads previously captured status documents from `<dir>/<id>.json`.
#[derive(Clone, Debug)]
pub struct FileStatusSource {
    dir: PathBuf,
}

impl FileStatusSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, server: &ServerForTesting) -> PathBuf {
        self.dir.join(format!("{}.json", server.id))
    }
}

#[async_trait]
impl StatusSource for FileStatusSource {
    async fn fetch(&self, server: &ServerForTesting) -> HarnessResult<serde_json::Value> {
        let path = self.path_for(server);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| HarnessError::Fetch {
                server: server.id.clone(),
                reason: format!("{}: {e}", path.display()),
            })?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Serves status documents from memory.
#[derive(Clone, Debug, Default)]
pub struct StaticStatusSource {
    statuses: HashMap<String, serde_json::Value>,
}

impl StaticStatusSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, id: impl Into<String>, status: serde_json::Value) -> Self {
        self.statuses.insert(id.into(), status);
        self
    }
}

#[async_trait]
impl StatusSource for StaticStatusSource {
    async fn fetch(&self, server: &ServerForTesting) -> HarnessResult<serde_json::Value> {
        self.statuses
            .get(&server.id)
            .cloned()
            .ok_or_else(|| HarnessError::Fetch {
                server: server.id.clone(),
                reason: "no status recorded".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn server(id: &str) -> ServerForTesting {
        ServerForTesting {
            id: id.into(),
            port: 25565,
            expected: json!({}),
        }
    }

    #[tokio::test]
    async fn file_source_reads_by_id() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("paper.json"), r#"{"motd": "hi"}"#).unwrap();

        let source = FileStatusSource::new(dir.path());
        let status = source.fetch(&server("paper")).await.unwrap();
        assert_eq!(status, json!({"motd": "hi"}));
    }

    #[tokio::test]
    async fn file_source_missing_file_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileStatusSource::new(dir.path());

        let err = source.fetch(&server("paper")).await.unwrap_err();
        assert!(matches!(err, HarnessError::Fetch { server, .. } if server == "paper"));
    }

    #[tokio::test]
    async fn static_source() {
        let source = StaticStatusSource::new().with_status("paper", json!({"online": 1}));
        assert_eq!(source.fetch(&server("paper")).await.unwrap(), json!({"online": 1}));
        assert!(source.fetch(&server("vanilla")).await.is_err());
    }
}
