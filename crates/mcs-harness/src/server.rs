//! Servers under test and their expected status documents.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, HarnessResult};

/// One server to check: where it listens and what its status should be.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerForTesting {
    pub id: String,
    pub port: u16,
    /// Expected status document, compared against the sanitized actual one.
    pub expected: serde_json::Value,
}

/// Read a JSON array of servers. Ids must be unique and usable as a single
/// path component, since results and statuses are stored under them.
pub fn load_servers(path: impl AsRef<Path>) -> HarnessResult<Vec<ServerForTesting>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let servers: Vec<ServerForTesting> = serde_json::from_str(&content)?;

    let mut seen = HashSet::new();
    for server in &servers {
        if !is_plain_id(&server.id) {
            return Err(HarnessError::InvalidServerId(server.id.clone()));
        }
        if !seen.insert(server.id.as_str()) {
            return Err(HarnessError::DuplicateServer(server.id.clone()));
        }
    }

    tracing::debug!(count = servers.len(), path = %path.as_ref().display(), "loaded servers");
    Ok(servers)
}

fn is_plain_id(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\', '\0'])
}
