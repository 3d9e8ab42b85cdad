use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("diff error: {0}")]
    Diff(#[from] mcs_diff::DiffError),

    #[error("status fetch failed for {server}: {reason}")]
    Fetch { server: String, reason: String },

    #[error("status fetch timed out for {server}")]
    Timeout { server: String },

    #[error("duplicate server id: {0}")]
    DuplicateServer(String),

    #[error("invalid server id {0:?}: must be a plain file name")]
    InvalidServerId(String),
}

pub type HarnessResult<T> = Result<T, HarnessError>;
