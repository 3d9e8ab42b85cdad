//! Runs the status comparison for a set of servers.

use mcs_diff::DiffResult;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::sanitize::sanitize_status;
use crate::save::save_result;
use crate::server::ServerForTesting;
use crate::source::StatusSource;

/// What happened when one server was checked.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The actual status matched the expected one.
    Passed,
    /// The statuses differ.
    Failed(DiffResult),
    /// No status could be obtained (error or timeout).
    Unreachable(String),
    /// A status was obtained but could not be compared.
    Error(String),
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    /// Short label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "OK",
            Outcome::Failed(_) => "FAIL",
            Outcome::Unreachable(_) => "UNREACHABLE",
            Outcome::Error(_) => "ERROR",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServerResult {
    pub id: String,
    pub port: u16,
    pub outcome: Outcome,
}

/// Results of a run, ordered by port.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub results: Vec<ServerResult>,
}

impl RunSummary {
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_passed()).count()
    }

    /// Every server that did not pass, including unreachable ones.
    pub fn failed_count(&self) -> usize {
        self.results.len() - self.passed_count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn get(&self, id: &str) -> Option<&ServerResult> {
        self.results.iter().find(|r| r.id == id)
    }
}

/// Checks servers against their expected status through a [`StatusSource`].
pub struct Runner<S> {
    config: HarnessConfig,
    source: S,
}

impl<S: StatusSource> Runner<S> {
    pub fn new(config: HarnessConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Check every server concurrently and collect the results.
    pub async fn run(&self, servers: &[ServerForTesting]) -> RunSummary {
        info!(servers = servers.len(), "checking servers");

        let checks = servers.iter().map(|server| async move {
            ServerResult {
                id: server.id.clone(),
                port: server.port,
                outcome: self.check(server).await,
            }
        });
        let mut results = futures::future::join_all(checks).await;
        results.sort_by_key(|r| r.port);

        let summary = RunSummary { results };
        info!(
            passed = summary.passed_count(),
            failed = summary.failed_count(),
            "run complete"
        );
        summary
    }

    /// Fetch, sanitize, compare, and save the result for one server.
    pub async fn check(&self, server: &ServerForTesting) -> Outcome {
        let mut actual = match self.fetch(server).await {
            Ok(status) => status,
            Err(e) => {
                warn!(server = %server.id, error = %e, "server unreachable");
                return Outcome::Unreachable(e.to_string());
            }
        };
        sanitize_status(&mut actual, &self.config.ignored_fields);

        match self.compare_and_save(server, &actual) {
            Ok(diff) if diff.is_empty() => {
                debug!(server = %server.id, "status matches");
                Outcome::Passed
            }
            Ok(diff) => {
                debug!(server = %server.id, differences = diff.leaf_count(), "status differs");
                Outcome::Failed(diff)
            }
            Err(e) => {
                warn!(server = %server.id, error = %e, "comparison failed");
                Outcome::Error(e.to_string())
            }
        }
    }

    async fn fetch(&self, server: &ServerForTesting) -> HarnessResult<serde_json::Value> {
        match timeout(self.config.fetch_timeout(), self.source.fetch(server)).await {
            Ok(result) => result,
            Err(_) => Err(HarnessError::Timeout {
                server: server.id.clone(),
            }),
        }
    }

    fn compare_and_save(
        &self,
        server: &ServerForTesting,
        actual: &serde_json::Value,
    ) -> HarnessResult<DiffResult> {
        let diff = mcs_diff::compare_json(&server.expected, actual)?;
        if let Some(dir) = &self.config.results_dir {
            let differences = if diff.is_empty() { None } else { Some(&diff) };
            save_result(dir, server, actual, differences)?;
        }
        Ok(diff)
    }
}
