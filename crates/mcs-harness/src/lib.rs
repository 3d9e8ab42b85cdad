//! Integration-test harness for server status queries.
//!
//! Loads a set of servers with their expected status documents, obtains the
//! actual status of each through a [`StatusSource`], strips fields that
//! change from run to run, and compares the two with [`mcs_diff::compare_json`].
//! Results are persisted per server and rendered as tables.

pub mod config;
pub mod error;
pub mod report;
pub mod runner;
pub mod sanitize;
pub mod save;
pub mod server;
pub mod source;

pub use config::HarnessConfig;
pub use error::{HarnessError, HarnessResult};
pub use report::{render_diff, render_summary};
pub use runner::{Outcome, RunSummary, Runner, ServerResult};
pub use sanitize::sanitize_status;
pub use save::save_result;
pub use server::{load_servers, ServerForTesting};
pub use source::{FileStatusSource, StaticStatusSource, StatusSource};
