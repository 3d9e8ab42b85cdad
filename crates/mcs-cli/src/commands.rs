use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use mcs_harness::{
    load_servers, render_diff, render_summary, sanitize_status, FileStatusSource, HarnessConfig,
    Outcome, RunSummary, Runner,
};
use serde_json::json;

use crate::cli::*;

/// Run the parsed command and return the process exit code.
pub fn run_command(cli: Cli) -> anyhow::Result<i32> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    match cli.command {
        Command::Diff(args) => cmd_diff(args, &cli.format),
        Command::Test(args) => cmd_test(args, &cli.format),
    }
}

fn cmd_diff(args: DiffArgs, format: &OutputFormat) -> anyhow::Result<i32> {
    let expected = read_json(&args.expected)?;
    let mut actual = read_json(&args.actual)?;
    sanitize_status(&mut actual, &args.ignore);

    let diff = mcs_diff::compare_json(&expected, &actual)
        .with_context(|| format!("cannot compare {} with {}", args.expected.display(), args.actual.display()))?;
    tracing::debug!(entries = diff.len(), leaves = diff.leaf_count(), "compared documents");

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&diff)?),
        OutputFormat::Text => {
            let title = format!("{} vs {}", args.expected.display(), args.actual.display());
            print!("{}", render_diff(&title, &diff));
        }
    }

    Ok(if diff.is_empty() { 0 } else { 1 })
}

fn cmd_test(args: TestArgs, format: &OutputFormat) -> anyhow::Result<i32> {
    let config = harness_config(&args)?;
    let servers = load_servers(&config.data_file)
        .with_context(|| format!("cannot load servers from {}", config.data_file.display()))?;
    if servers.is_empty() {
        println!("No servers to test in {}", config.data_file.display().to_string().bold());
        return Ok(0);
    }

    let runner = Runner::new(config, FileStatusSource::new(&args.statuses));
    let runtime = tokio::runtime::Runtime::new()?;
    let summary = runtime.block_on(runner.run(&servers));

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary_json(&summary))?),
        OutputFormat::Text => {
            print!("{}", render_summary(&summary));
            if summary.all_passed() {
                println!("{} All {} servers passed.", "✓".green().bold(), summary.results.len());
            }
        }
    }

    Ok(exit_code(summary.failed_count()))
}

/// Failed-server count as a process exit code. Unix keeps only the low
/// eight bits, so the count saturates at 255.
fn exit_code(failed: usize) -> i32 {
    failed.min(255) as i32
}

/// Config file (or defaults) with command-line overrides applied.
fn harness_config(args: &TestArgs) -> anyhow::Result<HarnessConfig> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::load(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => HarnessConfig::default(),
    };
    if let Some(data) = &args.data {
        config.data_file = data.clone();
    }
    if let Some(results) = &args.results {
        config.results_dir = Some(results.clone());
    }
    if args.no_save {
        config.results_dir = None;
    }
    Ok(config)
}

fn summary_json(summary: &RunSummary) -> serde_json::Value {
    let servers: Vec<serde_json::Value> = summary
        .results
        .iter()
        .map(|r| {
            let mut entry = json!({
                "id": r.id,
                "port": r.port,
                "result": r.outcome.label(),
            });
            match &r.outcome {
                Outcome::Failed(diff) => entry["differences"] = json!(diff),
                Outcome::Unreachable(reason) | Outcome::Error(reason) => entry["reason"] = json!(reason),
                Outcome::Passed => {}
            }
            entry
        })
        .collect();

    json!({
        "servers": servers,
        "failed": summary.failed_count(),
    })
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}
