//! Human-readable rendering of run results and diffs.
//!
//! Every diff level becomes a `Key | Expected | Actual` table. Nested
//! sub-differences get their own table titled `<parent>.<key>`, printed
//! after all tables of the current level.

use std::fmt::Write as _;

use colored::Colorize;
use mcs_diff::{DiffEntry, DiffResult, Value};

use crate::runner::{Outcome, RunSummary};

const ABSENT: &str = "<absent>";

/// Render the overview table, one diff table per failed server, and the
/// failure count.
pub fn render_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    let rows: Vec<Vec<String>> = summary
        .results
        .iter()
        .map(|r| vec![r.id.clone(), r.port.to_string(), r.outcome.label().to_string()])
        .collect();
    render_table(&mut out, None, &["ID", "Port", "Result"], &rows, Some(2));

    for result in &summary.results {
        match &result.outcome {
            Outcome::Unreachable(reason) | Outcome::Error(reason) => {
                let _ = writeln!(out, "{}: {}", result.id.bold(), reason);
            }
            Outcome::Passed | Outcome::Failed(_) => {}
        }
    }

    let failed: Vec<(String, &[DiffEntry])> = summary
        .results
        .iter()
        .filter_map(|r| match &r.outcome {
            Outcome::Failed(diff) => Some((r.id.clone(), diff.entries.as_slice())),
            _ => None,
        })
        .collect();
    render_levels(&mut out, failed);

    let _ = writeln!(out, "Total failed servers: {}", summary.failed_count());
    out
}

/// Render a single comparison under `title`.
pub fn render_diff(title: &str, diff: &DiffResult) -> String {
    let mut out = String::new();
    if diff.is_empty() {
        let _ = writeln!(out, "{} {}", title.bold(), "documents match".green());
        return out;
    }
    render_levels(&mut out, vec![(title.to_string(), diff.entries.as_slice())]);
    out
}

fn render_levels(out: &mut String, mut level: Vec<(String, &[DiffEntry])>) {
    while !level.is_empty() {
        let mut next = Vec::new();
        for (title, entries) in level {
            let mut rows = Vec::new();
            for entry in entries {
                match entry {
                    DiffEntry::Difference(d) => rows.push(vec![
                        d.key.clone(),
                        render_value(d.left.as_ref()),
                        render_value(d.right.as_ref()),
                    ]),
                    DiffEntry::SubDifference(s) => {
                        next.push((format!("{}.{}", title, s.key), s.children.as_slice()));
                    }
                }
            }
            if !rows.is_empty() {
                render_table(out, Some(title.as_str()), &["Key", "Expected", "Actual"], &rows, None);
            }
        }
        level = next;
    }
}

fn render_value(value: Option<&Value>) -> String {
    match value {
        None => ABSENT.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_json().to_string(),
    }
}

/// Plain-text table with aligned columns. `status_column` cells are
/// colored by outcome label.
fn render_table(
    out: &mut String,
    title: Option<&str>,
    headers: &[&str],
    rows: &[Vec<String>],
    status_column: Option<usize>,
) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }
    let last = headers.len() - 1;

    if let Some(title) = title {
        let _ = writeln!(out, "{}", title.bold());
    }

    let header: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad(h, widths[i], i == last))
        .collect();
    let _ = writeln!(out, "{}", header.join(" | ").bold());

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let text = pad(cell, widths[i], i == last);
                if status_column == Some(i) {
                    paint_status(&text, cell)
                } else {
                    text
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join(" | "));
    }
    out.push('\n');
}

fn pad(text: &str, width: usize, last: bool) -> String {
    if last {
        text.to_string()
    } else {
        format!("{:<width$}", text, width = width)
    }
}

fn paint_status(text: &str, label: &str) -> String {
    if label == "OK" {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}
