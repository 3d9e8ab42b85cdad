//! Persistence of per-server results.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use mcs_diff::DiffResult;
use serde::Serialize;

use crate::error::HarnessResult;
use crate::server::ServerForTesting;

/// Write the results for one server into `<dir>/<id>/`:
///
/// - `actual.json` -- the sanitized status that was compared
/// - `from_config.json` -- the server entry, including its expected status
/// - `differences.json` -- only when `differences` is given
///
/// Returns the server's result directory.
pub fn save_result(
    dir: &Path,
    server: &ServerForTesting,
    actual: &serde_json::Value,
    differences: Option<&DiffResult>,
) -> HarnessResult<PathBuf> {
    let folder = dir.join(&server.id);
    fs::create_dir_all(&folder)?;

    write_json(&folder.join("actual.json"), actual)?;
    write_json(&folder.join("from_config.json"), server)?;

    let differences_file = folder.join("differences.json");
    match differences {
        Some(diff) => write_json(&differences_file, diff)?,
        // Leftovers from an earlier failing run would be misleading.
        None if differences_file.exists() => fs::remove_file(&differences_file)?,
        None => {}
    }

    tracing::debug!(server = %server.id, path = %folder.display(), "saved result");
    Ok(folder)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> HarnessResult<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;

    let mut file = fs::File::create(path)?;
    file.write_all(&buf)?;
    Ok(())
}
