//! Removal of status fields that differ on every query.

use serde_json::Value;

/// Remove every field named by a dotted path (`raw.favicon`) from `status`.
///
/// Paths that do not exist are skipped, as are paths that run into a
/// non-object before their last segment.
pub fn sanitize_status(status: &mut Value, ignored: &[String]) {
    for path in ignored {
        remove_path(status, path);
    }
}

fn remove_path(status: &mut Value, path: &str) {
    let mut segments: Vec<&str> = path.split('.').collect();
    let Some(last) = segments.pop() else {
        return;
    };

    let mut current = status;
    for segment in segments {
        match current.get_mut(segment) {
            Some(next) if next.is_object() => current = next,
            _ => return,
        }
    }

    if let Some(map) = current.as_object_mut() {
        if map.remove(last).is_some() {
            tracing::trace!(field = path, "removed non-deterministic field");
        }
    }
}
