//! Timestamp file serialization.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{ProjectError, ProjectResult};
use crate::types::TimestampFile;

/// Serialize to a pretty-printed JSON string.
pub fn to_json_string(file: &TimestampFile) -> ProjectResult<String> {
    let json = serde_json::to_string_pretty(file)?;
    debug!(
        sync_points = file.sync_points.len(),
        json_len = json.len(),
        "Serialized timestamp file"
    );
    Ok(json)
}

/// Serialize to a compact JSON string, as sent to the upload endpoint.
pub fn to_json_string_compact(file: &TimestampFile) -> ProjectResult<String> {
    let json = serde_json::to_string(file)?;
    debug!(
        sync_points = file.sync_points.len(),
        json_len = json.len(),
        "Serialized timestamp file (compact)"
    );
    Ok(json)
}

/// Write `file` to `path`.
///
/// The JSON goes to a sibling temp file first and is renamed over the
/// target, so an interrupted save never leaves a truncated file.
pub fn save_timestamps(file: &TimestampFile, path: &Path) -> ProjectResult<()> {
    let json = to_json_string(file)?;
    let temp_path = path.with_extension("json.tmp");

    std::fs::write(&temp_path, json.as_bytes()).map_err(|e| {
        tracing::error!(path = %temp_path.display(), error = %e, "Failed to write temp file");
        ProjectError::Io(e)
    })?;

    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        tracing::error!(
            from = %temp_path.display(),
            to = %path.display(),
            error = %e,
            "Failed to rename temp file to target"
        );
        ProjectError::Io(e)
    })?;

    info!(
        path = %path.display(),
        sync_points = file.sync_points.len(),
        "Timestamp file saved"
    );
    Ok(())
}
