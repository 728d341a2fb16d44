//! Timestamp file deserialization.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{ProjectError, ProjectResult};
use crate::types::TimestampFile;

/// Deserialize a timestamp file from a JSON string.
///
/// Every sync point is validated before the file is returned; a single bad
/// record rejects the whole file.
pub fn from_json_string(json: &str) -> ProjectResult<TimestampFile> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.get("sync_points").is_some_and(|v| v.is_array()) {
        return Err(ProjectError::InvalidFile {
            reason: "sync_points must be an array".into(),
        });
    }

    let file: TimestampFile = serde_json::from_value(value)?;
    let events = file.events()?;
    file.layout()?;

    debug!(
        video_id = file.youtube_video_id.as_deref().unwrap_or("-"),
        sync_points = events.len(),
        extra_keys = file.extra.len(),
        "Deserialized timestamp file"
    );
    Ok(file)
}

/// Load a timestamp file from `path`.
pub fn load_timestamps(path: &Path) -> ProjectResult<TimestampFile> {
    if !path.exists() {
        return Err(ProjectError::NotFound {
            path: path.display().to_string(),
        });
    }

    let json = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Failed to read timestamp file");
        ProjectError::Io(e)
    })?;

    let file = from_json_string(&json)?;

    info!(
        path = %path.display(),
        sync_points = file.sync_points.len(),
        "Timestamp file loaded"
    );
    Ok(file)
}
