//! Editor configuration files.

use std::path::Path;

use rx_common::EditorConfig;
use tracing::info;

use crate::error::{ProjectError, ProjectResult};

/// Parse an [`EditorConfig`] from JSON. Missing keys keep their defaults.
pub fn config_from_json_str(json: &str) -> ProjectResult<EditorConfig> {
    Ok(serde_json::from_str(json)?)
}

/// Read an [`EditorConfig`] from a JSON file.
pub fn load_config(path: &Path) -> ProjectResult<EditorConfig> {
    if !path.exists() {
        return Err(ProjectError::NotFound {
            path: path.display().to_string(),
        });
    }
    let json = std::fs::read_to_string(path)?;
    let config = config_from_json_str(&json)?;
    info!(
        path = %path.display(),
        pixels_per_second = config.timeline.pixels_per_second,
        max_history = config.history.max_entries,
        "Editor config loaded"
    );
    Ok(config)
}
