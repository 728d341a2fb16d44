//! `rx-project` -- Timestamp file and config file I/O for the reaction timeline editor.
//!
//! This crate handles the JSON files that carry a reaction timeline:
//!
//! - **Load**: Parse and validate a timestamp file (all-or-nothing)
//! - **Save**: Pretty or compact JSON, atomic write to disk
//! - **Config**: Read an `EditorConfig` with per-key defaults
//!
//! # Usage
//!
//! ```rust,no_run
//! use rx_project::{load_timestamps, save_timestamps};
//! use rx_timeline::TimelineModel;
//! use std::path::Path;
//!
//! let mut file = load_timestamps(Path::new("timestamps.json")).unwrap();
//! let mut timeline = TimelineModel::new();
//! timeline.load(&file.events().unwrap()).unwrap();
//!
//! // ... edit ...
//!
//! file.set_events(timeline.events()).unwrap();
//! save_timestamps(&file, Path::new("timestamps.json")).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod load;
pub mod save;
pub mod types;

// Re-export primary API at crate root
pub use config::{config_from_json_str, load_config};
pub use error::{ProjectError, ProjectResult};
pub use load::{from_json_string, load_timestamps};
pub use save::{save_timestamps, to_json_string, to_json_string_compact};
pub use types::{LayoutSettings, SyncPointRecord, TimestampFile};
