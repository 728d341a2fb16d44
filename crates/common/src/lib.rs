//! `rx-common` -- Shared types and configuration for the reaction-sync editor.
//!
//! This crate is the foundation that the other editor crates depend on:
//!
//! - **Types**: `TimeCode` (seconds newtype with a human-readable display)
//! - **Config**: `EditorConfig` and its per-component sections

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    EditorConfig, GestureConfig, HistoryConfig, LayoutDefaults, TimelineConfig, ZoomConfig,
};
pub use types::TimeCode;
