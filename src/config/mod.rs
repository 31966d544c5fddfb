//! Configuration module for the audio scope.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for audio
//! capture and the window, `AppPaths` for cross-platform config
//! directories, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, AudioConfig, UiConfig};
