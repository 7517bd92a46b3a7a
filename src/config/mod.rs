//! Configuration management for siriwave.
//!
//! This module handles loading application configuration from TOML files stored
//! in the user's config directory.

pub mod file;

pub use file::{get_config_path, AudioConfig, SiriwaveConfig, ViewConfig};
