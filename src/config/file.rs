//! Configuration file management for siriwave.
//!
//! This module handles loading application configuration from TOML files.
//! Configuration is stored in the user's config directory.

use crate::wave::{Gradient, LineColor, Rgb, Uniform, WaveConfig, WhiteValue};
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Audio input configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Audio device to use. Options:
    /// - "default" for system default device
    /// - numeric index (0, 1, 2, etc.) from `siriwave list-devices`
    /// - device name from `siriwave list-devices`
    pub device: String,
    /// Reference level in dBFS that maps to full amplitude (typical: -20 to -6 dBFS)
    pub reference_level_db: i8,
    /// Start with the microphone listening
    pub listen: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: "default".to_string(),
            reference_level_db: -20,
            listen: true,
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Render ticks per second
    pub fps: u32,
    /// Foreground line width in dots. Background waves use half of it.
    pub line_width: f64,
    /// Wave colour
    pub color: Rgb,
    /// Background colour
    pub background: Rgb,
    /// Grey level in [0, 1]. Overrides `color` when set.
    pub white_value: Option<f64>,
    /// Right-hand colour of a left-to-right gradient starting at `color`
    pub gradient_to: Option<Rgb>,
    /// Paint the background before drawing each frame
    pub clear_on_draw: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            line_width: 2.0,
            color: Rgb::WHITE,
            background: Rgb::BLACK,
            white_value: None,
            gradient_to: None,
            clear_on_draw: true,
        }
    }
}

impl ViewConfig {
    /// Builds the colour strategy described by this config.
    pub fn line_color(&self) -> Box<dyn LineColor> {
        match (self.white_value, self.gradient_to) {
            (Some(white_value), _) => Box::new(WhiteValue(white_value)),
            (None, Some(to)) => Box::new(Gradient {
                from: self.color,
                to,
            }),
            (None, None) => Box::new(Uniform(self.color)),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiriwaveConfig {
    #[serde(default)]
    pub wave: WaveConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

impl SiriwaveConfig {
    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    /// - If the file cannot be read
    /// - If the TOML is malformed
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let config_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: SiriwaveConfig = toml::from_str(&config_content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }
}

/// Retrieves the path to the config file, creating its directory if needed.
///
/// # Errors
/// - If the home directory cannot be determined
/// - If the config directory cannot be created
pub fn get_config_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not determine home directory"))?
        .join(".config")
        .join("siriwave");

    fs::create_dir_all(&config_dir)
        .map_err(|e| anyhow!("Failed to create config directory: {e}"))?;

    Ok(config_dir.join("siriwave.toml"))
}
