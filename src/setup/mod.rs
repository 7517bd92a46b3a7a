//! Setup module for initial application configuration.
//!
//! Handles first-run setup by writing the default config file, and rewrites
//! it when the file was created by an older release.

pub mod version;

use anyhow::anyhow;
use std::path::Path;

pub use version::SetupStatus;

/// Embedded default configuration template.
pub(crate) const DEFAULT_CONFIG: &str = include_str!("../../environments/siriwave.toml");

/// Current application version from Cargo.toml
const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Checks the config file and writes the default one if it is missing or outdated.
///
/// An outdated file is kept next to the new one as `siriwave.toml.bak`.
///
/// # Errors
/// Returns an error if the version check or any file operation fails.
pub fn check_and_run_setup(config_path: &Path) -> anyhow::Result<()> {
    match version::check_setup_needed(config_path)? {
        SetupStatus::Missing => {
            tracing::info!("No config found - writing defaults to {}", config_path.display());
            write_default_config(config_path)?;
        }
        SetupStatus::Outdated(old_version) => {
            tracing::info!(
                "Setup needed - migrating from version {} to {}",
                old_version,
                CURRENT_VERSION
            );
            let backup = config_path.with_extension("toml.bak");
            std::fs::copy(config_path, &backup)
                .map_err(|e| anyhow!("Failed to back up {}: {e}", config_path.display()))?;
            tracing::info!("Previous config saved as {}", backup.display());
            write_default_config(config_path)?;
        }
        SetupStatus::Current => {
            tracing::debug!("Config version up to date ({})", CURRENT_VERSION);
        }
    }
    Ok(())
}

/// Writes the default config with a `config_version` first line.
///
/// # Errors
/// Returns an error if the directory or file cannot be written.
fn write_default_config(config_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let config_with_version = format!(r#"config_version = "{}""#, CURRENT_VERSION);
    let full_config = format!("{}\n{}", config_with_version, DEFAULT_CONFIG);
    std::fs::write(config_path, full_config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiriwaveConfig;

    #[test]
    fn test_default_template_matches_built_in_defaults() {
        let config: SiriwaveConfig = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, SiriwaveConfig::default());
    }

    #[test]
    fn test_setup_writes_and_then_accepts_config() {
        let dir = std::env::temp_dir().join(format!("siriwave_setup_{}", std::process::id()));
        let config_path = dir.join("siriwave.toml");
        let _ = std::fs::remove_dir_all(&dir);

        check_and_run_setup(&config_path).unwrap();
        assert_eq!(
            version::check_setup_needed(&config_path).unwrap(),
            SetupStatus::Current
        );
        assert!(SiriwaveConfig::load_from(&config_path).is_ok());

        std::fs::write(&config_path, "config_version = \"0.0.1\"\n[wave]\nwaves = 9\n").unwrap();
        check_and_run_setup(&config_path).unwrap();
        assert!(dir.join("siriwave.toml.bak").exists());
        assert_eq!(SiriwaveConfig::load_from(&config_path).unwrap().wave.waves, 4);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
