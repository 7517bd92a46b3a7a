//! Application command handlers for siriwave.
//!
//! # Commands
//! - `listen`: Live waveform driven by the microphone (default)
//! - `demo`: Waveform driven by a synthetic level
//! - `sample`: Print one frame's points as TSV
//! - `config`: Open configuration file in user's preferred editor
//! - `list_devices`: List available audio input devices
//! - `logs`: Display recent log entries

pub mod config;
pub mod demo;
pub mod list_devices;
pub mod listen;
pub mod logs;
pub mod sample;

pub use config::handle_config;
pub use demo::handle_demo;
pub use list_devices::handle_list_devices;
pub use listen::handle_listen;
pub use logs::handle_logs;
pub use sample::{handle_sample, SampleRequest};

use crate::config::{get_config_path, SiriwaveConfig};
use crate::ui::report_error;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Loads the config file, writing the default one first if needed.
///
/// # Errors
/// - If setup or loading fails
pub(crate) fn load_config() -> anyhow::Result<SiriwaveConfig> {
    let config_path = get_config_path()?;
    crate::setup::check_and_run_setup(&config_path)?;
    SiriwaveConfig::load_from(&config_path)
}

/// Loads the config, showing an error screen when it cannot be used.
///
/// # Errors
/// - If setup or loading fails
pub(crate) fn load_config_or_report() -> anyhow::Result<SiriwaveConfig> {
    load_config().map_err(|err| {
        tracing::error!("Failed to load configuration: {err:#}");
        report_error(
            "Configuration Error",
            &format!("{err:#}\n\nPlease check your ~/.config/siriwave/siriwave.toml file and try again."),
        );
        anyhow::anyhow!("Configuration error: {err:#}")
    })
}

/// Registers SIGUSR1 as an external oscillation toggle.
///
/// # Errors
/// - If the signal handler cannot be registered
pub(crate) fn register_oscillation_trigger() -> anyhow::Result<Arc<AtomicBool>> {
    let trigger = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, Arc::clone(&trigger))
        .map_err(|e| anyhow::anyhow!("Failed to register signal handler: {e}"))?;
    Ok(trigger)
}
