//! Live waveform driven by the microphone.
//!
//! Opens the configured input device, publishes its level on every audio
//! callback and renders the waveform until the user quits. SIGUSR1 toggles
//! oscillation from outside.

use super::{load_config_or_report, register_oscillation_trigger};
use crate::input::{MicrophoneLevel, SharedLevel};
use crate::ui::report_error;
use crate::view::{self, WaveTui, WaveView};

/// Handles the default `listen` command.
///
/// `device` overrides the configured input device.
pub async fn handle_listen(device: Option<String>) -> Result<(), anyhow::Error> {
    tracing::info!("=== siriwave listen started ===");

    let mut config = load_config_or_report()?;
    if let Some(device) = device {
        config.audio.device = device;
    }

    tracing::info!(
        "Configuration loaded: device={}, reference_level={}dBFS, waves={}, fps={}",
        config.audio.device,
        config.audio.reference_level_db,
        config.wave.waves,
        config.view.fps
    );

    let level = SharedLevel::new();
    let mut microphone = MicrophoneLevel::new(
        level.clone(),
        config.audio.device.clone(),
        config.audio.reference_level_db,
    );

    if let Err(e) = microphone.start() {
        tracing::error!("Failed to open input device: {}", e);
        report_error(
            "Audio Input Error",
            &format!("{e}\n\nPlease check the [audio] section of your config and try again."),
        );
        return Err(e);
    }
    microphone.set_listening(config.audio.listen);
    tracing::debug!("Input stream running at {}Hz", microphone.sample_rate());

    let trigger = register_oscillation_trigger()?;
    let mut view_state = WaveView::new(&config);
    let mut tui = WaveTui::new()?;

    let result = view::run(
        &mut tui,
        &mut view_state,
        &level,
        microphone.is_listening(),
        || {
            microphone.toggle_listening();
            microphone.is_listening()
        },
        trigger,
    )
    .await;

    tui.cleanup()?;
    microphone.stop();

    result?;
    tracing::info!("=== siriwave listen exited successfully ===");
    Ok(())
}
