//! Waveform driven by a synthetic speech-like level, no microphone needed.

use super::{load_config_or_report, register_oscillation_trigger};
use crate::input::{SharedLevel, SyntheticLevel};
use crate::view::{self, WaveTui, WaveView};
use std::time::Duration;

/// Rate at which the generator publishes levels, close to a typical audio callback.
const GENERATOR_INTERVAL: Duration = Duration::from_millis(20);

/// Handles the `demo` command.
pub async fn handle_demo() -> Result<(), anyhow::Error> {
    tracing::info!("=== siriwave demo started ===");

    let config = load_config_or_report()?;
    let level = SharedLevel::new();
    let mut generator = SyntheticLevel::new(level.clone(), GENERATOR_INTERVAL);
    generator.start();

    let trigger = register_oscillation_trigger()?;
    let mut view_state = WaveView::new(&config);
    let mut tui = WaveTui::new()?;

    let result = view::run(
        &mut tui,
        &mut view_state,
        &level,
        generator.is_running(),
        || generator.toggle(),
        trigger,
    )
    .await;

    tui.cleanup()?;
    generator.stop();

    result?;
    tracing::info!("=== siriwave demo exited successfully ===");
    Ok(())
}
