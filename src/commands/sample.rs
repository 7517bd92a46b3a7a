//! Prints the sampled points of one frame as tab-separated values.
//!
//! Useful for plotting the waveform elsewhere or checking config changes
//! without a terminal UI.

use super::load_config;
use crate::wave::{normalized_wave_index, sample_points, ViewGeometry, WaveConfig, WaveformState};
use std::fmt::Write as _;
use std::io::Write as _;

/// Parameters of a `sample` run.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRequest {
    pub width: f64,
    pub height: f64,
    /// Input level applied before sampling
    pub amplitude: f64,
    /// Frames to advance before sampling
    pub frames: u32,
    /// Only print this wave (0 = foreground)
    pub wave: Option<u32>,
}

/// Handles the `sample` command.
///
/// Uses the `[wave]` table of the config file when it can be loaded, built-in
/// defaults otherwise.
pub fn handle_sample(request: SampleRequest) -> Result<(), anyhow::Error> {
    let wave_config = match load_config() {
        Ok(config) => config.wave,
        Err(e) => {
            tracing::warn!("Using default wave settings: {e:#}");
            WaveConfig::default()
        }
    };

    let output = render_samples(&wave_config, &request);
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Builds the TSV output: a header line, then `wave`, `depth`, `x`, `y` per point.
///
/// `depth` is the normalized wave index (0 foreground, 1 farthest background).
pub fn render_samples(config: &WaveConfig, request: &SampleRequest) -> String {
    let mut state = WaveformState::from_config(config);
    state.set_amplitude(request.amplitude);
    for _ in 0..request.frames {
        if state.should_animate() {
            state.advance_frame();
        }
    }

    let geometry = ViewGeometry::new(request.width, request.height)
        .with_margins(config.margin_left, config.margin_right);
    let wave_count = state.wave_count();
    let waves: Vec<u32> = match request.wave {
        Some(wave) => vec![wave.min(wave_count)],
        None => (0..=wave_count).collect(),
    };

    let mut output = String::from("wave\tdepth\tx\ty\n");
    for wave_index in waves {
        let depth = normalized_wave_index(wave_index, wave_count);
        for point in sample_points(&state, wave_index, &geometry) {
            let _ = writeln!(
                output,
                "{wave_index}\t{depth:.3}\t{:.3}\t{:.3}",
                point.x, point.y
            );
        }
    }
    output
}
