//! Render driver for the waveform.
//!
//! Each render tick reads the latest level, advances the wave state and
//! strokes every wave in the terminal. The tick rate is independent of the
//! rate at which the input source publishes levels.

pub mod frame;
pub mod tui;

pub use frame::{Segment, StrokedWave, WaveView};
pub use tui::{FooterStatus, ViewCommand, WaveTui};

use crate::input::SharedLevel;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Lowest and highest accepted render rates.
const MIN_FPS: u32 = 1;
const MAX_FPS: u32 = 120;

/// Interval between render ticks for a configured frame rate.
pub fn tick_interval(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(fps.clamp(MIN_FPS, MAX_FPS)))
}

/// Level shown for this tick. A paused source reads as silence even if
/// its callback stored a value after being paused.
fn gated_level(level: &SharedLevel, listening: bool) -> f64 {
    if listening {
        level.load()
    } else {
        0.0
    }
}

/// Runs the render loop until the user quits.
///
/// `toggle_listen` is called when the user toggles listening and returns the
/// new listening state. When `oscillation_trigger` is set (SIGUSR1), the
/// oscillation switch flips and the flag is cleared.
///
/// # Errors
/// - If input handling or rendering fails
pub async fn run(
    tui: &mut WaveTui,
    view: &mut WaveView,
    level: &SharedLevel,
    mut listening: bool,
    mut toggle_listen: impl FnMut() -> bool,
    oscillation_trigger: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(tick_interval(view.view_config().fps));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut frame_count = 0u64;

    tracing::debug!("Entering render loop. Press 'q' or Escape to quit.");

    loop {
        ticker.tick().await;

        if oscillation_trigger.swap(false, Ordering::Relaxed) {
            let oscillating = view.toggle_oscillating();
            tracing::info!("Received SIGUSR1: oscillating = {}", oscillating);
        }

        match tui.handle_input(Duration::ZERO)? {
            ViewCommand::Continue => {}
            ViewCommand::Quit => break,
            ViewCommand::ToggleListen => {
                listening = toggle_listen();
            }
            ViewCommand::ToggleOscillation => {
                view.toggle_oscillating();
            }
        }

        let current_level = gated_level(level, listening);
        view.tick(current_level);

        frame_count += 1;
        if frame_count % 300 == 0 {
            tracing::debug!(
                "Frame {}: level {:.2}, damped {:.2}",
                frame_count,
                current_level,
                view.state().damping_amplitude()
            );
        }

        let status = FooterStatus {
            listening,
            oscillating: view.state().is_oscillating(),
            level: current_level,
            damped_level: view.state().damping_amplitude(),
        };
        tui.render(view, status)?;
    }

    tracing::debug!("Render loop finished after {} frames", frame_count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_interval_clamps_rate() {
        assert_eq!(tick_interval(50), Duration::from_millis(20));
        assert_eq!(tick_interval(0), Duration::from_secs(1));
        assert_eq!(tick_interval(10_000), tick_interval(MAX_FPS));
    }

    #[test]
    fn test_paused_source_reads_as_silence() {
        let level = SharedLevel::new();
        level.store(0.7);

        assert_eq!(gated_level(&level, true), 0.7);
        assert_eq!(gated_level(&level, false), 0.0);

        let mut view = WaveView::new(&crate::config::SiriwaveConfig::default());
        view.tick(gated_level(&level, false));
        assert_eq!(view.state().amplitude(), 0.0);
    }
}
