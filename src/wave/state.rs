//! Per-view waveform state and its per-frame update.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Lowest damping factor accepted by the state.
pub const MIN_DAMPING_FACTOR: f64 = 0.01;
/// Highest damping factor accepted by the state.
pub const MAX_DAMPING_FACTOR: f64 = 0.99;
/// Smallest x step between two sample points.
pub const MIN_DENSITY: f64 = 0.5;

/// Externally settable oscillator parameters, as stored in the `[wave]` config table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Amplitude used when the incoming level is near zero. Values above 0 keep the waves alive.
    pub idle_amplitude: f64,
    /// Initial phase of the sine wave in radians.
    pub phase: f64,
    /// Number of sine periods across the usable width.
    pub frequency: f64,
    /// Smoothing factor for the damped amplitude and decay per background wave.
    pub damping_factor: f64,
    /// Number of background waves drawn behind the foreground wave.
    pub waves: u32,
    /// Step between sample points. Lower values draw smoother lines at a higher cost.
    pub density: f64,
    /// Phase advance per frame. Larger magnitudes make the waves look more nervous.
    pub phase_shift: f64,
    /// Keep animating while the input is silent.
    pub oscillating: bool,
    /// Gap between the left view edge and the start of the oscillation.
    pub margin_left: f64,
    /// Gap between the end of the oscillation and the right view edge.
    pub margin_right: f64,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            idle_amplitude: 0.0,
            phase: 0.0,
            frequency: 1.5,
            damping_factor: 0.86,
            waves: 4,
            density: 5.0,
            phase_shift: -0.15,
            oscillating: true,
            margin_left: 0.0,
            margin_right: 0.0,
        }
    }
}

/// Mutable oscillator state owned by a single view.
///
/// All setters clamp their input, so the invariants below always hold:
/// `amplitude >= 0`, `damping_amplitude >= 0`, `damping_factor` inside `(0, 1)`,
/// `density > 0` and `phase` inside `[0, 2π)`.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformState {
    amplitude: f64,
    damping_amplitude: f64,
    idle_amplitude: f64,
    phase: f64,
    phase_shift: f64,
    frequency: f64,
    damping_factor: f64,
    wave_count: u32,
    density: f64,
    oscillating: bool,
}

impl Default for WaveformState {
    fn default() -> Self {
        Self::from_config(&WaveConfig::default())
    }
}

impl WaveformState {
    /// Builds a state from config values, clamping anything out of range.
    pub fn from_config(config: &WaveConfig) -> Self {
        let mut state = Self {
            amplitude: 0.0,
            damping_amplitude: 0.0,
            idle_amplitude: 0.0,
            phase: 0.0,
            phase_shift: 0.0,
            frequency: 0.0,
            damping_factor: WaveConfig::default().damping_factor,
            wave_count: config.waves,
            density: WaveConfig::default().density,
            oscillating: config.oscillating,
        };
        state.set_idle_amplitude(config.idle_amplitude);
        state.set_phase(config.phase);
        state.set_phase_shift(config.phase_shift);
        state.set_frequency(config.frequency);
        state.set_damping_factor(config.damping_factor);
        state.set_density(config.density);
        state.damping_amplitude = state.idle_amplitude;
        state
    }

    /// Stores the latest input level. Negative and NaN levels count as silence.
    pub fn set_amplitude(&mut self, level: f64) {
        self.amplitude = non_negative(level);
    }

    pub fn set_idle_amplitude(&mut self, idle_amplitude: f64) {
        self.idle_amplitude = non_negative(idle_amplitude);
    }

    pub fn set_phase(&mut self, phase: f64) {
        self.phase = wrap_phase(if phase.is_finite() { phase } else { 0.0 });
    }

    pub fn set_phase_shift(&mut self, phase_shift: f64) {
        self.phase_shift = if phase_shift.is_finite() {
            phase_shift
        } else {
            0.0
        };
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = non_negative(frequency);
    }

    pub fn set_damping_factor(&mut self, damping_factor: f64) {
        if damping_factor.is_finite() {
            self.damping_factor = damping_factor.clamp(MIN_DAMPING_FACTOR, MAX_DAMPING_FACTOR);
        }
    }

    pub fn set_wave_count(&mut self, wave_count: u32) {
        self.wave_count = wave_count;
    }

    pub fn set_density(&mut self, density: f64) {
        if density.is_finite() {
            self.density = density.max(MIN_DENSITY);
        }
    }

    pub fn set_oscillating(&mut self, oscillating: bool) {
        self.oscillating = oscillating;
    }

    /// Advances the state by one render tick.
    ///
    /// Smooths `damping_amplitude` toward the latest input and shifts the phase,
    /// wrapping it back into `[0, 2π)`. When not oscillating, the smoothing
    /// target never drops below `idle_amplitude`.
    pub fn advance_frame(&mut self) {
        let target = if self.oscillating {
            self.amplitude
        } else {
            self.amplitude.max(self.idle_amplitude)
        };
        self.damping_amplitude = non_negative(
            self.damping_amplitude * self.damping_factor + target * (1.0 - self.damping_factor),
        );
        self.phase = wrap_phase(self.phase + self.phase_shift);
    }

    /// Freeze policy for render drivers: a non-oscillating view only needs
    /// to advance while the input is louder than the idle floor.
    pub fn should_animate(&self) -> bool {
        self.oscillating || self.amplitude > self.idle_amplitude
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    pub fn damping_amplitude(&self) -> f64 {
        self.damping_amplitude
    }

    pub fn idle_amplitude(&self) -> f64 {
        self.idle_amplitude
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn phase_shift(&self) -> f64 {
        self.phase_shift
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn damping_factor(&self) -> f64 {
        self.damping_factor
    }

    pub fn wave_count(&self) -> u32 {
        self.wave_count
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn is_oscillating(&self) -> bool {
        self.oscillating
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}

/// Wraps a phase into `[0, 2π)`.
fn wrap_phase(phase: f64) -> f64 {
    let wrapped = phase.rem_euclid(TAU);
    // rem_euclid rounds tiny negative inputs up to exactly TAU
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
