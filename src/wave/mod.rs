//! Amplitude-driven multi-wave oscillator.
//!
//! The state holder advances once per render tick; the sampler turns the
//! current state into one polyline per wave (index 0 is the foreground wave,
//! higher indices are progressively damped background layers).

pub mod sampler;
pub mod state;
pub mod style;

pub use sampler::{envelope, normalized_wave_index, sample_points, Point, ViewGeometry};
pub use state::{WaveConfig, WaveformState};
pub use style::{wave_style, Gradient, LineColor, Rgb, Uniform, WaveStyle, WhiteValue};
